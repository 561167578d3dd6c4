use glam::DVec3;
use log::warn;

/// Agent position plus heading in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: DVec3,
    pub yaw: f64,
}

impl AgentPose {
    pub const fn new(position: DVec3, yaw: f64) -> Self {
        Self { position, yaw }
    }

    pub fn from_array(position: [f64; 3], yaw: f64) -> Self {
        Self::new(DVec3::from_array(position), yaw)
    }

    /// Heading converted to radians
    pub fn yaw_radians(&self) -> f64 {
        self.yaw.to_radians()
    }

    /// Exact comparison, so -0.0 and 0.0 are told apart
    pub fn bitwise_eq(&self, other: &AgentPose) -> bool {
        self.yaw.to_bits() == other.yaw.to_bits()
            && self
                .position
                .to_array()
                .iter()
                .zip(other.position.to_array().iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Default for AgentPose {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 0.0)
    }
}

/// Last pose served to the client.
///
/// The client stays authoritative: every request carries the pose it
/// believes the agent is at. This state only exists to notice when the
/// two drift apart.
#[derive(Debug, Default)]
pub struct PoseState {
    current: Option<AgentPose>,
}

impl PoseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AgentPose> {
        self.current
    }

    /// Compare a client-supplied pose with the last served one.
    /// Returns true when they differ.
    pub fn check_client_pose(&self, client: &AgentPose) -> bool {
        match &self.current {
            Some(served) if !served.bitwise_eq(client) => {
                warn!(
                    "Client pose {:?} / yaw {} differs from last served pose {:?} / yaw {}",
                    client.position, client.yaw, served.position, served.yaw
                );
                true
            }
            _ => false,
        }
    }

    pub fn replace(&mut self, pose: AgentPose) -> Option<AgentPose> {
        self.current.replace(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pose_is_origin() {
        let pose = AgentPose::default();
        assert_eq!(pose.position, DVec3::ZERO);
        assert_eq!(pose.yaw, 0.0);
    }

    #[test]
    fn test_yaw_radians() {
        let pose = AgentPose::from_array([0.0, 0.0, 0.0], 180.0);
        assert!((pose.yaw_radians() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn test_bitwise_eq_distinguishes_signed_zero() {
        let a = AgentPose::from_array([0.0, 0.0, 0.0], 0.0);
        let b = AgentPose::from_array([0.0, -0.0, 0.0], 0.0);
        assert_eq!(a, b);
        assert!(!a.bitwise_eq(&b));
    }

    #[test]
    fn test_state_starts_empty() {
        let state = PoseState::new();
        assert!(state.current().is_none());
        assert!(!state.check_client_pose(&AgentPose::default()));
    }

    #[test]
    fn test_state_detects_desync() {
        let mut state = PoseState::new();
        state.replace(AgentPose::from_array([1.0, 0.0, 0.0], 5.0));

        assert!(!state.check_client_pose(&AgentPose::from_array([1.0, 0.0, 0.0], 5.0)));
        assert!(state.check_client_pose(&AgentPose::from_array([1.0, 0.0, 0.0], 10.0)));
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut state = PoseState::new();
        assert!(state.replace(AgentPose::default()).is_none());
        let prev = state.replace(AgentPose::from_array([0.0, 1.0, 0.0], 0.0));
        assert_eq!(prev, Some(AgentPose::default()));
    }
}
