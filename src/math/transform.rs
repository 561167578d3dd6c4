use glam::{DMat3, DMat4, DQuat, DVec3, DVec4};

use crate::pose::AgentPose;

/// Rigid 4x4 camera-to-world transform built from an agent pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform(DMat4);

impl RigidTransform {
    pub fn matrix(&self) -> &DMat4 {
        &self.0
    }

    pub fn rotation(&self) -> DMat3 {
        DMat3::from_mat4(self.0)
    }

    pub fn translation(&self) -> DVec3 {
        self.0.w_axis.truncate()
    }

    /// Rows of the matrix, top to bottom
    pub fn rows(&self) -> [[f64; 4]; 4] {
        self.0.transpose().to_cols_array_2d()
    }

    /// Row-major flattening, the order trajectory files use
    pub fn to_row_major(&self) -> [f64; 16] {
        self.0.transpose().to_cols_array()
    }
}

/// Yaw-only rotation about +Y followed by the translation to `position`.
/// Pitch and roll are always zero for this agent. The rotation is
/// expanded from a unit quaternion about +Y.
pub fn pose_to_transform(position: DVec3, yaw_degrees: f64) -> RigidTransform {
    let rotation = DMat3::from_quat(DQuat::from_rotation_y(yaw_degrees.to_radians()));
    RigidTransform(DMat4::from_cols(
        rotation.x_axis.extend(0.0),
        rotation.y_axis.extend(0.0),
        rotation.z_axis.extend(0.0),
        DVec4::new(position.x, position.y, position.z, 1.0),
    ))
}

impl From<&AgentPose> for RigidTransform {
    fn from(pose: &AgentPose) -> Self {
        pose_to_transform(pose.position, pose.yaw)
    }
}
