use serde::{Deserialize, Serialize};

fn default_frame_index() -> u64 {
    1
}

/// Body of `POST /control`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlRequest {
    pub position: [f64; 3],
    pub yaw: f64,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub save: bool,
    #[serde(default = "default_frame_index")]
    pub frame_index: u64,
    #[serde(default)]
    pub is_first_frame: bool,
}

impl ControlRequest {
    pub fn new(position: [f64; 3], yaw: f64) -> Self {
        Self {
            position,
            yaw,
            actions: Vec::new(),
            save: false,
            frame_index: default_frame_index(),
            is_first_frame: false,
        }
    }

    pub fn with_actions<S: Into<String>>(mut self, actions: impl IntoIterator<Item = S>) -> Self {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn saving(mut self, frame_index: u64, is_first_frame: bool) -> Self {
        self.save = true;
        self.frame_index = frame_index;
        self.is_first_frame = is_first_frame;
        self
    }
}

/// Reply to `POST /control`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    /// `data:image/jpeg;base64,...`
    pub image: String,
    pub position: [f64; 3],
    pub yaw: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let req: ControlRequest = serde_json::from_str(r#"{"position": [1, 2, 3], "yaw": 0}"#).unwrap();
        assert_eq!(req.position, [1.0, 2.0, 3.0]);
        assert!(req.actions.is_empty());
        assert!(!req.save);
        assert_eq!(req.frame_index, 1);
        assert!(!req.is_first_frame);
    }

    #[test]
    fn test_full_request() {
        let req: ControlRequest = serde_json::from_str(
            r#"{"position": [0.5, 0, -1], "yaw": 12.5, "actions": ["turn_left", "jump"],
                "save": true, "frame_index": 42, "is_first_frame": true}"#,
        )
        .unwrap();
        assert_eq!(req.actions, vec!["turn_left", "jump"]);
        assert!(req.save);
        assert_eq!(req.frame_index, 42);
        assert!(req.is_first_frame);
    }

    #[test]
    fn test_missing_yaw_rejected() {
        let err = serde_json::from_str::<ControlRequest>(r#"{"position": [0, 0, 0]}"#).unwrap_err();
        assert!(err.to_string().contains("yaw"));
    }

    #[test]
    fn test_missing_position_rejected() {
        assert!(serde_json::from_str::<ControlRequest>(r#"{"yaw": 0}"#).is_err());
    }

    #[test]
    fn test_wrong_position_length_rejected() {
        assert!(serde_json::from_str::<ControlRequest>(r#"{"position": [0, 0], "yaw": 0}"#).is_err());
    }

    #[test]
    fn test_builder() {
        let req = ControlRequest::new([0.0; 3], 0.0)
            .with_actions(["move_up"])
            .saving(5, true);
        assert_eq!(req.actions, vec!["move_up".to_string()]);
        assert_eq!(req.frame_index, 5);
        assert!(req.save && req.is_first_frame);
    }
}
