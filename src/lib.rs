pub mod camera;
pub mod cli;
pub mod command;
pub mod core;
pub mod error;
pub mod export;
pub mod loaders;
pub mod math;
pub mod motion;
pub mod orchestrator;
pub mod pose;
pub mod protocol;
pub mod server;
pub mod trajectory;
pub mod traits;
pub mod types;

pub use command::Command;
pub use error::ControlError;
pub use orchestrator::FrameOrchestrator;
pub use pose::{AgentPose, PoseState};
pub use protocol::{ControlRequest, ControlResponse};
