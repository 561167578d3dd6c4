use image::RgbImage;

use crate::pose::AgentPose;

/// Sensor output for one pose
#[derive(Debug, Clone)]
pub struct Observations {
    pub color: RgbImage,
    /// Row-major z-distances in meters, `width * height` entries.
    /// 0.0 where nothing was hit.
    pub depth: Vec<f32>,
}

impl Observations {
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }
}

/// Turns an agent pose into color and depth observations.
///
/// Placing the agent and reading the sensors happen in one call; callers
/// serialize access, implementations need not be thread-safe.
pub trait RenderBackend: Send {
    /// Output resolution as (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Place the agent at `pose` and read both sensors
    fn observe(&mut self, pose: &AgentPose) -> anyhow::Result<Observations>;
}
