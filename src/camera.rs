use anyhow::{ensure, Context, Result};
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pose::AgentPose;

/// Pinhole intrinsics shared by the color and depth sensors.
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    pub w: u32,
    pub h: u32,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    /// Multiplier applied to metric depth before 16-bit quantization
    pub scale: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            w: 1200,
            h: 680,
            fx: 600.0,
            fy: 600.0,
            cx: 599.5,
            cy: 339.5,
            scale: 6553.5,
        }
    }
}

impl CameraParams {
    /// Read overrides from a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read camera parameters {:?}", path))?;
        let params: CameraParams = serde_json::from_str(&text)
            .with_context(|| format!("Invalid camera parameters in {:?}", path))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.w > 0 && self.h > 0, "camera resolution must be non-zero");
        ensure!(
            self.fx > 0.0 && self.fy > 0.0,
            "camera focal lengths must be positive"
        );
        ensure!(self.scale > 0.0, "depth scale must be positive");
        Ok(())
    }

    /// Horizontal field of view in degrees, derived from width and fx
    pub fn hfov_degrees(&self) -> f64 {
        (2.0 * (self.w as f64 / (2.0 * self.fx)).atan()).to_degrees()
    }

    pub fn pixel_count(&self) -> usize {
        self.w as usize * self.h as usize
    }

    /// Camera-space ray through a pixel center. The camera looks down -Z
    /// with +Y up; the ray has z = -1 so hit distances are z-depths.
    pub fn pixel_ray(&self, px: u32, py: u32) -> Vec3 {
        let x = (px as f64 - self.cx) / self.fx;
        let y = -(py as f64 - self.cy) / self.fy;
        Vec3::new(x as f32, y as f32, -1.0)
    }
}

/// World-space camera frame for one pose
#[derive(Debug, Clone, Copy)]
pub struct CameraFrame {
    pub origin: Vec3,
    pub rotation: Mat3,
}

impl CameraFrame {
    pub fn from_pose(pose: &AgentPose) -> Self {
        Self {
            origin: pose.position.as_vec3(),
            rotation: Mat3::from_rotation_y(pose.yaw_radians() as f32),
        }
    }

    pub fn to_world(&self, camera_dir: Vec3) -> Vec3 {
        self.rotation * camera_dir
    }
}
