use log::{debug, info};
use std::path::Path;

use crate::error::ControlError;
use crate::export::{encode_preview, FrameExporter};
use crate::math::RigidTransform;
use crate::motion::integrate_tokens;
use crate::pose::{AgentPose, PoseState};
use crate::protocol::{ControlRequest, ControlResponse};
use crate::trajectory::{TrajectoryWriter, WriteMode};
use crate::traits::{Observations, RenderBackend};

/// Everything one control request touches: the rendering backend, the
/// served pose and the recorders. Built once at start-up and shared by
/// the request handlers behind a single lock.
pub struct FrameOrchestrator {
    backend: Box<dyn RenderBackend>,
    pose_state: PoseState,
    exporter: FrameExporter,
    trajectory: TrajectoryWriter,
}

impl FrameOrchestrator {
    pub fn new(
        backend: Box<dyn RenderBackend>,
        exporter: FrameExporter,
        trajectory: TrajectoryWriter,
    ) -> Self {
        Self {
            backend,
            pose_state: PoseState::new(),
            exporter,
            trajectory,
        }
    }

    /// Frames under `<data_dir>/results`, trajectory at `<data_dir>/traj.txt`
    pub fn with_data_dir(
        backend: Box<dyn RenderBackend>,
        data_dir: impl AsRef<Path>,
        depth_scale: f64,
    ) -> Self {
        let data_dir = data_dir.as_ref();
        Self::new(
            backend,
            FrameExporter::new(data_dir.join("results"), depth_scale),
            TrajectoryWriter::new(data_dir.join("traj.txt")),
        )
    }

    pub fn pose_state(&self) -> &PoseState {
        &self.pose_state
    }

    pub fn exporter(&self) -> &FrameExporter {
        &self.exporter
    }

    pub fn trajectory(&self) -> &TrajectoryWriter {
        &self.trajectory
    }

    /// Run one request cycle: integrate, render, optionally record, encode
    pub fn step(&mut self, request: &ControlRequest) -> Result<ControlResponse, ControlError> {
        let start = AgentPose::from_array(request.position, request.yaw);
        self.pose_state.check_client_pose(&start);

        let pose = integrate_tokens(start, &request.actions);
        debug!(
            "{} actions: {:?} / {} -> {:?} / {}",
            request.actions.len(),
            start.position,
            start.yaw,
            pose.position,
            pose.yaw
        );

        let obs = self.backend.observe(&pose).map_err(ControlError::Render)?;

        if request.save {
            self.record(&pose, &obs, request.frame_index, request.is_first_frame)?;
        }

        let image = encode_preview(&obs.color)?;
        self.pose_state.replace(pose);

        Ok(ControlResponse {
            image,
            position: pose.position.to_array(),
            yaw: pose.yaw,
        })
    }

    fn record(
        &self,
        pose: &AgentPose,
        obs: &Observations,
        frame_index: u64,
        is_first_frame: bool,
    ) -> Result<(), ControlError> {
        self.exporter.save(frame_index, obs)?;

        let mode = WriteMode::from_first_frame(is_first_frame);
        self.trajectory.record(&RigidTransform::from(pose), mode)?;

        info!(
            "Recorded frame {} ({:?}) at {:?}, yaw {}",
            frame_index, mode, pose.position, pose.yaw
        );
        Ok(())
    }
}
