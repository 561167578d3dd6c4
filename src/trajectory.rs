//! Append-only trajectory log.
//!
//! Each recorded frame becomes one line of sixteen numbers: the camera
//! transform flattened row-major, every value in the fixed-width form
//! produced by [`format_traj_number`]. The file is opened for each write
//! and closed again, so no descriptor outlives a request.

use log::debug;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ControlError;
use crate::math::{format_traj_number, RigidTransform};

/// How the trajectory file is opened for a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Start a new trajectory, discarding previous contents
    Truncate,
    /// Add a line after the existing ones
    Append,
}

impl WriteMode {
    pub fn from_first_frame(is_first_frame: bool) -> Self {
        if is_first_frame {
            WriteMode::Truncate
        } else {
            WriteMode::Append
        }
    }
}

/// One trajectory line, without the trailing newline
pub fn serialize_transform(transform: &RigidTransform) -> String {
    transform
        .to_row_major()
        .iter()
        .map(|&v| format_traj_number(v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct TrajectoryWriter {
    path: PathBuf,
}

impl TrajectoryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one line. A crash mid-write can leave a partial last line.
    pub fn record(&self, transform: &RigidTransform, mode: WriteMode) -> Result<(), ControlError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ControlError::persist(parent))?;
        }

        let mut options = OpenOptions::new();
        match mode {
            WriteMode::Truncate => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };

        let mut line = serialize_transform(transform);
        line.push('\n');

        let mut file = options
            .open(&self.path)
            .map_err(ControlError::persist(&self.path))?;
        file.write_all(line.as_bytes())
            .map_err(ControlError::persist(&self.path))?;

        debug!("Trajectory {:?} ({:?}): {}", self.path, mode, line.trim_end());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::pose_to_transform;
    use glam::DVec3;

    #[test]
    fn test_write_mode_from_flag() {
        assert_eq!(WriteMode::from_first_frame(true), WriteMode::Truncate);
        assert_eq!(WriteMode::from_first_frame(false), WriteMode::Append);
    }

    #[test]
    fn test_identity_line() {
        let line = serialize_transform(&pose_to_transform(DVec3::ZERO, 0.0));
        let one = "1.000000000000000000e+00";
        let zero = "0.000000000000000000e+00";
        let expected = [
            one, zero, zero, zero, //
            zero, one, zero, zero, //
            zero, zero, one, zero, //
            zero, zero, zero, one,
        ]
        .join(" ");
        assert_eq!(line, expected);
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let line = serialize_transform(&pose_to_transform(DVec3::new(0.0, 0.0, -0.1), 0.0));
        let tokens: Vec<&str> = line.split(' ').collect();
        assert_eq!(tokens.len(), 16);
        assert_eq!(tokens[11], "-1.000000000000000056e-01");
    }

    #[test]
    fn test_truncate_then_append() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TrajectoryWriter::new(dir.path().join("traj.txt"));
        let t = pose_to_transform(DVec3::new(1.0, 2.0, 3.0), 10.0);

        writer.record(&t, WriteMode::Append).unwrap();
        writer.record(&t, WriteMode::Truncate).unwrap();
        writer.record(&t, WriteMode::Append).unwrap();

        let text = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TrajectoryWriter::new(dir.path().join("nested/run/traj.txt"));
        writer
            .record(&pose_to_transform(DVec3::ZERO, 0.0), WriteMode::Truncate)
            .unwrap();
        assert!(writer.path().exists());
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as the trajectory file
        let writer = TrajectoryWriter::new(dir.path());
        let err = writer
            .record(&pose_to_transform(DVec3::ZERO, 0.0), WriteMode::Append)
            .unwrap_err();
        assert!(matches!(err, ControlError::Persist { .. }));
    }
}
