use axum::http::StatusCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of one control request. Every variant aborts the whole request.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rendering failed: {0:#}")]
    Render(anyhow::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Controller state is poisoned by an earlier panic")]
    StatePoisoned,

    #[error("Request worker failed: {0}")]
    Worker(String),
}

impl ControlError {
    /// Adapter for `map_err` on I/O results touching `path`
    pub fn persist(path: &Path) -> impl FnOnce(std::io::Error) -> ControlError + '_ {
        move |source| ControlError::Persist {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ControlError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
