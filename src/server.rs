use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use log::{error, warn};
use serde_json::json;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::error::ControlError;
use crate::orchestrator::FrameOrchestrator;
use crate::protocol::{ControlRequest, ControlResponse};

pub type SharedOrchestrator = Arc<Mutex<FrameOrchestrator>>;

pub fn create_router(orchestrator: SharedOrchestrator) -> Router {
    Router::new()
        .route("/control", post(control))
        .with_state(orchestrator)
}

/// Serve until `shutdown` resolves, then let in-flight requests finish
pub async fn serve<F>(listener: TcpListener, orchestrator: SharedOrchestrator, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, create_router(orchestrator))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn control(
    State(orchestrator): State<SharedOrchestrator>,
    payload: Result<Json<ControlRequest>, JsonRejection>,
) -> Result<Json<ControlResponse>, ControlError> {
    let Json(request) = payload.map_err(|e| ControlError::InvalidRequest(e.body_text()))?;

    // The whole cycle runs under the lock: the backend cannot be shared
    let response = tokio::task::spawn_blocking(move || {
        let mut orchestrator = orchestrator.lock().map_err(|_| ControlError::StatePoisoned)?;
        orchestrator.step(&request)
    })
    .await
    .map_err(|e| ControlError::Worker(e.to_string()))??;

    Ok(Json(response))
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Control request failed: {}", self);
        } else {
            warn!("Rejected control request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
