use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use pose_recorder::camera::CameraParams;
use pose_recorder::cli::Cli;
use pose_recorder::core::MeshRenderer;
use pose_recorder::server;
use pose_recorder::FrameOrchestrator;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    info!("Shutdown requested, finishing in-flight requests");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let camera = match &cli.camera {
        Some(path) => CameraParams::from_json_file(path)?,
        None => CameraParams::default(),
    };

    let renderer = MeshRenderer::load(&cli.scene, camera)
        .with_context(|| format!("Cannot serve without scene {:?}", cli.scene))?;
    info!(
        "Scene {:?} ready: {} triangles",
        cli.scene,
        renderer.triangle_count()
    );

    let orchestrator = FrameOrchestrator::with_data_dir(Box::new(renderer), &cli.data_dir, camera.scale);

    let listener = TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!("Listening on http://{}/control", listener.local_addr()?);

    server::serve(listener, Arc::new(Mutex::new(orchestrator)), shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}
