// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "pose-recorder")]
#[command(about = "Steer a camera agent through a scene and record its trajectory", long_about = None)]
pub struct Cli {
    /// glTF scene to render; the server refuses to start without it
    #[arg(long, default_value = "scene.gltf")]
    pub scene: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:5000")]
    pub bind: String,

    /// Output root: frames go to <DATA_DIR>/results, the trajectory to <DATA_DIR>/traj.txt
    #[arg(long = "data-dir", default_value = "data")]
    pub data_dir: PathBuf,

    /// JSON file overriding camera intrinsics (w, h, fx, fy, cx, cy, scale)
    #[arg(long)]
    pub camera: Option<PathBuf>,
}
