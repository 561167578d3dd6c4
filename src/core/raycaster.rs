use anyhow::{ensure, Result};
use glam::Vec3;
use image::{Rgb, RgbImage};
use log::{info, warn};
use std::path::Path;

use crate::camera::{CameraFrame, CameraParams};
use crate::core::bvh::BVH;
use crate::loaders::load_gltf_triangles;
use crate::pose::AgentPose;
use crate::traits::{Observations, RenderBackend};
use crate::types::MeshScene;

const AMBIENT: f32 = 0.25;
const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// CPU backend: one pinhole ray per pixel against a triangle mesh
pub struct MeshRenderer {
    scene: MeshScene,
    bvh: BVH,
    params: CameraParams,
    /// Camera-space ray per pixel, row-major
    camera_rays: Vec<Vec3>,
}

impl MeshRenderer {
    /// Load a glTF scene. A missing file is an error, never an empty scene.
    pub fn load(scene_path: impl AsRef<Path>, params: CameraParams) -> Result<Self> {
        let scene_path = scene_path.as_ref();
        ensure!(
            scene_path.exists(),
            "Scene file not found: {}",
            scene_path.display()
        );
        let scene = load_gltf_triangles(scene_path)?;
        Ok(Self::new(scene, params))
    }

    pub fn new(scene: MeshScene, params: CameraParams) -> Self {
        let bvh = BVH::build(&scene.triangles);
        if bvh.is_empty() {
            warn!("Scene has no triangles, every frame will be background");
        }
        let stats = bvh.stats();
        info!(
            "BVH ready: {} nodes, {} leaves, depth {}, {:.2} triangles per leaf",
            stats.num_nodes, stats.num_leaves, stats.max_depth, stats.avg_leaf_size
        );
        info!(
            "Camera {}x{}, hfov {:.2} deg",
            params.w,
            params.h,
            params.hfov_degrees()
        );

        let camera_rays = (0..params.h)
            .flat_map(|y| (0..params.w).map(move |x| (x, y)))
            .map(|(x, y)| params.pixel_ray(x, y))
            .collect();

        Self {
            scene,
            bvh,
            params,
            camera_rays,
        }
    }

    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    pub fn triangle_count(&self) -> usize {
        self.scene.triangles.len()
    }
}

impl RenderBackend for MeshRenderer {
    fn resolution(&self) -> (u32, u32) {
        (self.params.w, self.params.h)
    }

    fn observe(&mut self, pose: &AgentPose) -> Result<Observations> {
        let frame = CameraFrame::from_pose(pose);
        let (w, h) = self.resolution();
        let mut color = RgbImage::from_pixel(w, h, BACKGROUND);
        let mut depth = vec![0.0f32; self.params.pixel_count()];

        for (i, camera_dir) in self.camera_rays.iter().enumerate() {
            let dir = frame.to_world(*camera_dir);
            let Some((tri_idx, hit)) = self.bvh.intersect(&self.scene.triangles, frame.origin, dir)
            else {
                continue;
            };

            // Rotation keeps |dir|, and the camera-space ray has z = -1, so t is z-depth
            depth[i] = hit.t;

            let material = self.scene.material(self.scene.triangles[tri_idx].material_id);
            let facing = hit.normal.dot(dir.normalize()).abs();
            let intensity = AMBIENT + (1.0 - AMBIENT) * facing;
            let [r, g, b, _] = material.base_color;
            let to_u8 = |c: f32| (c * intensity * 255.0).round().clamp(0.0, 255.0) as u8;

            color.put_pixel(i as u32 % w, i as u32 / w, Rgb([to_u8(r), to_u8(g), to_u8(b)]));
        }

        Ok(Observations { color, depth })
    }
}
