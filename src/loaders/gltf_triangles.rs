use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info};
use std::path::Path;

use crate::types::{Material, MeshScene, Triangle};

/// Load every triangle of every scene in a glTF file, in world space
pub fn load_gltf_triangles(path: impl AsRef<Path>) -> Result<MeshScene> {
    let path = path.as_ref();
    info!("Loading glTF scene {:?}", path);

    let (gltf, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    debug!(
        "glTF contents: {} scenes, {} nodes, {} meshes, {} materials",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count(),
        gltf.materials().count()
    );

    let mut materials: Vec<Material> = gltf
        .materials()
        .map(|m| Material::new_color(m.pbr_metallic_roughness().base_color_factor()))
        .collect();

    // Primitives without a material index fall back to slot 0
    if materials.is_empty() {
        materials.push(Material::default());
    }

    let mut triangles = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut triangles)?;
        }
    }

    info!(
        "Extracted {} triangles and {} materials from {:?}",
        triangles.len(),
        materials.len(),
        path
    );

    Ok(MeshScene {
        triangles,
        materials,
    })
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, triangles)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, triangles)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            debug!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let vertices: Vec<Vec3> = reader
            .read_positions()
            .with_context(|| format!("Mesh {:?} primitive has no positions", mesh.name()))?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        let material_id = primitive.material().index().unwrap_or(0) as u32;

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        for tri in indices.chunks_exact(3) {
            let fetch = |i: u32| {
                vertices.get(i as usize).copied().with_context(|| {
                    format!("Index {} out of range in mesh {:?}", i, mesh.name())
                })
            };
            triangles.push(Triangle::new(
                fetch(tri[0])?,
                fetch(tri[1])?,
                fetch(tri[2])?,
                material_id,
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_error() {
        let err = load_gltf_triangles("/nonexistent/scene.gltf").unwrap_err();
        assert!(format!("{}", err).contains("Failed to load glTF file"));
    }
}
