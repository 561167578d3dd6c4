use glam::Vec3;

use crate::math::AABB;

/// Scene triangle in world space
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub material_id: u32,
}

impl Triangle {
    pub const fn new(v0: Vec3, v1: Vec3, v2: Vec3, material_id: u32) -> Self {
        Self {
            v0,
            v1,
            v2,
            material_id,
        }
    }

    pub fn bounds(&self) -> AABB {
        AABB::from_points(&[self.v0, self.v1, self.v2])
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}

/// Surface appearance, reduced to a flat base color
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
}

impl Material {
    pub const fn new_color(base_color: [f32; 4]) -> Self {
        Self { base_color }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new_color([0.7, 0.7, 0.7, 1.0])
    }
}

/// Triangles plus the materials they index into
#[derive(Clone, Debug, Default)]
pub struct MeshScene {
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
}

impl MeshScene {
    pub fn material(&self, id: u32) -> Material {
        self.materials.get(id as usize).copied().unwrap_or_default()
    }
}
