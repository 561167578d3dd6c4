pub mod bvh;
pub mod raycaster;
pub mod triangle_intersection;

pub use raycaster::MeshRenderer;
