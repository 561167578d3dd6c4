pub mod gltf_triangles;

pub use gltf_triangles::load_gltf_triangles;
