mod aabb;
pub mod format;
mod ray;
pub mod transform;

pub use aabb::AABB;
pub use format::format_traj_number;
pub use ray::{intersect_aabb, safe_inverse};
pub use transform::{pose_to_transform, RigidTransform};
