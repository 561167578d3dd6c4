use glam::Vec3;

use super::AABB;

/// Slab test against a box. `inv_dir` is the component-wise reciprocal of
/// the ray direction. Returns the entry distance (clamped to 0 when the
/// origin is inside), or `None` when the box is missed or lies entirely
/// beyond `t_max`.
pub fn intersect_aabb(origin: Vec3, inv_dir: Vec3, aabb: &AABB, t_max: f32) -> Option<f32> {
    let t0 = (aabb.min - origin) * inv_dir;
    let t1 = (aabb.max - origin) * inv_dir;

    let t_near = t0.min(t1).max_element().max(0.0);
    let t_far = t0.max(t1).min_element().min(t_max);

    if t_near <= t_far {
        Some(t_near)
    } else {
        None
    }
}

/// Reciprocal direction with near-zero components clamped, so the slab
/// test never divides by zero
pub fn safe_inverse(dir: Vec3) -> Vec3 {
    const EPSILON: f32 = 1e-8;
    let inv = |c: f32| {
        if c.abs() < EPSILON {
            1.0 / EPSILON.copysign(c)
        } else {
            1.0 / c
        }
    };
    Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z))
}
