use crate::core::triangle_intersection::{intersect_triangle, TriangleIntersection};
use crate::math::{intersect_aabb, safe_inverse, AABB};
use crate::types::Triangle;
use glam::Vec3;

/// Maximum primitives per leaf node before splitting
const MAX_LEAF_SIZE: usize = 4;

/// Number of SAH buckets for binned building
const SAH_BUCKETS: usize = 12;

/// Node of a flattened BVH.
/// Leaves have `count > 0` and own `indices[first..first + count]`.
/// Internal nodes have `count == 0`; the left child directly follows the
/// node and `first` holds the right child index.
#[derive(Clone, Copy, Debug)]
pub struct BVHNode {
    pub bounds: AABB,
    pub first: u32,
    pub count: u32,
}

impl BVHNode {
    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// BVH build statistics, logged when a scene is loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct BVHStats {
    pub num_nodes: usize,
    pub num_leaves: usize,
    pub max_depth: usize,
    pub total_primitives: usize,
    pub avg_leaf_size: f32,
}

/// Bounding volume hierarchy over scene triangles, stored as a flat array
#[derive(Clone, Debug, Default)]
pub struct BVH {
    nodes: Vec<BVHNode>,
    indices: Vec<u32>,
}

impl BVH {
    /// Build using binned SAH (Surface Area Heuristic) splits
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut bvh = BVH {
            nodes: Vec::with_capacity(triangles.len().max(1) * 2),
            indices: (0..triangles.len() as u32).collect(),
        };

        if !triangles.is_empty() {
            let bounds: Vec<AABB> = triangles.iter().map(Triangle::bounds).collect();
            let centroids: Vec<Vec3> = triangles.iter().map(Triangle::centroid).collect();
            bvh.build_node(&bounds, &centroids, 0, triangles.len());
        }

        bvh
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn build_node(&mut self, bounds: &[AABB], centroids: &[Vec3], start: usize, end: usize) {
        let node_bounds = self.indices[start..end]
            .iter()
            .fold(AABB::empty(), |acc, &i| acc.union(&bounds[i as usize]));
        let node_idx = self.nodes.len();

        if end - start <= MAX_LEAF_SIZE {
            self.push_leaf(node_bounds, start, end);
            return;
        }

        let centroid_bounds = self.indices[start..end]
            .iter()
            .fold(AABB::empty(), |acc, &i| acc.grow(centroids[i as usize]));

        let mid = match Self::find_best_split(bounds, centroids, &self.indices[start..end], &centroid_bounds) {
            Some((axis, split_pos)) => {
                let mid = start
                    + Self::partition(centroids, &mut self.indices[start..end], axis, split_pos);
                if mid == start || mid == end {
                    self.median_split(centroids, start, end, &centroid_bounds)
                } else {
                    mid
                }
            }
            None => self.median_split(centroids, start, end, &centroid_bounds),
        };

        // Placeholder, patched once the right child index is known
        self.nodes.push(BVHNode {
            bounds: node_bounds,
            first: 0,
            count: 0,
        });

        self.build_node(bounds, centroids, start, mid);
        let right_idx = self.nodes.len() as u32;
        self.build_node(bounds, centroids, mid, end);

        self.nodes[node_idx].first = right_idx;
    }

    fn push_leaf(&mut self, bounds: AABB, start: usize, end: usize) {
        self.nodes.push(BVHNode {
            bounds,
            first: start as u32,
            count: (end - start) as u32,
        });
    }

    /// Split in the middle of the longest centroid axis by element count
    fn median_split(&mut self, centroids: &[Vec3], start: usize, end: usize, centroid_bounds: &AABB) -> usize {
        let axis = longest_axis(centroid_bounds);
        let mid = (end - start) / 2;
        self.indices[start..end].select_nth_unstable_by(mid, |&a, &b| {
            centroids[a as usize][axis].total_cmp(&centroids[b as usize][axis])
        });
        start + mid
    }

    fn find_best_split(
        bounds: &[AABB],
        centroids: &[Vec3],
        indices: &[u32],
        centroid_bounds: &AABB,
    ) -> Option<(usize, f32)> {
        let mut best: Option<(f32, usize, f32)> = None;

        for axis in 0..3 {
            if let Some((cost, pos)) = Self::evaluate_sah_axis(bounds, centroids, indices, centroid_bounds, axis) {
                if best.map_or(true, |(best_cost, _, _)| cost < best_cost) {
                    best = Some((cost, axis, pos));
                }
            }
        }

        best.map(|(_, axis, pos)| (axis, pos))
    }

    fn evaluate_sah_axis(
        bounds: &[AABB],
        centroids: &[Vec3],
        indices: &[u32],
        centroid_bounds: &AABB,
        axis: usize,
    ) -> Option<(f32, f32)> {
        let axis_min = centroid_bounds.min[axis];
        let axis_extent = centroid_bounds.extent()[axis];
        if axis_extent < 1e-6 {
            return None;
        }

        let mut bucket_bounds = [AABB::empty(); SAH_BUCKETS];
        let mut bucket_counts = [0usize; SAH_BUCKETS];

        for &idx in indices {
            let offset = (centroids[idx as usize][axis] - axis_min) / axis_extent;
            let bucket = ((offset * SAH_BUCKETS as f32) as usize).min(SAH_BUCKETS - 1);
            bucket_counts[bucket] += 1;
            bucket_bounds[bucket] = bucket_bounds[bucket].union(&bounds[idx as usize]);
        }

        let mut best: Option<(f32, usize)> = None;
        for split in 1..SAH_BUCKETS {
            let (left_count, left_bounds) = accumulate(&bucket_bounds[..split], &bucket_counts[..split]);
            let (right_count, right_bounds) = accumulate(&bucket_bounds[split..], &bucket_counts[split..]);
            if left_count == 0 || right_count == 0 {
                continue;
            }
            let cost = sah_cost(
                left_bounds.surface_area(),
                left_count,
                right_bounds.surface_area(),
                right_count,
            );
            if best.map_or(true, |(best_cost, _)| cost < best_cost) {
                best = Some((cost, split));
            }
        }

        best.map(|(cost, split)| {
            let pos = axis_min + (split as f32 / SAH_BUCKETS as f32) * axis_extent;
            (cost, pos)
        })
    }

    /// Move indices whose centroid lies below `split_pos` to the front
    fn partition(centroids: &[Vec3], indices: &mut [u32], axis: usize, split_pos: f32) -> usize {
        let mut left = 0;
        let mut right = indices.len();

        while left < right {
            if centroids[indices[left] as usize][axis] < split_pos {
                left += 1;
            } else {
                right -= 1;
                indices.swap(left, right);
            }
        }

        left
    }

    /// Closest triangle hit along the ray, as (triangle index, hit)
    pub fn intersect(
        &self,
        triangles: &[Triangle],
        origin: Vec3,
        dir: Vec3,
    ) -> Option<(usize, TriangleIntersection)> {
        if self.nodes.is_empty() {
            return None;
        }

        let inv_dir = safe_inverse(dir);
        let mut closest: Option<(usize, TriangleIntersection)> = None;
        let mut closest_t = f32::INFINITY;
        let mut stack: Vec<usize> = Vec::with_capacity(64);
        stack.push(0);

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if intersect_aabb(origin, inv_dir, &node.bounds, closest_t).is_none() {
                continue;
            }

            if node.is_leaf() {
                let first = node.first as usize;
                for &tri_idx in &self.indices[first..first + node.count as usize] {
                    let tri_idx = tri_idx as usize;
                    if let Some(hit) = intersect_triangle(origin, dir, &triangles[tri_idx]) {
                        if hit.t < closest_t {
                            closest_t = hit.t;
                            closest = Some((tri_idx, hit));
                        }
                    }
                }
            } else {
                stack.push(node.first as usize);
                stack.push(node_idx + 1);
            }
        }

        closest
    }

    pub fn stats(&self) -> BVHStats {
        let mut stats = BVHStats::default();
        if self.nodes.is_empty() {
            return stats;
        }

        let mut stack = vec![(0usize, 0usize)];
        while let Some((node_idx, depth)) = stack.pop() {
            let node = &self.nodes[node_idx];
            stats.num_nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            if node.is_leaf() {
                stats.num_leaves += 1;
                stats.total_primitives += node.count as usize;
            } else {
                stack.push((node.first as usize, depth + 1));
                stack.push((node_idx + 1, depth + 1));
            }
        }

        if stats.num_leaves > 0 {
            stats.avg_leaf_size = stats.total_primitives as f32 / stats.num_leaves as f32;
        }
        stats
    }
}

fn longest_axis(aabb: &AABB) -> usize {
    let e = aabb.extent();
    if e.x >= e.y && e.x >= e.z {
        0
    } else if e.y >= e.z {
        1
    } else {
        2
    }
}

fn accumulate(bucket_bounds: &[AABB], bucket_counts: &[usize]) -> (usize, AABB) {
    bucket_bounds
        .iter()
        .zip(bucket_counts)
        .filter(|(_, count)| **count > 0)
        .fold((0, AABB::empty()), |(total, acc), (b, &count)| (total + count, acc.union(b)))
}

/// SAH cost function
fn sah_cost(left_area: f32, left_count: usize, right_area: f32, right_count: usize) -> f32 {
    const TRAVERSAL_COST: f32 = 0.125;
    const INTERSECTION_COST: f32 = 1.0;

    TRAVERSAL_COST
        + INTERSECTION_COST * (left_area * left_count as f32 + right_area * right_count as f32)
}
