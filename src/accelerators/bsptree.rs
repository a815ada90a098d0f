//! Binary space partitioning tree with axis-aligned split planes.
//!
//! Construction starts from the bounds of all meshes and recursively
//! splits the current box. For every axis three candidate planes (at a
//! quarter, half and three quarters of the extent) are scored by
//! `left_count * area(left) + right_count * area(right)`, where the
//! counts are the primitives whose boxes overlap each half. The lowest
//! score wins. A primitive straddling the chosen plane is referenced
//! from both children. When the best plane leaves one side empty the
//! plane is moved just outside the geometry, so the empty side stays
//! empty and the other side gets a tight box.
//!
//! Traversal visits the near child before the far child. The ray's
//! `t_max` is the correctness mechanism of the closest-hit query: it
//! is narrowed to the split plane while the near child is searched and
//! to the hit distance whenever a primitive is hit, so a hit found in
//! the near child is always closer than anything behind the plane.

// std
use std::sync::Arc;
// others
use contracts::debug_ensures;
use log::{debug, info};
use rayon::prelude::*;
use strum::IntoEnumIterator;
// rs_bsp
use crate::accelerators::AccelBase;
use crate::core::base::{Float, DIVISION_EPSILON, SPLIT_EPSILON};
use crate::core::geometry::{Bounds3f, Ray, XYZEnum};
use crate::core::paramset::ParamSet;
use crate::core::primitive::AccObj;
use crate::shapes::plane::Plane;
use crate::shapes::triangle::TriangleMesh;

/// Number of slabs each axis is divided into when searching a split.
const TESTS: usize = 4;
/// Nodes with at least this many references score split candidates on
/// the rayon thread pool.
const PARALLEL_SPLIT_MIN: usize = 4096;

#[derive(Debug, Copy, Clone)]
pub enum BspNode {
    /// range `[id, id + count)` into the flat reference array
    Leaf { id: usize, count: usize },
    /// children are indices into the node arena
    Interior {
        axis: XYZEnum,
        plane: Float,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BspStats {
    pub nodes: usize,
    pub leaves: usize,
    pub empty_leaves: usize,
    /// primitive references stored in leaves (straddling primitives
    /// count once per leaf)
    pub references: usize,
    pub max_depth: usize,
}

pub struct BspTree {
    pub base: AccelBase,
    nodes: Vec<BspNode>,
    tree_objects: Vec<AccObj>,
    max_objects: usize,
    max_level: usize,
}

impl BspTree {
    pub fn new(
        meshes: Vec<Arc<TriangleMesh>>,
        planes: Vec<Arc<Plane>>,
        max_objects: usize,
        max_level: usize,
    ) -> Self {
        let base: AccelBase = AccelBase::new(meshes, planes);
        let objects: Vec<AccObj> = base.primitives.clone();
        let bbox: Bounds3f = base.bbox;
        let mut tree = BspTree {
            base,
            nodes: Vec::new(),
            tree_objects: Vec::with_capacity(objects.len()),
            max_objects,
            max_level,
        };
        tree.subdivide(&bbox, 0, objects);
        let stats: BspStats = tree.stats();
        info!(
            "BSP tree over {} primitives and {} planes",
            tree.base.primitives.len(),
            tree.base.planes.len()
        );
        debug!(
            "BSP tree: {} nodes, {} leaves ({} empty), {} references, depth {}",
            stats.nodes, stats.leaves, stats.empty_leaves, stats.references, stats.max_depth
        );
        tree
    }
    /// Reads `"maxprims"` (leaf capacity, default 4) and `"maxdepth"`
    /// (default 20) from *ps*.
    pub fn create(
        meshes: Vec<Arc<TriangleMesh>>,
        planes: Vec<Arc<Plane>>,
        ps: &ParamSet,
    ) -> BspTree {
        let max_objects: i32 = ps.find_one_int("maxprims", 4);
        let max_level: i32 = ps.find_one_int("maxdepth", 20);
        BspTree::new(
            meshes,
            planes,
            max_objects.max(0) as usize,
            max_level.max(0) as usize,
        )
    }
    pub fn closest_hit(&self, ray: &mut Ray) -> bool {
        let t_min: Float = ray.t_min;
        self.base.closest_plane(ray);
        self.intersect_node(ray, 0, &mut |_| {});
        ray.t_min = t_min;
        self.base.finish(ray)
    }
    pub fn any_hit(&self, ray: &mut Ray) -> bool {
        if self.base.any_plane(ray) || self.any_node(ray, 0) {
            return self.base.finish(ray);
        }
        false
    }
    pub fn stats(&self) -> BspStats {
        let mut stats = BspStats {
            nodes: self.nodes.len(),
            ..Default::default()
        };
        for (depth, count) in self.leaves() {
            stats.leaves += 1;
            if count == 0 {
                stats.empty_leaves += 1;
            }
            stats.references += count;
            stats.max_depth = stats.max_depth.max(depth);
        }
        stats
    }
    /// Depth and reference count of every leaf, left to right.
    pub fn leaves(&self) -> Vec<(usize, usize)> {
        let mut leaves: Vec<(usize, usize)> = Vec::new();
        let mut todo: Vec<(usize, usize)> = vec![(0, 0)];
        while let Some((node, depth)) = todo.pop() {
            match self.nodes[node] {
                BspNode::Leaf { count, .. } => leaves.push((depth, count)),
                BspNode::Interior { left, right, .. } => {
                    todo.push((right, depth + 1));
                    todo.push((left, depth + 1));
                }
            }
        }
        leaves
    }

    fn subdivide(&mut self, bbox: &Bounds3f, level: usize, objects: Vec<AccObj>) -> usize {
        let node: usize = self.nodes.len();
        if objects.len() <= self.max_objects || level == self.max_level {
            self.nodes.push(BspNode::Leaf {
                id: self.tree_objects.len(),
                count: objects.len(),
            });
            self.tree_objects.extend(objects);
            return node;
        }
        // reserve the slot, children follow in the arena
        self.nodes.push(BspNode::Leaf { id: 0, count: 0 });
        let (axis, plane) = find_split(bbox, &objects);
        let mut left_bbox: Bounds3f = *bbox;
        let mut right_bbox: Bounds3f = *bbox;
        left_bbox.p_max[axis] = plane;
        right_bbox.p_min[axis] = plane;
        let (left_objects, right_objects) = partition(&objects, &left_bbox, &right_bbox);
        drop(objects);
        let left: usize = self.subdivide(&left_bbox, level + 1, left_objects);
        let right: usize = self.subdivide(&right_bbox, level + 1, right_objects);
        self.nodes[node] = BspNode::Interior {
            axis,
            plane,
            left,
            right,
        };
        node
    }

    /// Closest hit below *node*. Every hit narrows `t_max` and the new
    /// value is passed to *on_narrow*, the one place where the shrinking
    /// interval can be observed from outside. `closest_hit` passes a
    /// no-op.
    fn intersect_node<F>(&self, ray: &mut Ray, node: usize, on_narrow: &mut F) -> bool
    where
        F: FnMut(Float),
    {
        match self.nodes[node] {
            BspNode::Leaf { id, count } => {
                let mut found: bool = false;
                for obj in &self.tree_objects[id..id + count] {
                    if self.base.test(ray, obj) {
                        on_narrow(ray.t_max);
                        found = true;
                    }
                }
                found
            }
            BspNode::Interior {
                axis,
                plane,
                left,
                right,
            } => {
                let (near, far, t) = split_order(ray, axis, plane, left, right);
                if t > ray.t_max {
                    self.intersect_node(ray, near, on_narrow)
                } else if t < ray.t_min {
                    self.intersect_node(ray, far, on_narrow)
                } else {
                    let t_max: Float = ray.t_max;
                    ray.t_max = t;
                    if self.intersect_node(ray, near, on_narrow) {
                        true
                    } else {
                        ray.t_min = t;
                        ray.t_max = t_max;
                        self.intersect_node(ray, far, on_narrow)
                    }
                }
            }
        }
    }

    /// Stops at the first hit below *node*, not necessarily the
    /// closest one.
    fn any_node(&self, ray: &mut Ray, node: usize) -> bool {
        match self.nodes[node] {
            BspNode::Leaf { id, count } => self.tree_objects[id..id + count]
                .iter()
                .any(|obj| self.base.test(ray, obj)),
            BspNode::Interior {
                axis,
                plane,
                left,
                right,
            } => {
                let (near, far, t) = split_order(ray, axis, plane, left, right);
                if t > ray.t_max {
                    self.any_node(ray, near)
                } else if t < ray.t_min {
                    self.any_node(ray, far)
                } else {
                    self.any_node(ray, near) || self.any_node(ray, far)
                }
            }
        }
    }
}

/// Near child, far child and the ray parameter of the split plane. A
/// direction component too close to zero is replaced by the division
/// epsilon, which can order grazing rays slightly wrong.
fn split_order(
    ray: &Ray,
    axis: XYZEnum,
    plane: Float,
    left: usize,
    right: usize,
) -> (usize, usize, Float) {
    let axis_direction: Float = ray.direction[axis];
    let axis_origin: Float = ray.origin[axis];
    let (near, far) = if axis_direction >= 0.0 {
        (left, right)
    } else {
        (right, left)
    };
    let t: Float = if axis_direction.abs() < DIVISION_EPSILON {
        (plane - axis_origin) / DIVISION_EPSILON
    } else {
        (plane - axis_origin) / axis_direction
    };
    (near, far, t)
}

/// Score of one candidate plane: cost and whether the left or the
/// right half would be empty.
fn split_cost(bbox: &Bounds3f, objects: &[AccObj], axis: XYZEnum, k: usize) -> (f64, bool, bool) {
    let min_corner: Float = bbox.p_min[axis];
    let max_corner: Float = bbox.p_max[axis];
    let center: Float = (max_corner - min_corner) * k as Float / TESTS as Float + min_corner;
    let mut left_bbox: Bounds3f = *bbox;
    let mut right_bbox: Bounds3f = *bbox;
    left_bbox.p_max[axis] = center;
    right_bbox.p_min[axis] = center;
    let mut left_count: usize = 0;
    let mut right_count: usize = 0;
    for obj in objects {
        if left_bbox.intersects(&obj.bbox) {
            left_count += 1;
        }
        if right_bbox.intersects(&obj.bbox) {
            right_count += 1;
        }
    }
    let cost: f64 = left_count as f64 * left_bbox.surface_area() as f64
        + right_count as f64 * right_bbox.surface_area() as f64;
    (cost, left_count == 0, right_count == 0)
}

/// Cheapest of the candidate planes, corrected when one side would be
/// empty. Large nodes score their candidates in parallel; the choice
/// does not depend on it.
fn find_split(bbox: &Bounds3f, objects: &[AccObj]) -> (XYZEnum, Float) {
    let candidates: Vec<(XYZEnum, usize)> = XYZEnum::iter()
        .flat_map(|axis| (1..TESTS).map(move |k| (axis, k)))
        .collect();
    let score = |&(axis, k): &(XYZEnum, usize)| split_cost(bbox, objects, axis, k);
    let scores: Vec<(f64, bool, bool)> = if objects.len() >= PARALLEL_SPLIT_MIN {
        candidates.par_iter().map(score).collect()
    } else {
        candidates.iter().map(score).collect()
    };
    let mut best_axis: XYZEnum = XYZEnum::X;
    let mut best_k: usize = 1;
    let mut min_cost: f64 = 1.0e27;
    let mut left_zero: bool = false;
    let mut right_zero: bool = false;
    // strict comparison, the first of equal candidates wins
    for (&(axis, k), &(cost, left_empty, right_empty)) in candidates.iter().zip(scores.iter()) {
        if cost < min_cost {
            min_cost = cost;
            best_axis = axis;
            best_k = k;
            left_zero = left_empty;
            right_zero = right_empty;
        }
    }
    let min_corner: Float = bbox.p_min[best_axis];
    let max_corner: Float = bbox.p_max[best_axis];
    let size: Float = max_corner - min_corner;
    let mut center: Float = size * best_k as Float / TESTS as Float + min_corner;
    let diff: Float = if SPLIT_EPSILON < size / 8.0 {
        size / 8.0
    } else {
        SPLIT_EPSILON
    };
    if left_zero {
        center = objects
            .iter()
            .map(|obj| obj.bbox.p_min[best_axis])
            .fold(max_corner, Float::min)
            - diff;
    }
    if right_zero {
        center = objects
            .iter()
            .map(|obj| obj.bbox.p_max[best_axis])
            .fold(min_corner, Float::max)
            + diff;
    }
    (best_axis, center)
}

/// Does every primitive touch at least one of the two halves?
fn placed(objects: &[AccObj], left_bbox: &Bounds3f, right_bbox: &Bounds3f) -> bool {
    objects
        .iter()
        .all(|o| left_bbox.intersects(&o.bbox) || right_bbox.intersects(&o.bbox))
}

/// Overlap based split: a primitive goes to every half its box touches.
#[debug_ensures(ret.0.len() + ret.1.len() >= objects.len())]
#[debug_ensures(placed(objects, left_bbox, right_bbox), "primitive lost in partition")]
fn partition(
    objects: &[AccObj],
    left_bbox: &Bounds3f,
    right_bbox: &Bounds3f,
) -> (Vec<AccObj>, Vec<AccObj>) {
    let mut left_objects: Vec<AccObj> = Vec::new();
    let mut right_objects: Vec<AccObj> = Vec::new();
    for obj in objects {
        if left_bbox.intersects(&obj.bbox) {
            left_objects.push(*obj);
        }
        if right_bbox.intersects(&obj.bbox) {
            right_objects.push(*obj);
        }
    }
    (left_objects, right_objects)
}
