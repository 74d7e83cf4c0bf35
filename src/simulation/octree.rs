//! Barnes–Hut octree over the active bodies.
//!
//! The tree recursively bisects a cubic region of space into octants.
//! Every node carries the total mass and center of mass of the bodies in
//! its subtree, so a traversal can stand in a whole distant cluster with a
//! single point mass.
//!
//! Nodes live in an arena: child links are indices into one `Vec`, and the
//! eight children of a subdivided node occupy a contiguous block, addressed
//! by the base index of the block. The tree is rebuilt from scratch every
//! force evaluation; clearing the arena retires the previous tree in one
//! step and keeps its allocation for the next build.

use std::collections::VecDeque;

use crate::simulation::error::SimError;
use crate::simulation::store::NVec3;

/// Sentinel child link for nodes without children.
pub const NIL: usize = usize::MAX;

/// Depth bound on subdivision. Bisection cannot separate coincident
/// positions, and past the f64 mantissa the midpoints stop moving anyway,
/// so insertion reports [`SimError::SubdivisionLimit`] instead of recursing
/// further.
pub const SUBDIVISION_LIMIT: u32 = 64;

/// How many bodies a node's region holds: none, exactly one, or several
/// (in which case the node has eight children).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Empty,
    External,
    Internal,
}

/// One octree node: a cubic region, its subtree aggregate, and a link to
/// its child block.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub bbox_min: NVec3,
    pub bbox_max: NVec3,

    /// Sum of the masses of all bodies in this subtree.
    pub total_mass: f64,
    /// Mass-weighted average position of all bodies in this subtree.
    pub center_of_mass: NVec3,

    /// Base index of the eight children in the arena, or [`NIL`].
    /// Child octant `k` (bit 0 = x, bit 1 = y, bit 2 = z; set bit = upper
    /// half) is at `children + k`.
    pub children: usize,
    pub state: NodeState,
}

impl OctreeNode {
    fn new(bbox_min: NVec3, bbox_max: NVec3) -> Self {
        Self {
            bbox_min,
            bbox_max,
            total_mass: 0.0,
            center_of_mass: NVec3::zeros(),
            children: NIL,
            state: NodeState::Empty,
        }
    }

    /// Side length of the node's cube.
    pub fn width(&self) -> f64 {
        self.bbox_max.x - self.bbox_min.x
    }
}

/// Arena-backed Barnes–Hut octree.
#[derive(Debug)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
}

impl Octree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Build a fresh tree over the given bodies.
    pub fn build(positions: &[NVec3], masses: &[f64]) -> Result<Self, SimError> {
        let mut tree = Self::new();
        tree.rebuild(positions, masses)?;
        Ok(tree)
    }

    /// Tree with a single empty root covering the given cube. Bodies go
    /// in through [`Octree::insert_body`].
    pub fn with_bounds(bbox_min: NVec3, bbox_max: NVec3) -> Self {
        Self {
            nodes: vec![OctreeNode::new(bbox_min, bbox_max)],
        }
    }

    /// Insert one body, starting at the root.
    pub fn insert_body(&mut self, mass: f64, pos: NVec3) -> Result<(), SimError> {
        self.insert(0, mass, pos, 0)
    }

    /// Discard the previous tree and insert every body anew.
    ///
    /// The root covers the smallest cube enclosing all positions: side
    /// length equal to the largest per-axis extent, anchored at the
    /// minimum corner of the bounding box. Anisotropic clouds waste some
    /// volume on the short axes; the opening criterion only needs a cube.
    pub fn rebuild(&mut self, positions: &[NVec3], masses: &[f64]) -> Result<(), SimError> {
        self.nodes.clear();

        let (bbox_min, bbox_max) = bounding_cube(positions);
        self.nodes.push(OctreeNode::new(bbox_min, bbox_max));

        for (pos, mass) in positions.iter().zip(masses) {
            self.insert_body(*mass, *pos)?;
        }

        Ok(())
    }

    pub fn root(&self) -> &OctreeNode {
        &self.nodes[0]
    }

    pub fn node(&self, idx: usize) -> &OctreeNode {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Recursively insert one body, keeping every aggregate on the path
    /// up to date as it goes.
    fn insert(&mut self, node_idx: usize, mass: f64, pos: NVec3, depth: u32) -> Result<(), SimError> {
        // Snapshot by value so no borrow is held across the recursion.
        let node = &self.nodes[node_idx];
        let state = node.state;
        let bbox_min = node.bbox_min;
        let bbox_max = node.bbox_max;
        let held_mass = node.total_mass;
        let held_com = node.center_of_mass;

        match state {
            NodeState::Empty => {
                // The body becomes the node's aggregate directly.
                let node = &mut self.nodes[node_idx];
                node.total_mass = mass;
                node.center_of_mass = pos;
                node.state = NodeState::External;
                Ok(())
            }

            NodeState::External => {
                if depth >= SUBDIVISION_LIMIT {
                    return Err(SimError::SubdivisionLimit { depth });
                }

                // Materialize all eight octants as one contiguous block.
                let mid = midpoint(&bbox_min, &bbox_max);
                let base = self.nodes.len();
                for k in 0..8 {
                    let (cmin, cmax) = child_bounds(&bbox_min, &bbox_max, &mid, k);
                    self.nodes.push(OctreeNode::new(cmin, cmax));
                }
                self.nodes[node_idx].children = base;

                // Push the held body down, then place the new one.
                self.insert(base + octant(&held_com, &mid), held_mass, held_com, depth + 1)?;
                self.insert(base + octant(&pos, &mid), mass, pos, depth + 1)?;

                let node = &mut self.nodes[node_idx];
                fold_aggregate(node, mass, pos);
                node.state = NodeState::Internal;
                Ok(())
            }

            NodeState::Internal => {
                fold_aggregate(&mut self.nodes[node_idx], mass, pos);

                let mid = midpoint(&bbox_min, &bbox_max);
                let child = self.nodes[node_idx].children + octant(&pos, &mid);
                self.insert(child, mass, pos, depth + 1)
            }
        }
    }

    /// Net gravitational acceleration at `pos` from every body in the
    /// tree, traversed breadth-first with the given scratch queue.
    ///
    /// At each visited node with cube width `s` and distance `d` from
    /// `pos` to its center of mass: external nodes, and internal nodes
    /// with `s/d < theta`, contribute a single softened point-mass term at
    /// the center of mass; otherwise the non-empty children are enqueued.
    /// A zero-separation term (the body's own leaf) contributes nothing.
    ///
    /// Reads only; a finished tree can be traversed from many threads at
    /// once.
    pub fn acceleration_at(
        &self,
        pos: NVec3,
        g: f64,
        eps2: f64,
        theta: f64,
        queue: &mut VecDeque<usize>,
    ) -> NVec3 {
        let mut acc = NVec3::zeros();
        if self.nodes.is_empty() {
            return acc;
        }

        queue.clear();
        queue.push_back(0);

        while let Some(idx) = queue.pop_front() {
            let node = &self.nodes[idx];
            match node.state {
                NodeState::Empty => {}

                NodeState::External => {
                    acc += point_mass_term(g, node.total_mass, node.center_of_mass - pos, eps2);
                }

                NodeState::Internal => {
                    let s = node.width();
                    let r = node.center_of_mass - pos;
                    let d = r.norm();

                    if d > 0.0 && s / d < theta {
                        // Far enough: the whole subtree as one point mass.
                        acc += point_mass_term(g, node.total_mass, r, eps2);
                    } else {
                        for k in 0..8 {
                            let child = node.children + k;
                            if self.nodes[child].state != NodeState::Empty {
                                queue.push_back(child);
                            }
                        }
                    }
                }
            }
        }

        acc
    }
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

// helpers ===============================================================

/// Softened Newtonian acceleration from a point mass at displacement `r`.
fn point_mass_term(g: f64, mass: f64, r: NVec3, eps2: f64) -> NVec3 {
    let r2 = r.dot(&r);
    if r2 == 0.0 {
        return NVec3::zeros();
    }
    let inv_r = (r2 + eps2).sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    g * mass * inv_r3 * r
}

/// Fold one body into a node's running mass/center-of-mass aggregate.
fn fold_aggregate(node: &mut OctreeNode, mass: f64, pos: NVec3) {
    let new_total = node.total_mass + mass;
    if new_total > 0.0 {
        node.center_of_mass = (node.total_mass * node.center_of_mass + mass * pos) / new_total;
    } else {
        // Massless bodies carry no weight; keep a finite placeholder.
        node.center_of_mass = pos;
    }
    node.total_mass = new_total;
}

/// Smallest enclosing cube of all positions: side = largest per-axis
/// extent, anchored at the minimum corner of the bounding box.
fn bounding_cube(positions: &[NVec3]) -> (NVec3, NVec3) {
    if positions.is_empty() {
        return (NVec3::zeros(), NVec3::new(1.0, 1.0, 1.0));
    }

    let mut min = NVec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    let mut max = NVec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

    for p in positions {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);

        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    let extent = max - min;
    let side = extent.x.max(extent.y).max(extent.z);
    (min, min + NVec3::new(side, side, side))
}

fn midpoint(bbox_min: &NVec3, bbox_max: &NVec3) -> NVec3 {
    (bbox_min + bbox_max) * 0.5
}

/// Octant index of a point relative to the node midpoints. Bit 0 is x,
/// bit 1 is y, bit 2 is z; a set bit means the upper half (`>= mid`).
fn octant(p: &NVec3, mid: &NVec3) -> usize {
    let mut k = 0;
    if p.x >= mid.x {
        k |= 1;
    }
    if p.y >= mid.y {
        k |= 2;
    }
    if p.z >= mid.z {
        k |= 4;
    }
    k
}

/// Bounds of child octant `k` inside the parent cube.
fn child_bounds(bbox_min: &NVec3, bbox_max: &NVec3, mid: &NVec3, k: usize) -> (NVec3, NVec3) {
    let mut cmin = *bbox_min;
    let mut cmax = *bbox_max;

    if k & 1 == 0 {
        cmax.x = mid.x;
    } else {
        cmin.x = mid.x;
    }

    if k & 2 == 0 {
        cmax.y = mid.y;
    } else {
        cmin.y = mid.y;
    }

    if k & 4 == 0 {
        cmax.z = mid.z;
    } else {
        cmin.z = mid.z;
    }

    (cmin, cmax)
}
