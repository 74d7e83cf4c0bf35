//! Force models for the n-body core.
//!
//! A [`ForceModel`] turns current positions and masses into accelerations.
//! Two interchangeable strategies are provided:
//! - [`NewtonianGravity`]: exact pairwise summation, O(n²)
//! - [`NewtonianGravityBarnesHut`]: octree approximation, O(n log n),
//!   with the per-body traversal fanned out across worker threads
//!
//! Both fold the caller's unit system into the gravitational constant once
//! at construction, and both expose the pairwise potential used by the
//! energy diagnostics.

use std::collections::VecDeque;

use crate::simulation::error::SimError;
use crate::simulation::octree::Octree;
use crate::simulation::store::NVec3;
use crate::simulation::units::Units;

/// Newtonian gravitational constant in SI units (m³ kg⁻¹ s⁻²).
pub const G_SI: f64 = 6.674_30e-11;

/// Rescale the gravitational constant into a (length, mass, time) unit
/// system.
fn scaled_g(units: Units) -> f64 {
    G_SI / units.length / units.length / units.length * units.mass * units.time * units.time
}

/// Strategy interface for force evaluation.
///
/// `compute_forces` overwrites every active body's acceleration and is
/// deterministic for identical inputs. Dispatch happens once per
/// evaluation, never per body.
pub trait ForceModel: Send {
    /// Recompute `acc` in place from current positions and masses. The
    /// three slices cover the same active range.
    fn compute_forces(
        &mut self,
        acc: &mut [NVec3],
        pos: &[NVec3],
        mass: &[f64],
    ) -> Result<(), SimError>;

    /// Potential energy between one ordered pair of bodies. Models
    /// without a pairwise potential contribute nothing.
    fn pair_potential_energy(&self, _xi: &NVec3, _xj: &NVec3, _mi: f64, _mj: f64) -> f64 {
        0.0
    }

    /// Total potential energy by direct summation over every ordered
    /// pair, half weight each. Diagnostics only; this stays O(n²) even
    /// for tree-based models, which do not reuse the tree here.
    fn total_potential_energy(&self, pos: &[NVec3], mass: &[f64]) -> f64 {
        let n = pos.len();
        let mut energy = 0.0;
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                energy += self.pair_potential_energy(&pos[i], &pos[j], mass[i], mass[j]);
            }
        }
        energy
    }
}

/// Exact Newtonian gravity with softening, summed pair by pair.
///
/// Single-threaded with a fixed summation order, so repeated evaluations
/// of the same state are bit-identical.
pub struct NewtonianGravity {
    /// Gravitational constant, pre-scaled by the unit factors.
    pub g: f64,
    /// Softening length ε; bounds the force as separations approach zero.
    pub softening: f64,
}

impl NewtonianGravity {
    pub fn new(softening: f64, units: Units) -> Self {
        Self {
            g: scaled_g(units),
            softening,
        }
    }
}

impl ForceModel for NewtonianGravity {
    fn compute_forces(
        &mut self,
        acc: &mut [NVec3],
        pos: &[NVec3],
        mass: &[f64],
    ) -> Result<(), SimError> {
        let eps2 = self.softening * self.softening;
        let n = pos.len();

        for i in 0..n {
            let xi = pos[i];
            let mut a = NVec3::zeros();

            for j in 0..n {
                if i == j {
                    continue;
                }

                // a_i += -G m_j (x_i - x_j) / (|x_i - x_j|² + ε²)^(3/2)
                let dx = xi - pos[j];
                let d2 = dx.dot(&dx) + eps2;
                let inv_r = d2.sqrt().recip();
                let inv_r3 = inv_r * inv_r * inv_r;

                a += -self.g * mass[j] * inv_r3 * dx;
            }

            acc[i] = a;
        }

        Ok(())
    }

    fn pair_potential_energy(&self, xi: &NVec3, xj: &NVec3, mi: f64, mj: f64) -> f64 {
        -self.g * mi * mj / (2.0 * (xi - xj).norm())
    }
}

/// Newtonian gravity through a Barnes–Hut octree.
///
/// Every evaluation rebuilds the tree from scratch, then splits the active
/// range into one contiguous block per worker; each worker traverses the
/// shared read-only tree for its bodies and writes only its own slice of
/// the acceleration buffer, so no synchronization is needed beyond the
/// join at the end. Results do not depend on the worker count.
pub struct NewtonianGravityBarnesHut {
    /// Gravitational constant, pre-scaled by the unit factors.
    pub g: f64,
    /// Softening length ε.
    pub softening: f64,
    /// Opening threshold θ. Smaller is more accurate and more expensive;
    /// zero forces full descent to the leaves.
    pub theta: f64,

    workers: usize,
    tree: Octree,
}

impl NewtonianGravityBarnesHut {
    pub fn new(theta: f64, softening: f64, units: Units) -> Self {
        Self {
            g: scaled_g(units),
            softening,
            theta,
            workers: num_cpus::get().max(1),
            tree: Octree::new(),
        }
    }

    /// Override the worker count (defaults to the number of logical CPUs).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl ForceModel for NewtonianGravityBarnesHut {
    fn compute_forces(
        &mut self,
        acc: &mut [NVec3],
        pos: &[NVec3],
        mass: &[f64],
    ) -> Result<(), SimError> {
        let n = pos.len();
        if n == 0 {
            return Ok(());
        }

        // Phase 1: single-threaded rebuild; the previous tick's tree is
        // discarded here (the arena keeps its allocation).
        self.tree.rebuild(pos, mass)?;

        let tree = &self.tree;
        let g = self.g;
        let eps2 = self.softening * self.softening;
        let theta = self.theta;

        // Phase 2: fan the per-body traversals out over contiguous index
        // blocks, the division remainder riding with the final block.
        let workers = self.workers.min(n);
        let block = n / workers;

        rayon::scope(|s| {
            let mut rest = acc;
            let mut start = 0;

            for w in 0..workers {
                let len = if w == workers - 1 { n - start } else { block };
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(len);
                rest = tail;

                let lo = start;
                s.spawn(move |_| {
                    let mut queue = VecDeque::new();
                    for (k, a) in chunk.iter_mut().enumerate() {
                        *a = tree.acceleration_at(pos[lo + k], g, eps2, theta, &mut queue);
                    }
                });

                start += len;
            }
        });

        Ok(())
    }

    fn pair_potential_energy(&self, xi: &NVec3, xj: &NVec3, mi: f64, mj: f64) -> f64 {
        -self.g * mi * mj / (2.0 * (xi - xj).norm())
    }
}
