//! The simulation orchestrator.
//!
//! A [`Simulator`] owns the particle store and the two strategy objects
//! (force model, integrator) chosen at construction. One tick is
//! `compute_forces()` followed by `step()`: positions and masses flow into
//! accelerations, accelerations into velocities and positions. Entity
//! management and the energy diagnostics are delegated to the store and
//! the force model.
//!
//! The `&mut self` API serializes store mutation against force and
//! integration passes within one thread; sharing a simulator across
//! threads is the caller's problem to synchronize.

use crate::simulation::error::SimError;
use crate::simulation::forces::ForceModel;
use crate::simulation::integrator::Integrator;
use crate::simulation::store::{BodyId, NVec3, ParticleStore};

pub struct Simulator {
    time_step: f64,
    iteration: u64,
    store: ParticleStore,
    integrator: Box<dyn Integrator>,
    force_model: Box<dyn ForceModel>,
}

impl Simulator {
    /// Construct a simulator with a fixed time step, a fixed body
    /// capacity, and the chosen integration and force strategies.
    pub fn new(
        time_step: f64,
        max_objects: usize,
        integrator: Box<dyn Integrator>,
        force_model: Box<dyn ForceModel>,
    ) -> Self {
        Self {
            time_step,
            iteration: 0,
            store: ParticleStore::new(max_objects),
            integrator,
            force_model,
        }
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Number of completed `step()` calls.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    // Entity operations ===================================================

    /// Add a body; fails with [`SimError::CapacityExceeded`] once the
    /// configured maximum is live.
    pub fn add_object(
        &mut self,
        mass: f64,
        radius: f64,
        position: NVec3,
        velocity: NVec3,
    ) -> Result<BodyId, SimError> {
        self.store.add_object(mass, radius, position, velocity)
    }

    /// Remove a body by id; fails with [`SimError::InvalidId`] if it is
    /// not live.
    pub fn del_object(&mut self, id: BodyId) -> Result<(), SimError> {
        self.store.del_object(id)
    }

    pub fn exists(&self, id: BodyId) -> bool {
        self.store.exists(id)
    }

    pub fn n_objects(&self) -> usize {
        self.store.len()
    }

    pub fn max_objects(&self) -> usize {
        self.store.max_objects()
    }

    pub fn mass(&self, id: BodyId) -> Result<f64, SimError> {
        self.store.mass(id)
    }

    pub fn radius(&self, id: BodyId) -> Result<f64, SimError> {
        self.store.radius(id)
    }

    pub fn position(&self, id: BodyId) -> Result<NVec3, SimError> {
        self.store.position(id)
    }

    pub fn velocity(&self, id: BodyId) -> Result<NVec3, SimError> {
        self.store.velocity(id)
    }

    pub fn acceleration(&self, id: BodyId) -> Result<NVec3, SimError> {
        self.store.acceleration(id)
    }

    // Bulk views over the active range, gap-free. The presentation side
    // reads positions through these between ticks.

    pub fn positions(&self) -> &[NVec3] {
        self.store.positions()
    }

    pub fn velocities(&self) -> &[NVec3] {
        self.store.velocities()
    }

    pub fn accelerations(&self) -> &[NVec3] {
        self.store.accelerations()
    }

    pub fn masses(&self) -> &[f64] {
        self.store.masses()
    }

    pub fn radii(&self) -> &[f64] {
        self.store.radii()
    }

    // Tick operations =====================================================

    /// Refresh every active body's acceleration from current positions
    /// and masses.
    pub fn compute_forces(&mut self) -> Result<(), SimError> {
        let (acc, pos, mass) = self.store.force_buffers();
        self.force_model.compute_forces(acc, pos, mass)
    }

    /// Advance velocities and positions by one time step using the
    /// accelerations left by the last `compute_forces()`.
    pub fn step(&mut self) {
        let (acc, vel, pos) = self.store.integrate_buffers();
        self.integrator.integrate(self.time_step, acc, vel, pos);
        self.iteration += 1;
    }

    // Diagnostics =========================================================

    /// Σ ½ m‖v‖² over the active bodies.
    pub fn total_kinetic_energy(&self) -> f64 {
        self.store
            .masses()
            .iter()
            .zip(self.store.velocities())
            .map(|(m, v)| 0.5 * m * v.norm_squared())
            .sum()
    }

    /// Pairwise potential energy, delegated to the force model's direct
    /// O(n²) sum.
    pub fn total_potential_energy(&self) -> f64 {
        self.force_model
            .total_potential_energy(self.store.positions(), self.store.masses())
    }

    pub fn total_energy(&self) -> f64 {
        self.total_kinetic_energy() + self.total_potential_energy()
    }
}
