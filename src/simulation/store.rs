//! Particle storage for the n-body core.
//!
//! Bodies live in a structure of arrays: one dense column per attribute
//! (mass, radius, position, velocity, acceleration), indexed by slot.
//! Callers hold stable ids; the store maps ids to slots both ways and
//! keeps the occupied slots packed into `[0, len)`, so the force and
//! integration passes always see gap-free buffers.

use std::collections::VecDeque;

use nalgebra::Vector3;

use crate::simulation::error::SimError;

pub type NVec3 = Vector3<f64>;

/// Stable handle to a simulated body.
///
/// An id stays valid across deletions of other bodies. Deleted ids are
/// queued and reissued (oldest first) by later [`ParticleStore::add_object`]
/// calls, which keeps every id below the store capacity, so the mapping
/// tables are flat arrays, no generation counters needed.
pub type BodyId = u64;

/// Structure-of-arrays body store with id/slot indirection.
///
/// Capacity is fixed at construction; there is no growth path. Deleting a
/// body swaps the topmost occupied slot into the hole, so the active range
/// stays contiguous and both add and delete are O(1).
pub struct ParticleStore {
    max_objects: usize,

    // Structure of arrays. Only `[0, len)` is meaningful.
    mass: Vec<f64>,
    radius: Vec<f64>,
    pos: Vec<NVec3>,
    vel: Vec<NVec3>,
    acc: Vec<NVec3>,

    len: usize,     // number of active bodies; also the next free slot
    next_id: BodyId, // next id to mint when the recycle queue is empty

    id2idx: Vec<Option<usize>>,  // indexed by id
    idx2id: Vec<Option<BodyId>>, // indexed by slot
    free_ids: VecDeque<BodyId>,  // deleted ids awaiting reuse, FIFO
}

impl ParticleStore {
    /// Create an empty store with room for `max_objects` bodies.
    pub fn new(max_objects: usize) -> Self {
        Self {
            max_objects,
            mass: vec![0.0; max_objects],
            radius: vec![0.0; max_objects],
            pos: vec![NVec3::zeros(); max_objects],
            vel: vec![NVec3::zeros(); max_objects],
            acc: vec![NVec3::zeros(); max_objects],
            len: 0,
            next_id: 0,
            id2idx: vec![None; max_objects],
            idx2id: vec![None; max_objects],
            free_ids: VecDeque::new(),
        }
    }

    pub fn max_objects(&self) -> usize {
        self.max_objects
    }

    /// Number of active bodies.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a body and return its id.
    ///
    /// The new body takes the next free slot; its id comes from the
    /// recycle queue if one is waiting, otherwise a fresh id is minted.
    /// Acceleration starts at zero.
    pub fn add_object(
        &mut self,
        mass: f64,
        radius: f64,
        position: NVec3,
        velocity: NVec3,
    ) -> Result<BodyId, SimError> {
        if self.len >= self.max_objects {
            return Err(SimError::CapacityExceeded {
                max: self.max_objects,
            });
        }

        let idx = self.len;
        self.len += 1;

        let id = match self.free_ids.pop_front() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };

        self.id2idx[id as usize] = Some(idx);
        self.idx2id[idx] = Some(id);

        self.mass[idx] = mass;
        self.radius[idx] = radius;
        self.pos[idx] = position;
        self.vel[idx] = velocity;
        self.acc[idx] = NVec3::zeros();

        Ok(id)
    }

    /// Delete a body by id.
    ///
    /// The topmost occupied slot is copied into the freed slot and its id
    /// rewired, the vacated mappings are nulled, and the deleted id joins
    /// the recycle queue. The copy is a harmless self-copy when the
    /// deleted body already sits on top.
    pub fn del_object(&mut self, id: BodyId) -> Result<(), SimError> {
        let idx = self.index_of(id)?;

        let top_idx = self.len - 1;
        let top_id = self.idx2id[top_idx].ok_or(SimError::InvalidId(id))?;

        // Move the top row down into the hole.
        self.mass[idx] = self.mass[top_idx];
        self.radius[idx] = self.radius[top_idx];
        self.pos[idx] = self.pos[top_idx];
        self.vel[idx] = self.vel[top_idx];
        self.acc[idx] = self.acc[top_idx];

        // Rewire mappings: the moved body keeps its id, the deleted id and
        // the vacated top slot go null.
        self.id2idx[top_id as usize] = Some(idx);
        self.idx2id[idx] = Some(top_id);
        self.id2idx[id as usize] = None;
        self.idx2id[top_idx] = None;

        self.free_ids.push_back(id);
        self.len -= 1;

        Ok(())
    }

    /// Whether `id` currently refers to a live body.
    pub fn exists(&self, id: BodyId) -> bool {
        (id as usize) < self.max_objects && self.id2idx[id as usize].is_some()
    }

    fn index_of(&self, id: BodyId) -> Result<usize, SimError> {
        if (id as usize) >= self.max_objects {
            return Err(SimError::InvalidId(id));
        }
        self.id2idx[id as usize].ok_or(SimError::InvalidId(id))
    }

    // Per-id accessors ====================================================

    pub fn mass(&self, id: BodyId) -> Result<f64, SimError> {
        Ok(self.mass[self.index_of(id)?])
    }

    pub fn radius(&self, id: BodyId) -> Result<f64, SimError> {
        Ok(self.radius[self.index_of(id)?])
    }

    pub fn position(&self, id: BodyId) -> Result<NVec3, SimError> {
        Ok(self.pos[self.index_of(id)?])
    }

    pub fn velocity(&self, id: BodyId) -> Result<NVec3, SimError> {
        Ok(self.vel[self.index_of(id)?])
    }

    pub fn acceleration(&self, id: BodyId) -> Result<NVec3, SimError> {
        Ok(self.acc[self.index_of(id)?])
    }

    // Bulk accessors ======================================================
    // Views over the active range only; densely packed, no gaps.

    pub fn masses(&self) -> &[f64] {
        &self.mass[..self.len]
    }

    pub fn radii(&self) -> &[f64] {
        &self.radius[..self.len]
    }

    pub fn positions(&self) -> &[NVec3] {
        &self.pos[..self.len]
    }

    pub fn velocities(&self) -> &[NVec3] {
        &self.vel[..self.len]
    }

    pub fn accelerations(&self) -> &[NVec3] {
        &self.acc[..self.len]
    }

    /// Split borrow for a force evaluation: mutable accelerations plus
    /// read-only positions and masses, all over the active range.
    pub fn force_buffers(&mut self) -> (&mut [NVec3], &[NVec3], &[f64]) {
        (
            &mut self.acc[..self.len],
            &self.pos[..self.len],
            &self.mass[..self.len],
        )
    }

    /// Split borrow for an integration step: read-only accelerations plus
    /// mutable velocities and positions, all over the active range.
    pub fn integrate_buffers(&mut self) -> (&[NVec3], &mut [NVec3], &mut [NVec3]) {
        (
            &self.acc[..self.len],
            &mut self.vel[..self.len],
            &mut self.pos[..self.len],
        )
    }
}
