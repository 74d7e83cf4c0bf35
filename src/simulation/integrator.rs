//! Fixed-step time integrators.
//!
//! An [`Integrator`] advances velocities and positions in place from a
//! precomputed acceleration buffer. The simulator calls it exactly once
//! per tick, after the force evaluation.

use crate::simulation::store::NVec3;

/// Strategy interface for time integration. The three slices cover the
/// same active range; `vel` and `pos` are updated in place.
pub trait Integrator: Send {
    fn integrate(&mut self, dt: f64, acc: &[NVec3], vel: &mut [NVec3], pos: &mut [NVec3]);
}

/// Semi-implicit Euler.
///
/// Velocities are kicked first and the *updated* velocity drives the
/// position drift. Swapping the two loops changes the energy drift of
/// long runs, so the order is fixed.
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn integrate(&mut self, dt: f64, acc: &[NVec3], vel: &mut [NVec3], pos: &mut [NVec3]) {
        // Kick: v += a dt
        for (v, a) in vel.iter_mut().zip(acc) {
            *v += *a * dt;
        }

        // Drift with the updated velocity: x += v dt
        for (x, v) in pos.iter_mut().zip(vel.iter()) {
            *x += *v * dt;
        }
    }
}

/// Velocity Verlet, with the previous step's accelerations cached across
/// calls.
///
/// The first call has no cached accelerations and only advances positions;
/// every later call completes the velocity update with the average of the
/// previous and current accelerations before drifting. The cache makes
/// the integrator stateful: it must be called once per step, in step
/// order, and not shared between simulations.
pub struct VelocityVerlet {
    prev_accel: Vec<NVec3>,
}

impl VelocityVerlet {
    pub fn new() -> Self {
        Self {
            prev_accel: Vec::new(),
        }
    }
}

impl Default for VelocityVerlet {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for VelocityVerlet {
    fn integrate(&mut self, dt: f64, acc: &[NVec3], vel: &mut [NVec3], pos: &mut [NVec3]) {
        let n = acc.len();
        let half_dt = 0.5 * dt;

        // Kick: v += ½ (a_prev + a) dt. Skipped when nothing usable is
        // cached: the first call, or the body count changed underneath us.
        if self.prev_accel.len() == n {
            for i in 0..n {
                vel[i] += half_dt * (self.prev_accel[i] + acc[i]);
            }
        }

        // Drift: x += v dt + ½ a dt²
        for i in 0..n {
            pos[i] += vel[i] * dt + half_dt * dt * acc[i];
        }

        self.prev_accel.clear();
        self.prev_accel.extend_from_slice(acc);
    }
}

// TODO: RK4 slot. The substep force re-evaluations it needs do not fit
// `integrate(dt, acc, vel, pos)`; adding it means threading the force
// model through the integrator interface.
