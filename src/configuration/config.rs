//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – strategy selection (integrator, force model, θ, workers)
//! - [`ParametersConfig`] – numerical parameters, capacity, units
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   integrator: "verlet"      # or "euler"
//!   force_model: "barnes_hut" # or "direct"
//!   theta: 0.7                # opening threshold, barnes_hut only
//!
//! parameters:
//!   dt: 0.01                  # fixed step size
//!   t_end: 10.0               # total simulated time (optional)
//!   max_objects: 1024         # body capacity
//!   softening: 1.0e-2         # softening length
//!   units:                    # optional, SI when omitted
//!     length: "au"
//!     mass: "solar_mass"
//!     time: "julian_year"
//!
//! bodies:
//!   - x: [ -0.5, 0.0 ]        # 2 components embed at z = 0
//!     v: [  0.0, 1.0 ]
//!     m: 1.0
//!     radius: 0.02
//! ```
//!
//! The scenario builder maps this into a ready
//! [`Simulator`](crate::simulation::simulator::Simulator).

use serde::Deserialize;

/// Which integrator strategy the simulator runs.
#[derive(Deserialize, Debug, Clone)]
pub enum IntegratorConfig {
    #[serde(rename = "euler")]
    Euler,

    #[serde(rename = "verlet")]
    Verlet,
}

/// Which force-model strategy the simulator runs.
#[derive(Deserialize, Debug, Clone)]
pub enum ForceModelConfig {
    /// Exact pairwise summation, O(n²).
    #[serde(rename = "direct")]
    Direct,

    /// Octree approximation with parallel traversal, O(n log n).
    #[serde(rename = "barnes_hut")]
    BarnesHut,
}

/// Strategy selection for a scenario.
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub integrator: IntegratorConfig,
    pub force_model: ForceModelConfig,
    /// Opening threshold θ; only meaningful for `barnes_hut`.
    pub theta: Option<f64>,
    /// Worker-thread count for the tree traversal; defaults to the
    /// number of logical CPUs.
    pub workers: Option<usize>,
}

/// Names of the unit scale factors to run the scenario in.
#[derive(Deserialize, Debug, Clone)]
pub struct UnitsConfig {
    pub length: String, // "meter", "kilometer", "au", "light_year", "parsec"
    pub mass: String,   // "kilogram", "solar_mass"
    pub time: String,   // "second", "julian_year"
}

/// Numerical parameters for a scenario.
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    /// Fixed step size, in scenario time units.
    pub dt: f64,
    /// Total simulated time; the runner derives its step count from this.
    pub t_end: Option<f64>,
    /// Body capacity of the store.
    pub max_objects: usize,
    /// Softening length ε.
    pub softening: f64,
    /// Unit system; SI when omitted.
    pub units: Option<UnitsConfig>,
}

/// Initial state for a single body.
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    /// Initial position; 2 or 3 components (planar input embeds at z = 0).
    pub x: Vec<f64>,
    /// Initial velocity; same shape as `x`.
    pub v: Vec<f64>,
    pub m: f64,
    /// Body radius, carried for presentation/collision use only.
    pub radius: f64,
}

/// Top-level scenario configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}
