pub mod benchmark;
pub mod configuration;
pub mod simulation;

pub use simulation::error::SimError;
pub use simulation::forces::{ForceModel, NewtonianGravity, NewtonianGravityBarnesHut, G_SI};
pub use simulation::integrator::{ExplicitEuler, Integrator, VelocityVerlet};
pub use simulation::octree::{NodeState, Octree, OctreeNode};
pub use simulation::scenario::build_simulator;
pub use simulation::simulator::Simulator;
pub use simulation::store::{BodyId, NVec3, ParticleStore};
pub use simulation::units::Units;

pub use configuration::config::{
    BodyConfig, EngineConfig, ForceModelConfig, IntegratorConfig, ParametersConfig,
    ScenarioConfig, UnitsConfig,
};

pub use benchmark::benchmark::{bench_force_curve, bench_force_models};
