//! Build a fully-initialized simulator from a scenario configuration.
//!
//! Takes a [`ScenarioConfig`] (the YAML-facing types) and produces a ready
//! [`Simulator`]: strategies boxed, units resolved, the gravitational
//! constant rescaled, and every configured body added to the store.

use anyhow::{bail, Context, Result};

use crate::configuration::config::{
    ForceModelConfig, IntegratorConfig, ScenarioConfig, UnitsConfig,
};
use crate::simulation::forces::{ForceModel, NewtonianGravity, NewtonianGravityBarnesHut};
use crate::simulation::integrator::{ExplicitEuler, Integrator, VelocityVerlet};
use crate::simulation::simulator::Simulator;
use crate::simulation::store::NVec3;
use crate::simulation::units::{self, Units};

/// Default opening threshold when a Barnes–Hut scenario does not set one.
const DEFAULT_THETA: f64 = 0.7;

pub fn build_simulator(cfg: ScenarioConfig) -> Result<Simulator> {
    let scales = resolve_units(cfg.parameters.units.as_ref())?;
    let softening = cfg.parameters.softening;

    let force_model: Box<dyn ForceModel> = match cfg.engine.force_model {
        ForceModelConfig::Direct => Box::new(NewtonianGravity::new(softening, scales)),
        ForceModelConfig::BarnesHut => {
            let theta = cfg.engine.theta.unwrap_or(DEFAULT_THETA);
            let mut model = NewtonianGravityBarnesHut::new(theta, softening, scales);
            if let Some(workers) = cfg.engine.workers {
                model = model.with_workers(workers);
            }
            Box::new(model)
        }
    };

    let integrator: Box<dyn Integrator> = match cfg.engine.integrator {
        IntegratorConfig::Euler => Box::new(ExplicitEuler),
        IntegratorConfig::Verlet => Box::new(VelocityVerlet::new()),
    };

    let mut sim = Simulator::new(
        cfg.parameters.dt,
        cfg.parameters.max_objects,
        integrator,
        force_model,
    );

    for (i, body) in cfg.bodies.iter().enumerate() {
        let x = vec3(&body.x).with_context(|| format!("body {i}: position"))?;
        let v = vec3(&body.v).with_context(|| format!("body {i}: velocity"))?;
        sim.add_object(body.m, body.radius, x, v)
            .with_context(|| format!("body {i}"))?;
    }

    Ok(sim)
}

/// Accept `[x, y]` (planar input, embedded at z = 0) or `[x, y, z]`.
fn vec3(components: &[f64]) -> Result<NVec3> {
    match components {
        [x, y] => Ok(NVec3::new(*x, *y, 0.0)),
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => bail!("expected 2 or 3 components, got {}", components.len()),
    }
}

fn resolve_units(cfg: Option<&UnitsConfig>) -> Result<Units> {
    let Some(cfg) = cfg else {
        return Ok(Units::SI);
    };

    let length = match cfg.length.as_str() {
        "m" | "meter" => units::METER,
        "km" | "kilometer" => units::KILOMETER,
        "au" | "astronomical_unit" => units::ASTRONOMICAL_UNIT,
        "ly" | "light_year" => units::LIGHT_YEAR,
        "pc" | "parsec" => units::PARSEC,
        other => bail!("unknown length unit {other:?}"),
    };

    let mass = match cfg.mass.as_str() {
        "kg" | "kilogram" => units::KILOGRAM,
        "msun" | "solar_mass" => units::SOLAR_MASS,
        other => bail!("unknown mass unit {other:?}"),
    };

    let time = match cfg.time.as_str() {
        "s" | "second" => units::SECOND,
        "yr" | "julian_year" => units::JULIAN_YEAR,
        other => bail!("unknown time unit {other:?}"),
    };

    Ok(Units { length, mass, time })
}
