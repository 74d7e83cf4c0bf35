use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use nbtree::{bench_force_curve, bench_force_models, build_simulator, ScenarioConfig};

#[derive(Parser, Debug)]
#[command(about = "Headless n-body simulation runner")]
struct Args {
    /// Scenario file (YAML)
    #[arg(short, long, default_value = "scenarios/two_body.yaml")]
    file: PathBuf,

    /// Override the step count derived from the scenario's t_end
    #[arg(long)]
    steps: Option<u64>,

    /// Log energies every this many steps
    #[arg(long, default_value_t = 1000)]
    report_every: u64,

    /// Run the force-model timing sweep instead of a scenario
    #[arg(long)]
    bench: bool,

    /// With --bench, emit the fine-grained CSV curve
    #[arg(long)]
    curve: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        if args.curve {
            bench_force_curve();
        } else {
            bench_force_models();
        }
        return Ok(());
    }

    let file = File::open(&args.file)
        .with_context(|| format!("opening scenario {}", args.file.display()))?;
    let cfg: ScenarioConfig = serde_yaml::from_reader(BufReader::new(file))?;
    debug!("loaded scenario: {cfg:?}");

    let dt = cfg.parameters.dt;
    let t_end = cfg.parameters.t_end;
    let mut sim = build_simulator(cfg)?;

    let steps = args
        .steps
        .or_else(|| t_end.map(|t| (t / dt).ceil() as u64))
        .unwrap_or(1000);

    info!(
        "running {} bodies for {} steps, dt = {}",
        sim.n_objects(),
        steps,
        dt
    );

    let e0 = sim.total_energy();
    for _ in 0..steps {
        sim.compute_forces()?;
        sim.step();

        if args.report_every > 0 && sim.iteration() % args.report_every == 0 {
            let e = sim.total_energy();
            info!(
                "step {:8}  E = {:+.6e}  drift = {:+.3e}",
                sim.iteration(),
                e,
                e - e0
            );
        }
    }

    let e1 = sim.total_energy();
    println!("steps completed: {}", sim.iteration());
    println!("kinetic energy:   {:+.6e}", sim.total_kinetic_energy());
    println!("potential energy: {:+.6e}", sim.total_potential_energy());
    println!("total energy:     {:+.6e}  (drift {:+.3e})", e1, e1 - e0);

    Ok(())
}
