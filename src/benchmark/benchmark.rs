//! Timing sweeps comparing the direct and Barnes–Hut force models.
//!
//! Output is plain CSV-ish lines on stdout, ready to paste into a plot.

use std::time::Instant;

use crate::simulation::forces::{ForceModel, NewtonianGravity, NewtonianGravityBarnesHut};
use crate::simulation::store::NVec3;
use crate::simulation::units::Units;

/// Deterministic body cloud of size `n`; no rand needed.
fn make_cloud(n: usize) -> (Vec<NVec3>, Vec<f64>) {
    let mut pos = Vec::with_capacity(n);
    let mut mass = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        pos.push(NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        ));
        mass.push(1.0e9);
    }

    (pos, mass)
}

/// One direct-vs-tree comparison per system size.
pub fn bench_force_models() {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let (pos, mass) = make_cloud(n);
        let mut acc = vec![NVec3::zeros(); n];

        let mut direct = NewtonianGravity::new(1e-2, Units::SI);
        let mut tree = NewtonianGravityBarnesHut::new(0.7, 1e-2, Units::SI);

        // Warm up both models (and the tree arena) once.
        let _ = direct.compute_forces(&mut acc, &pos, &mass);
        let _ = tree.compute_forces(&mut acc, &pos, &mass);

        let t0 = Instant::now();
        let _ = direct.compute_forces(&mut acc, &pos, &mass);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let _ = tree.compute_forces(&mut acc, &pos, &mass);
        let dt_tree = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s, barnes-hut = {dt_tree:8.6} s");
    }
}

/// Finer-grained curve for plotting, CSV on stdout.
pub fn bench_force_curve() {
    println!("N,direct_ms,barnes_hut_ms");

    for n in (200..=12800).step_by(200) {
        // Average small systems over a few evaluations to smooth noise;
        // a single evaluation is plenty once n is large.
        let evals_direct = if n <= 800 { 5 } else { 1 };
        let evals_tree = if n <= 2000 { 3 } else { 1 };

        let (pos, mass) = make_cloud(n);
        let mut acc = vec![NVec3::zeros(); n];

        let mut direct = NewtonianGravity::new(1e-2, Units::SI);
        let mut tree = NewtonianGravityBarnesHut::new(0.7, 1e-2, Units::SI);

        let t0 = Instant::now();
        for _ in 0..evals_direct {
            let _ = direct.compute_forces(&mut acc, &pos, &mass);
        }
        let ms_direct = t0.elapsed().as_secs_f64() * 1000.0 / evals_direct as f64;

        let t1 = Instant::now();
        for _ in 0..evals_tree {
            let _ = tree.compute_forces(&mut acc, &pos, &mass);
        }
        let ms_tree = t1.elapsed().as_secs_f64() * 1000.0 / evals_tree as f64;

        println!("{n},{ms_direct:.6},{ms_tree:.6}");
    }
}
