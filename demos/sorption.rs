use std::sync::Arc;
use ndarray as nd;
use simplelog::{ ColorChoice, Config, LevelFilter, TermLogger, TerminalMode };
use boltzmann::{
    Dual2_64,
    DualNum,
    boltzmann::o,
    equation::{ Dim, Equation },
    problem::{ DirichletProblem, FlowrateProblem },
    solve::{ Shooting, solve },
};

// absorption into a planar medium with a closed-form profile, and injection
// from a line source into a cylindrical medium

fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).expect("failed to initialize logger");

    // D(u) = (1 - ln u) / 2 admits u(o) = exp(-o) for b = 1, i = 0
    let planar = Arc::new(
        Equation::diffusion(|u: Dual2_64| (-u.ln() + 1.0) * 0.5, Dim::Planar));
    let prob = DirichletProblem::new(planar, 0.0, 1.0, 0.0)
        .expect("invalid problem");
    let sol = solve(&prob.into(), &Shooting::default())
        .and_then(|sol| sol.converged())
        .expect("planar problem did not converge");
    println!(
        "planar: {} iterations; d_dob = {:.6}; S = {:.6}; oi = {:.3}",
        sol.iterations(), sol.d_dob(), sol.sorptivity(), sol.oi(),
    );
    let oo: nd::Array1<f64> = nd::Array1::linspace(0.0, 5.0, 11);
    for &ok in oo.iter() {
        println!(
            "  o = {:.2}: u = {:.6} (exact {:.6})",
            ok, sol.value(ok), (-ok).exp(),
        );
    }
    // the same profile in physical coordinates
    let t = 4.0;
    for &r in [0.5, 1.0, 2.0].iter() {
        println!(
            "  r = {:.1}, t = {:.1} (o = {:.2}): u = {:.6}, flux = {:.6}",
            r, t, o(r, t), sol.at(r, t), sol.flux(r, t),
        );
    }

    // line source with a conductivity rising with the unknown
    let radial = Arc::new(
        Equation::diffusion(|u: Dual2_64| u.powi(2) * 4.0 + 0.5, Dim::Cylindrical)
            .with_label("θ"));
    let prob = FlowrateProblem::new(radial, 0.1, 1e-2, 0.0)
        .expect("invalid problem");
    let sol = solve(&prob.into(), &Shooting::default())
        .and_then(|sol| sol.converged())
        .expect("radial problem did not converge");
    println!(
        "cylindrical: {} iterations; b = {:.6}; ob = {:.1e}; oi = {:.3}",
        sol.iterations(), sol.b(), sol.ob(), sol.oi(),
    );
    let oo: nd::Array1<f64> = nd::Array1::logspace(10.0, -5.0, 1.0, 13);
    for &ok in oo.iter() {
        println!("  o = {:.1e}: {} = {:.6}", ok, sol.eq().label(), sol.value(ok));
    }
}
