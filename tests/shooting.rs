#![allow(non_snake_case)]

//! End-to-end tests of the shooting solvers.
//!
//! These check the physical contract of a solution: the far-field value is
//! approached and held, the boundary conditions are met, and the profile
//! moves monotonically from the boundary toward the initial value.

use std::{ f64::consts::TAU, sync::Arc };
use approx::{ assert_abs_diff_eq, assert_relative_eq };
use simplelog::{ Config, LevelFilter, SimpleLogger };
use boltzmann::{
    Dual2_64,
    DualNum,
    equation::{ Capacity, Dim, Equation },
    error::SolveError,
    problem::*,
    solution::RetCode,
    solve::{ Shooting, solve },
};

fn init_logger() {
    let _ = SimpleLogger::init(LevelFilter::Debug, Config::default());
}

// D(u) = (1 - ln u) / 2, with exact solution u = exp(-o) for b = 1, i = 0
fn exp_eq() -> Arc<Equation> {
    Arc::new(Equation::diffusion(|u: Dual2_64| (-u.ln() + 1.0) * 0.5, Dim::Planar))
}

fn const_eq(D: f64, dim: Dim) -> Arc<Equation> {
    Arc::new(Equation::diffusion(move |u: Dual2_64| u * 0.0 + D, dim))
}

#[test]
fn constant_profile_without_iterations() {
    init_logger();
    let prob = DirichletProblem::new(const_eq(2.0, Dim::Planar), 0.3, 0.3, 0.0)
        .unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert_eq!(sol.iterations(), 0);
    assert_eq!(sol.d_dob(), 0.0);
    for &o in [0.0, 0.5, 10.0, 1e3].iter() {
        assert_eq!(sol.value(o), 0.3);
        assert_eq!(sol.d_do(o), 0.0);
    }
}

#[test]
fn exponential_profile() {
    init_logger();
    let prob = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert!(sol.iterations() > 0);
    for k in 0..=200 {
        let o = 0.1 * k as f64;
        assert_abs_diff_eq!(sol.value(o), (-o).exp(), epsilon = 1e-3);
    }
    assert_abs_diff_eq!(sol.sorptivity(), 1.0, epsilon = 1e-2);
}

#[test]
fn exponential_sorptivity() {
    init_logger();
    let prob = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap();
    let shooting = Shooting { itol: Some(1e-5), ..Default::default() };
    let sol = solve(&prob.into(), &shooting).unwrap();
    assert!(sol.is_success());
    assert_abs_diff_eq!(sol.sorptivity(), 1.0, epsilon = 1e-3);
}

#[test]
fn dirichlet_cauchy_round_trip() {
    init_logger();
    let eq = exp_eq();
    let prob = DirichletProblem::new(eq.clone(), 0.0, 1.0, 0.0).unwrap();
    let shooting = Shooting::default();
    let sol = solve(&prob.into(), &shooting).unwrap();
    assert!(sol.is_success());

    let cauchy = CauchyProblem::new(eq, sol.b(), sol.d_dob(), sol.ob()).unwrap();
    let sol2 = solve(&cauchy.into(), &shooting).unwrap();
    assert!(sol2.is_success());
    assert_eq!(sol2.ob(), sol.ob());
    assert_eq!(sol2.oi(), sol.oi());
    assert_eq!(sol2.i(), sol.i());
    // the profile joins the far-field value without a jump
    assert_relative_eq!(sol.value(sol.oi()), sol.i(), epsilon = 1e-9);
    assert_relative_eq!(sol.value(sol.oi() + 1e-12), sol.value(sol.oi()), epsilon = 1e-9);
    assert_eq!(sol2.value(0.5 * sol.oi()), sol.value(0.5 * sol.oi()));
}

#[test]
fn dirichlet_monotonicity() {
    init_logger();
    let eq = Arc::new(Equation::diffusion(|u: Dual2_64| (u * 2.0).exp(), Dim::Planar));
    for &(i, b) in [(0.1, 0.9), (0.9, 0.1), (-0.5, 0.2)].iter() {
        let prob = DirichletProblem::new(eq.clone(), i, b, 0.0).unwrap();
        let sol = solve(&prob.into(), &Shooting::default()).unwrap();
        assert!(sol.is_success());
        assert_eq!(sol.d_dob().signum(), (i - b).signum());
        let oo: Vec<f64> = (0..50).map(|k| sol.oi() * k as f64 / 49.0).collect();
        for pair in oo.windows(2) {
            let (u0, u1) = (sol.value(pair[0]), sol.value(pair[1]));
            assert!((u1 - u0) * (i - b) >= -1e-6);
        }
    }
}

#[test]
fn evaluation_outside_the_profile() {
    init_logger();
    let prob = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.5).unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert_eq!(sol.ob(), 0.5);
    assert!(sol.value(0.4).is_nan());
    assert!(sol.d_do(0.4).is_nan());
    assert!(sol.at(0.4, 1.0).is_nan());
    assert_eq!(sol.value(sol.oi() + 1e-6), sol.i());
    assert_eq!(sol.value(1e6), sol.i());
    assert_eq!(sol.d_do(1e6), 0.0);
    assert_relative_eq!(sol.value(0.5), 1.0);
}

#[test]
fn initial_value_outside_domain() {
    let eq = Arc::new(Equation::diffusion(|u: Dual2_64| u, Dim::Planar));
    let prob = DirichletProblem::new(eq.clone(), -1e-3, 1.0, 0.0).unwrap();
    assert!(matches!(
        solve(&prob.into(), &Shooting::default()),
        Err(SolveError::Domain { what: "initial", .. })
    ));
    let prob = DirichletProblem::new(eq.clone(), 0.5, -1.0, 0.0).unwrap();
    assert!(matches!(
        solve(&prob.into(), &Shooting::default()),
        Err(SolveError::Domain { what: "boundary", .. })
    ));
    let prob = CauchyProblem::new(eq, 0.0, -1.0, 0.0).unwrap();
    assert!(matches!(
        solve(&prob.into(), &Shooting::default()),
        Err(SolveError::Domain { what: "boundary", .. })
    ));
}

#[test]
fn zero_flowrate() {
    init_logger();
    let prob = FlowrateProblem::new(const_eq(1.0, Dim::Cylindrical), 0.4, 0.0, 0.0)
        .unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert_eq!(sol.iterations(), 0);
    assert_eq!(sol.b(), 0.4);
    assert!(sol.ob() > 0.0);
    for &o in [1e-3, 0.5, 10.0].iter() {
        assert_eq!(sol.value(o), 0.4);
    }
}

#[test]
fn line_source() {
    init_logger();
    let eq = const_eq(1.0, Dim::Cylindrical);
    let Qb = 1e-2;
    let prob = FlowrateProblem::new(eq.clone(), 0.1, Qb, 0.0).unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert!(sol.b() > 0.1);
    assert!(sol.d_dob() < 0.0);
    assert_relative_eq!(sol.ob(), boltzmann::DEF_OBTOL);
    // imposed rate through the boundary
    let rate = -TAU * sol.ob() * eq.flow_diffusivity(sol.b()) * sol.d_dob();
    assert_relative_eq!(rate, Qb, max_relative = 1e-9);
    assert_abs_diff_eq!(sol.i(), 0.1, epsilon = 1e-3);
    assert_eq!(sol.value(sol.oi() + 1.0), sol.i());
    assert_relative_eq!(sol.value(sol.oi()), sol.i(), epsilon = 1e-9);
}

#[test]
fn sorptivity_problem() {
    init_logger();
    let prob = SorptivityProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert_relative_eq!(sol.sorptivity(), 1.0, max_relative = 1e-9);
    assert_abs_diff_eq!(sol.b(), 1.0, epsilon = 0.1);
    assert!(sol.i().abs() <= 1e-3);
    assert_eq!(sol.value(sol.oi() + 1.0), sol.i());
}

// D = 1 - u² vanishes at u = 1, so boundary values at or above 1 are outside
// the domain
fn capped_eq() -> Arc<Equation> {
    Arc::new(Equation::diffusion(|u: Dual2_64| -u.powi(2) + 1.0, Dim::Cylindrical))
}

#[test]
fn boundary_trials_outside_domain() {
    init_logger();
    // the default boundary value hint i + 1 = 1.5 is outside the domain
    let prob = FlowrateProblem::new(capped_eq(), 0.5, 1e-3, 0.0).unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert!(sol.iterations() > 1);
    assert!(sol.b() > 0.5 && sol.b() < 1.0);
    assert!(sol.d_dob() < 0.0);
    assert_abs_diff_eq!(sol.i(), 0.5, epsilon = 1e-3);
}

#[test]
fn no_trial_inside_domain() {
    init_logger();
    let prob = FlowrateProblem::new(capped_eq(), 0.5, 1e-3, 0.0).unwrap();
    let shooting = Shooting { maxiters: Some(1), ..Default::default() };
    let sol = solve(&prob.into(), &shooting).unwrap();
    assert_eq!(sol.retcode(), RetCode::MaxIters);
    assert_eq!(sol.iterations(), 1);
    // falls back to the constant profile at i
    assert_eq!(sol.b(), 0.5);
    assert_eq!(sol.d_dob(), 0.0);
    assert_eq!(sol.i(), 0.5);
    assert_eq!(sol.value(1.0), 0.5);
}

#[test]
fn sorptivity_cauchy() {
    let prob = SorptivityCauchyProblem::new(exp_eq(), 1.0, 0.8, 0.0).unwrap();
    let sol = solve(&prob.into(), &Shooting::default()).unwrap();
    assert!(sol.is_success());
    assert_relative_eq!(sol.sorptivity(), 0.8, max_relative = 1e-12);
    assert!(sol.i() > 0.0 && sol.i() < 1.0);
}

#[test]
fn richards_matches_diffusion() {
    init_logger();
    let K = |h: Dual2_64| h.exp();
    let diffusion = Arc::new(Equation::diffusion(K, Dim::Planar));
    let richards = Arc::new(
        Equation::richards(K, Capacity::Const(1.0), Dim::Planar).unwrap());
    let halved = Arc::new(
        Equation::richards(K, Capacity::Const(2.0), Dim::Planar).unwrap());
    let solve_eq = |eq: Arc<Equation>| {
        let prob = DirichletProblem::new(eq, -2.0, 0.0, 0.0).unwrap();
        solve(&prob.into(), &Shooting::default()).unwrap().converged().unwrap()
    };
    let sol_d = solve_eq(diffusion);
    let sol_r = solve_eq(richards);
    assert_eq!(sol_d.d_dob(), sol_r.d_dob());
    assert_eq!(sol_d.oi(), sol_r.oi());

    // doubling the capacity halves the diffusivity: u(o) = U(o √2)
    let sol_h = solve_eq(halved);
    assert_abs_diff_eq!(sol_h.value(1.0), sol_d.value(2.0_f64.sqrt()), epsilon = 1e-2);
}

#[test]
fn configuration_errors() {
    let prob: Problem
        = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap().into();
    let shooting = Shooting { itol: Some(f64::NAN), ..Default::default() };
    assert!(matches!(solve(&prob, &shooting), Err(SolveError::BadTolerance(_))));
    let shooting = Shooting { hint: Some(0.5), ..Default::default() };
    assert!(matches!(solve(&prob, &shooting), Err(SolveError::HintSign { .. })));
    let sol = solve(&prob, &Shooting { maxiters: Some(2), ..Default::default() })
        .unwrap();
    assert_eq!(sol.retcode(), RetCode::MaxIters);
    assert!(sol.converged().is_err());
}
