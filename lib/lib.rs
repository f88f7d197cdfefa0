#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for the solution of
//! nonlinear diffusion problems on semi-infinite domains via the Boltzmann
//! similarity transformation and the shooting method.
//!
//! Equations of the form
//! ```text
//! ∂u
//! -- = ∇·(D(u) ∇u)
//! ∂t
//! ```
//! (or the Richards form `C(h) ∂h/∂t = ∇·(K(h) ∇h)`) in planar, cylindrical,
//! or spherical geometry reduce under `o = r / √t` to an ODE in `o` alone,
//! which is integrated with a stiff implicit Runge-Kutta method[^1] while an
//! unknown boundary condition is adjusted until the profile settles at the
//! required initial value.
//!
//! Supported problems:
//! - Dirichlet: known initial and boundary values
//! - Flow rate: known initial value and imposed flow rate (cylindrical)
//! - Sorptivity: known initial value and sorptivity
//! - Cauchy: known boundary value and derivative (or sorptivity)
//!
//! ```
//! use std::sync::Arc;
//! use boltzmann::{ Dual2_64, DualNum };
//! use boltzmann::equation::{ Dim, Equation };
//! use boltzmann::problem::DirichletProblem;
//! use boltzmann::solve::{ Shooting, solve };
//!
//! // u(o) = exp(-o) solves this equation with b = 1, i = 0
//! let eq = Arc::new(Equation::diffusion(|u: Dual2_64| (-u.ln() + 1.0) * 0.5, Dim::Planar));
//! let prob = DirichletProblem::new(eq, 0.0, 1.0, 0.0).unwrap();
//! let sol = solve(&prob.into(), &Shooting::default()).unwrap().converged().unwrap();
//! assert!((sol.value(1.0) - (-1.0_f64).exp()).abs() < 1e-2);
//! ```
//!
//! See [`docs`] for theoretical background.
//!
//! [^1]: E. Hairer and G. Wanner, *Solving Ordinary Differential Equations II:
//! Stiff and Differential-Algebraic Problems*, 2nd ed. (Springer, 1996).

pub mod error;
pub mod equation;
pub mod boltzmann;
pub mod interp;
pub mod radau;
pub mod ode;
pub mod bracket;
pub mod problem;
pub mod solution;
pub mod solve;

pub mod docs;

pub use num_dual::{ Dual2_64, DualNum };
pub use equation::{ Capacity, Dim, Equation };
pub use problem::{
    CauchyProblem,
    DirichletProblem,
    FlowrateProblem,
    Problem,
    SorptivityCauchyProblem,
    SorptivityProblem,
};
pub use solution::{ RetCode, Solution };
pub use solve::{ Shooting, Solver, solve };

/// Default absolute tolerance on the settled value in shooting.
pub const DEF_ITOL: f64 = 1e-3;
/// Default maximum number of shooting trials.
pub const DEF_MAXITERS: usize = 100;
/// Default boundary position substituted for a radial point boundary.
pub const DEF_OBTOL: f64 = 1e-6;
/// Default maximum number of integrator step attempts.
pub const DEF_MAX_STEPS: usize = 1000;
/// Default relative integrator tolerance.
pub const DEF_RTOL: f64 = 1e-6;
/// Default absolute integrator tolerance.
pub const DEF_ATOL: f64 = 1e-8;

// sign with sign(0) = 0; NaN maps to 0
pub(crate) fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
