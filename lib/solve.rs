//! Shooting solvers for problems in the Boltzmann variable.
//!
//! Every semi-infinite problem is reduced to a sequence of [Cauchy
//! problems][CauchyProblem] that are integrated until the profile settles.
//! The unknown boundary condition is then adjusted by a [bracket-and-bisect
//! search][BracketBisect] on the mismatch between the settled value and the
//! required initial value `i`:
//!
//! | Problem                       | Search variable         |
//! |-------------------------------|-------------------------|
//! | [`DirichletProblem`]          | boundary derivative     |
//! | [`FlowrateProblem`]           | boundary value          |
//! | [`SorptivityProblem`]         | boundary value          |
//! | [`CauchyProblem`]             | (single integration)    |
//! | [`SorptivityCauchyProblem`]   | (single integration)    |
//!
//! The initial value stored in a returned [`Solution`] is the value the
//! accepted trajectory settled at, which lies within `itol` of the required
//! one.
//!
//! A trial whose trajectory never settles (because it ran past `i` by more
//! than the tolerance, or could not be continued) is assigned an infinite
//! residual in the direction of the overshoot.
//!
//! ```
//! use std::sync::Arc;
//! use boltzmann::Dual2_64;
//! use boltzmann::equation::{ Dim, Equation };
//! use boltzmann::problem::DirichletProblem;
//! use boltzmann::solve::{ Shooting, solve };
//!
//! let eq = Arc::new(Equation::diffusion(|u: Dual2_64| u * 0.0 + 1.0, Dim::Planar));
//! let prob = DirichletProblem::new(eq, 0.0, 1.0, 0.0).unwrap();
//! let sol = solve(&prob.into(), &Shooting::default()).unwrap();
//! assert!(sol.is_success());
//! // u = erfc(o / 2) for constant unit diffusivity
//! assert!((sol.d_dob() + 1.0 / std::f64::consts::PI.sqrt()).abs() < 1e-2);
//! ```

use std::sync::Arc;
use log::{ debug, info, warn };
use crate::{
    DEF_ITOL,
    DEF_MAXITERS,
    DEF_OBTOL,
    boltzmann,
    bracket::BracketBisect,
    equation::Equation,
    error::{ ProblemError, SolveError },
    ode::{ BoltzmannOde, Integrator, Status },
    problem::*,
    sign,
    solution::{ RetCode, Solution },
};

pub type SolveResult<T> = Result<T, SolveError>;

/// An algorithm that solves any [`Problem`].
pub trait Solver {
    /// Solve a problem.
    fn solve(&self, problem: &Problem) -> SolveResult<Solution>;
}

/// Shooting method settings.
///
/// Unset fields take their default values:
/// - `itol`: [`DEF_ITOL`][crate::DEF_ITOL]
/// - `maxiters`: [`DEF_MAXITERS`][crate::DEF_MAXITERS]
/// - `obtol`: [`DEF_OBTOL`][crate::DEF_OBTOL]
#[derive(Clone, Debug, Default)]
pub struct Shooting {
    /// Initial guess for the searched boundary condition: the boundary
    /// derivative for [`DirichletProblem`]s, or the boundary value for
    /// [`FlowrateProblem`]s and [`SorptivityProblem`]s. Ignored for Cauchy
    /// problems.
    ///
    /// Derivative hints default to an estimate from the diffusivity at the
    /// boundary; boundary value hints default to `i - sign(i - b)`.
    pub hint: Option<f64>,
    /// Absolute tolerance on the settled value.
    pub itol: Option<f64>,
    /// Maximum number of shooting trials.
    pub maxiters: Option<usize>,
    /// Boundary position substituted for a point boundary (`ob = 0`) in
    /// radial problems.
    pub obtol: Option<f64>,
    /// Integrator settings.
    pub ode: BoltzmannOde,
}

// settled value minus target, or an overshoot
fn residual(status: Status, u_end: f64, i: f64, m: f64) -> f64 {
    if status.is_settled() { u_end - i } else { m * f64::INFINITY }
}

// the far-field value a trajectory actually reached, or the target if it
// never settled
fn settled_value(integ: &Integrator, i: f64) -> f64 {
    if integ.status().is_settled() { integ.u_end() } else { i }
}

fn check_boundary(eq: &Equation, b: f64) -> SolveResult<()> {
    eq.isindomain(b).then_some(())
        .ok_or(SolveError::Domain { what: "boundary", value: b })
}

fn check_initial(eq: &Equation, i: f64) -> SolveResult<()> {
    eq.is_limit_value(i).then_some(())
        .ok_or(SolveError::Domain { what: "initial", value: i })
}

impl Shooting {
    fn itol(&self) -> SolveResult<f64> {
        let itol = self.itol.unwrap_or(DEF_ITOL);
        SolveError::check_tolerance(itol)?;
        Ok(itol)
    }

    fn maxiters(&self) -> SolveResult<usize> {
        let maxiters = self.maxiters.unwrap_or(DEF_MAXITERS);
        SolveError::check_maxiters(maxiters)?;
        Ok(maxiters)
    }

    fn obtol(&self) -> SolveResult<f64> {
        let obtol = self.obtol.unwrap_or(DEF_OBTOL);
        SolveError::check_tolerance(obtol)?;
        (obtol > 0.0).then_some(()).ok_or(ProblemError::RadialPointBoundary)?;
        Ok(obtol)
    }

    // the trivial solution from a zero boundary derivative
    fn constant(eq: &Arc<Equation>, integ: &mut Integrator, b: f64, i: f64)
        -> Solution
    {
        integ.reinit(b, 0.0);
        integ.run();
        info!("constant solution {} = {:e}", eq.label(), i);
        Solution::from_integrator(eq.clone(), integ, i, 0, RetCode::Success)
    }

    /// Integrate a [`CauchyProblem`] until the profile settles.
    ///
    /// The initial value of the solution is the settled value; if the
    /// profile does not settle, the solution carries
    /// [`RetCode::Unsettled`].
    pub fn solve_cauchy(&self, prob: &CauchyProblem) -> SolveResult<Solution> {
        check_boundary(prob.eq(), prob.b())?;
        let mut integ = self.ode.init(prob, None)?;
        let status = integ.run();
        let retcode = if status.is_settled() {
            RetCode::Success
        } else {
            warn!(
                "solve::solve_cauchy: integration ended with {:?} at o = {:e}",
                status, integ.o_end(),
            );
            RetCode::Unsettled
        };
        Ok(Solution::from_integrator(
            prob.eq().clone(), &integ, integ.u_end(), 0, retcode))
    }

    /// Integrate a [`SorptivityCauchyProblem`] until the profile settles.
    pub fn solve_sorptivity_cauchy(&self, prob: &SorptivityCauchyProblem)
        -> SolveResult<Solution>
    {
        check_boundary(prob.eq(), prob.b())?;
        self.solve_cauchy(&prob.to_cauchy()?)
    }

    /// Solve a [`DirichletProblem`] by searching over the boundary
    /// derivative.
    pub fn solve_dirichlet(&self, prob: &DirichletProblem)
        -> SolveResult<Solution>
    {
        let itol = self.itol()?;
        let maxiters = self.maxiters()?;
        let eq = prob.eq();
        let (i, b) = (prob.i(), prob.b());
        check_boundary(eq, b)?;
        check_initial(eq, i)?;

        let m = prob.monotonicity();
        let mut integ = self.ode.arena(eq, prob.ob(), Some(i + m * itol))?;
        if (b - i).abs() <= itol {
            return Ok(Self::constant(eq, &mut integ, b, i));
        }

        let hint = match self.hint {
            Some(hint) => {
                (sign(hint) == m).then_some(())
                    .ok_or(SolveError::HintSign { hint, expected: m })?;
                hint
            },
            None => boltzmann::d_dob_hint(eq, i, b),
        };
        let mut search = BracketBisect::new(0.0, b - i, hint)?;
        let mut d_dob = search.next_x();
        for iter in 1..=maxiters {
            integ.reinit(b, d_dob);
            let status = integ.run();
            let resid = residual(status, integ.u_end(), i, m);
            debug!(
                "solve::solve_dirichlet: trial {}: d_dob = {:e}; {:?}, residual = {:e}",
                iter, d_dob, status, resid,
            );
            if resid.abs() <= itol {
                info!(
                    "solve::solve_dirichlet: converged in {} iterations; d_dob = {:e}",
                    iter, d_dob,
                );
                return Ok(Solution::from_integrator(
                    eq.clone(), &integ, integ.u_end(), iter, RetCode::Success));
            }
            d_dob = search.feed(resid);
        }
        warn!(
            "solve::solve_dirichlet: reached maxiters = {}; last d_dob = {:e}",
            maxiters, integ.d_dob(),
        );
        let i_end = settled_value(&integ, i);
        Ok(Solution::from_integrator(
            eq.clone(), &integ, i_end, maxiters, RetCode::MaxIters))
    }

    /// Solve a [`FlowrateProblem`] by searching over the boundary value.
    ///
    /// A point boundary (`ob = 0`) is moved to `ob = obtol`.
    pub fn solve_flowrate(&self, prob: &FlowrateProblem)
        -> SolveResult<Solution>
    {
        let itol = self.itol()?;
        let maxiters = self.maxiters()?;
        let ob = if prob.ob() > 0.0 { prob.ob() } else { self.obtol()? };
        let eq = prob.eq();
        let i = prob.i();
        check_initial(eq, i)?;

        let m = prob.monotonicity();
        let mut integ = self.ode.arena(eq, ob, Some(i + m * itol))?;
        if m == 0.0 {
            return Ok(Self::constant(eq, &mut integ, i, i));
        }
        self.shoot_boundary(
            "solve_flowrate", eq, &mut integ, i, m, itol, maxiters,
            |b| prob.d_dob(b, ob),
        )
    }

    /// Solve a [`SorptivityProblem`] by searching over the boundary value.
    pub fn solve_sorptivity(&self, prob: &SorptivityProblem)
        -> SolveResult<Solution>
    {
        let itol = self.itol()?;
        let maxiters = self.maxiters()?;
        let eq = prob.eq();
        let i = prob.i();
        check_initial(eq, i)?;

        let m = prob.monotonicity();
        let mut integ = self.ode.arena(eq, prob.ob(), Some(i + m * itol))?;
        if m == 0.0 {
            return Ok(Self::constant(eq, &mut integ, i, i));
        }
        self.shoot_boundary(
            "solve_sorptivity", eq, &mut integ, i, m, itol, maxiters,
            |b| prob.d_dob(b),
        )
    }

    // search over the boundary value b; `d_dob` gives the boundary derivative
    // imposed for a given b
    #[allow(clippy::too_many_arguments)]
    fn shoot_boundary<F>(
        &self,
        name: &str,
        eq: &Arc<Equation>,
        integ: &mut Integrator,
        i: f64,
        m: f64,
        itol: f64,
        maxiters: usize,
        d_dob: F,
    ) -> SolveResult<Solution>
    where F: Fn(f64) -> f64
    {
        let hint = match self.hint {
            Some(hint) => {
                (sign(i - hint) == m).then_some(())
                    .ok_or(SolveError::HintSign { hint, expected: m })?;
                hint
            },
            None => i - m,
        };
        // a profile starting at i with nonzero slope runs past i
        let mut search = BracketBisect::new(i, m * f64::INFINITY, hint)?;
        let mut b = search.next_x();
        for iter in 1..=maxiters {
            let resid = if eq.isindomain(b) {
                integ.reinit(b, d_dob(b));
                let status = integ.run();
                let resid = residual(status, integ.u_end(), i, m);
                debug!(
                    "solve::{}: trial {}: b = {:e}; {:?}, residual = {:e}",
                    name, iter, b, status, resid,
                );
                resid
            } else {
                debug!(
                    "solve::{}: trial {}: b = {:e} is outside the domain",
                    name, iter, b,
                );
                -m * f64::INFINITY
            };
            if resid.abs() <= itol {
                info!(
                    "solve::{}: converged in {} iterations; b = {:e}",
                    name, iter, b,
                );
                let i_end = integ.u_end();
                return Ok(Solution::from_integrator(
                    eq.clone(), integ, i_end, iter, RetCode::Success));
            }
            b = search.feed(resid);
        }
        if integ.status() == Status::Idle {
            integ.reinit(i, 0.0);
            integ.run();
        }
        warn!(
            "solve::{}: reached maxiters = {}; last b = {:e}",
            name, maxiters, integ.b(),
        );
        let i_end = settled_value(integ, i);
        Ok(Solution::from_integrator(
            eq.clone(), integ, i_end, maxiters, RetCode::MaxIters))
    }
}

impl Solver for Shooting {
    fn solve(&self, problem: &Problem) -> SolveResult<Solution> {
        match problem {
            Problem::Dirichlet(prob) => self.solve_dirichlet(prob),
            Problem::Flowrate(prob) => self.solve_flowrate(prob),
            Problem::Cauchy(prob) => self.solve_cauchy(prob),
            Problem::SorptivityCauchy(prob)
                => self.solve_sorptivity_cauchy(prob),
            Problem::Sorptivity(prob) => self.solve_sorptivity(prob),
        }
    }
}

/// Master solving function for all [solvers][Solver].
pub fn solve<S>(problem: &Problem, solver: &S) -> SolveResult<Solution>
where S: Solver + ?Sized
{
    solver.solve(problem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_dual::{ Dual2_64, DualNum };
    use crate::equation::Dim;

    fn exp_eq() -> Arc<Equation> {
        Arc::new(Equation::diffusion(|u: Dual2_64| (-u.ln() + 1.0) * 0.5, Dim::Planar))
    }

    fn const_eq(dim: Dim) -> Arc<Equation> {
        Arc::new(Equation::diffusion(|u: Dual2_64| u * 0.0 + 1.0, dim))
    }

    #[test]
    fn residual_sign() {
        assert_eq!(residual(Status::Settled, 0.3, 0.1, -1.0), 0.3 - 0.1);
        assert_eq!(residual(Status::PastLimit, 0.3, 0.1, -1.0), f64::NEG_INFINITY);
        assert_eq!(residual(Status::StepUnderflow, 0.3, 0.1, 1.0), f64::INFINITY);
    }

    #[test]
    fn bad_settings() {
        let prob = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap();
        let shooting = Shooting { itol: Some(-1.0), ..Default::default() };
        assert!(matches!(
            shooting.solve_dirichlet(&prob), Err(SolveError::BadTolerance(_))));
        let shooting = Shooting { maxiters: Some(0), ..Default::default() };
        assert!(matches!(
            shooting.solve_dirichlet(&prob), Err(SolveError::BadMaxiters(0))));
        let shooting = Shooting { hint: Some(1.0), ..Default::default() };
        assert!(matches!(
            shooting.solve_dirichlet(&prob),
            Err(SolveError::HintSign { expected, .. }) if expected == -1.0
        ));
    }

    #[test]
    fn boundary_value_hint_sign() {
        let prob = FlowrateProblem::new(const_eq(Dim::Cylindrical), 0.0, 1e-2, 0.0)
            .unwrap();
        // injection raises the boundary value above i
        let shooting = Shooting { hint: Some(-1.0), ..Default::default() };
        assert!(matches!(
            shooting.solve_flowrate(&prob), Err(SolveError::HintSign { .. })));
    }

    #[test]
    fn cauchy_counts_no_iterations() {
        let prob = CauchyProblem::new(exp_eq(), 1.0, -0.5, 0.0).unwrap();
        let sol = Shooting::default().solve_cauchy(&prob).unwrap();
        assert!(sol.is_success());
        assert_eq!(sol.iterations(), 0);
        assert_relative_eq!(sol.i(), sol.value(sol.oi()), epsilon = 1e-9);
        assert!(sol.i() > 0.0 && sol.i() < 1.0);
    }

    #[test]
    fn reports_the_settled_value() {
        let prob = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap();
        let sol = Shooting::default().solve_dirichlet(&prob).unwrap();
        assert!(sol.is_success());
        assert!(sol.i().abs() <= DEF_ITOL);
        // no jump where the profile joins the far field
        assert_relative_eq!(sol.value(sol.oi()), sol.i(), epsilon = 1e-9);
        assert_eq!(sol.value(sol.oi() + 1e-12), sol.i());
    }

    #[test]
    fn maxiters_gives_best_effort() {
        let prob = DirichletProblem::new(exp_eq(), 0.0, 1.0, 0.0).unwrap();
        let shooting = Shooting { maxiters: Some(1), ..Default::default() };
        let sol = solve(&prob.into(), &shooting).unwrap();
        assert_eq!(sol.retcode(), RetCode::MaxIters);
        assert_eq!(sol.iterations(), 1);
        assert!(matches!(
            sol.converged(),
            Err(SolveError::SolvingFailed { retcode: RetCode::MaxIters, iterations: 1 })
        ));
    }
}
