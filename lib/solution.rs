//! Solutions of semi-infinite problems in the Boltzmann variable.
//!
//! A [`Solution`] keeps the collocation polynomials of every accepted
//! integrator step between the boundary `ob` and the point `oi` where the
//! profile settled. Outside of that range it is extended by the physical
//! conditions of the problem: the initial value `i` for `o > oi`, and NaN for
//! `o < ob`, where the domain does not exist.

use std::sync::Arc;
use ndarray as nd;
use crate::{
    boltzmann,
    equation::Equation,
    error::SolveError,
    interp,
    ode::Integrator,
    solve::SolveResult,
};

/// Outcome of a solver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetCode {
    /// The solution meets its tolerance.
    Success,
    /// The iteration limit was exhausted before the tolerance was met.
    MaxIters,
    /// Integration ended without the profile settling.
    Unsettled,
}

impl RetCode {
    /// Return `true` if `self` is `Success`.
    pub fn is_success(self) -> bool { self == Self::Success }
}

/// Solution of a problem as a function of the Boltzmann variable `o`.
///
/// ```
/// use std::sync::Arc;
/// use boltzmann::{ Dual2_64, DualNum };
/// use boltzmann::equation::{ Dim, Equation };
/// use boltzmann::problem::CauchyProblem;
/// use boltzmann::solve::{ Shooting, solve };
///
/// let eq = Arc::new(Equation::diffusion(|u: Dual2_64| (-u.ln() + 1.0) * 0.5, Dim::Planar));
/// let prob = CauchyProblem::new(eq, 1.0, -0.9, 0.0).unwrap();
/// let sol = solve(&prob.into(), &Shooting::default()).unwrap();
/// assert!(sol.is_success());
/// assert!(sol.value(-1.0).is_nan());
/// assert_eq!(sol.value(sol.oi() + 1.0), sol.i());
/// assert!((sol.sorptivity() - 0.9).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct Solution {
    eq: Arc<Equation>,
    b: f64,
    i: f64,
    ob: f64,
    oi: f64,
    d_dob: f64,
    iterations: usize,
    retcode: RetCode,
    // step breakpoints and the values there
    o: nd::Array1<f64>,
    u: nd::Array1<f64>,
    // collocation nodes, one row per step
    o_nodes: nd::Array2<f64>,
    u_nodes: nd::Array2<f64>,
    v_nodes: nd::Array2<f64>,
}

impl Solution {
    /// Collect the current run of an integrator, assigning `i` as the value
    /// approached beyond the run.
    pub(crate) fn from_integrator(
        eq: Arc<Equation>,
        integ: &Integrator,
        i: f64,
        iterations: usize,
        retcode: RetCode,
    ) -> Self
    {
        let steps = integ.steps();
        let n = steps.len();
        let o: nd::Array1<f64>
            = std::iter::once(integ.ob())
            .chain(steps.iter().map(|step| step.t1()))
            .collect();
        let u: nd::Array1<f64>
            = std::iter::once(integ.b())
            .chain(steps.iter().map(|step| step.y1()[0]))
            .collect();
        let o_nodes
            = nd::Array2::from_shape_fn((n, 4), |(k, j)| steps[k].nodes_t()[j]);
        let u_nodes
            = nd::Array2::from_shape_fn((n, 4), |(k, j)| steps[k].nodes_y(0)[j]);
        let v_nodes
            = nd::Array2::from_shape_fn((n, 4), |(k, j)| steps[k].nodes_y(1)[j]);
        Self {
            eq,
            b: integ.b(),
            i,
            ob: integ.ob(),
            oi: integ.o_end(),
            d_dob: integ.d_dob(),
            iterations,
            retcode,
            o,
            u,
            o_nodes,
            u_nodes,
            v_nodes,
        }
    }

    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> { &self.eq }

    /// Get the boundary value.
    pub fn b(&self) -> f64 { self.b }

    /// Get the initial value.
    pub fn i(&self) -> f64 { self.i }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Get the position beyond which the solution equals the initial value.
    pub fn oi(&self) -> f64 { self.oi }

    /// Get the derivative `du/do` at the boundary.
    pub fn d_dob(&self) -> f64 { self.d_dob }

    /// Get the number of shooting iterations.
    pub fn iterations(&self) -> usize { self.iterations }

    /// Get the return code.
    pub fn retcode(&self) -> RetCode { self.retcode }

    /// Return `true` if the solution meets its tolerance.
    pub fn is_success(&self) -> bool { self.retcode.is_success() }

    /// Return `self` if successful, otherwise
    /// [`SolveError::SolvingFailed`].
    pub fn converged(self) -> SolveResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SolveError::SolvingFailed {
                retcode: self.retcode,
                iterations: self.iterations,
            })
        }
    }

    /// Get the integrator step breakpoints in `o`, starting at `ob`.
    pub fn o(&self) -> nd::ArrayView1<'_, f64> { self.o.view() }

    /// Get the values of the solution at the step breakpoints.
    pub fn u(&self) -> nd::ArrayView1<'_, f64> { self.u.view() }

    fn interpolate(&self, nodes: &nd::Array2<f64>, o: f64) -> Option<f64> {
        let k = interp::locate(&self.o, o)?;
        interp::lagrange(&self.o_nodes.row(k), &nodes.row(k), o).ok()
    }

    /// Evaluate the solution at `o`.
    pub fn value(&self, o: f64) -> f64 {
        if o.is_nan() || o < self.ob { return f64::NAN; }
        if o > self.oi { return self.i; }
        self.interpolate(&self.u_nodes, o).unwrap_or(self.b)
    }

    /// Evaluate `du/do` at `o`.
    pub fn d_do(&self, o: f64) -> f64 {
        if o.is_nan() || o < self.ob { return f64::NAN; }
        if o > self.oi { return 0.0; }
        self.interpolate(&self.v_nodes, o).unwrap_or(self.d_dob)
    }

    /// Evaluate the solution at position `r` and time `t`.
    pub fn at(&self, r: f64, t: f64) -> f64 { self.value(boltzmann::o(r, t)) }

    /// Evaluate `∂u/∂r` at position `r` and time `t`.
    pub fn d_dr(&self, r: f64, t: f64) -> f64 {
        self.d_do(boltzmann::o(r, t)) * boltzmann::do_dr(r, t)
    }

    /// Evaluate `∂u/∂t` at position `r` and time `t`.
    pub fn d_dt(&self, r: f64, t: f64) -> f64 {
        self.d_do(boltzmann::o(r, t)) * boltzmann::do_dt(r, t)
    }

    /// Evaluate the flux `-K(u) ∂u/∂r` at position `r` and time `t`.
    pub fn flux(&self, r: f64, t: f64) -> f64 {
        let d_dr = self.d_dr(r, t);
        // K may be infinite at a settled limit value
        if d_dr == 0.0 { return 0.0; }
        -self.eq.flow_diffusivity(self.at(r, t)) * d_dr
    }

    /// Compute the sorptivity at the boundary.
    pub fn sorptivity(&self) -> f64 { self.sorptivity_at(self.ob) }

    /// Compute the sorptivity `-2 K(u) du/do` at `o`.
    pub fn sorptivity_at(&self, o: f64) -> f64 {
        boltzmann::sorptivity(&self.eq, self.value(o), self.d_do(o))
    }
}
