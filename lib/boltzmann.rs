//! The Boltzmann transformation.
//!
//! Under the similarity variable `o = r / √t`, a nonlinear diffusion equation
//! on a semi-infinite domain collapses to the second-order ODE
//! ```text
//!   d  /   du \   k     du     C(u) o du
//!  -- | K --- | + - K --- = - ---------
//!  do  \   do /   o     do         2   do
//! ```
//! with `k = m - 1`. [`BoltzmannSystem`] writes this as the first-order system
//! `U = (u, v)`, `v = du/do`:
//! ```text
//! du/do = v
//! dv/do = -((C(u) o / 2 + K'(u) v) / K(u) + k / o) v
//! ```
//! along with its analytic Jacobian.

use nalgebra as na;
use crate::equation::Equation;

/// State vector `(u, du/do)`.
pub type State = na::Vector2<f64>;

/// Jacobian of the transformed system.
pub type Jacobian = na::Matrix2<f64>;

/// Compute the Boltzmann variable `o = r / √t`.
pub fn o(r: f64, t: f64) -> f64 { r / t.sqrt() }

/// Compute the position `r = o √t`.
pub fn r(o: f64, t: f64) -> f64 { o * t.sqrt() }

/// Compute the time `t = (r / o)²`.
pub fn t(o: f64, r: f64) -> f64 { (r / o).powi(2) }

/// Compute `∂o/∂r = 1 / √t`.
pub fn do_dr(_r: f64, t: f64) -> f64 { t.sqrt().recip() }

/// Compute `∂o/∂t = -o / 2t`.
pub fn do_dt(r: f64, t: f64) -> f64 { -o(r, t) / (2.0 * t) }

/// Compute the sorptivity `S = -2 K(u) du/do` given a value of the unknown and
/// the derivative with respect to `o` there.
pub fn sorptivity(eq: &Equation, val: f64, d_do: f64) -> f64 {
    -2.0 * eq.flow_diffusivity(val) * d_do
}

/// Convert a sorptivity back into a derivative with respect to `o`.
pub fn d_do_from_sorptivity(eq: &Equation, val: f64, S: f64) -> f64 {
    -S / (2.0 * eq.flow_diffusivity(val))
}

/// Estimate the boundary derivative of the solution connecting `b` to `i`
/// from the diffusivity at the boundary.
pub fn d_dob_hint(eq: &Equation, i: f64, b: f64) -> f64 {
    (i - b) / (2.0 * eq.diffusivity(b).sqrt())
}

/// First-order ODE system in `o` for an [`Equation`].
///
/// Evaluation outside the domain of the equation yields NaN components rather
/// than panicking, which integrators treat as a rejected step.
#[derive(Copy, Clone, Debug)]
pub struct BoltzmannSystem<'a> {
    eq: &'a Equation,
    k: f64,
}

impl<'a> BoltzmannSystem<'a> {
    /// Transform an equation.
    pub fn new(eq: &'a Equation) -> Self {
        Self { eq, k: eq.dim().k() }
    }

    /// Get a reference to the underlying equation.
    pub fn equation(&self) -> &'a Equation { self.eq }

    // k / o, with the planar case well-defined at o = 0
    fn radial(&self, o: f64) -> f64 {
        if self.k == 0.0 { 0.0 } else { self.k / o }
    }

    /// Evaluate `dU/do`.
    pub fn rhs(&self, o: f64, U: &State) -> State {
        let (u, v) = (U[0], U[1]);
        let Some(((K, dK, _), (C, _))) = self.eq.derivs_in_domain(u) else {
            return State::new(f64::NAN, f64::NAN);
        };
        let dv = -((C * o / 2.0 + dK * v) / K + self.radial(o)) * v;
        State::new(v, dv)
    }

    /// Evaluate the Jacobian `∂(dU/do)/∂U`.
    pub fn jacobian(&self, o: f64, U: &State) -> Jacobian {
        let (u, v) = (U[0], U[1]);
        let Some(((K, dK, d2K), (C, dC))) = self.eq.derivs_in_domain(u) else {
            return Jacobian::from_element(f64::NAN);
        };
        let a = C * o / 2.0 + dK * v;
        let ddv_du = -v * ((dC * o / 2.0 + d2K * v) / K - a * dK / K.powi(2));
        let ddv_dv = -(a + dK * v) / K - self.radial(o);
        Jacobian::new(
            0.0,    1.0,
            ddv_du, ddv_dv,
        )
    }
}
