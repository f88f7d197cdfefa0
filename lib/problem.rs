//! Boundary value problems on a semi-infinite domain.
//!
//! Every problem fixes the initial (and far-field) value `i` or the boundary
//! value `b` and one more condition at the boundary `o = ob`:
//!
//! | Problem                     | Known                    | Searched   |
//! |-----------------------------|--------------------------|------------|
//! | [`DirichletProblem`]        | `i`, `b`                 | `du/do(ob)` |
//! | [`FlowrateProblem`]         | `i`, boundary flow rate  | `b`        |
//! | [`SorptivityProblem`]       | `i`, sorptivity          | `b`        |
//! | [`CauchyProblem`]           | `b`, `du/do(ob)`         | (none)     |
//! | [`SorptivityCauchyProblem`] | `b`, sorptivity          | (none)     |

use std::{ f64::consts::TAU, sync::Arc };
use crate::{
    boltzmann,
    equation::{ Dim, Equation },
    error::ProblemError,
    sign,
};

pub type ProblemResult<T> = Result<T, ProblemError>;

/// Semi-infinite problem with a known initial value `i` and boundary value
/// `b`.
#[derive(Clone, Debug)]
pub struct DirichletProblem {
    pub(crate) eq: Arc<Equation>,
    pub(crate) i: f64,
    pub(crate) b: f64,
    pub(crate) ob: f64,
}

impl DirichletProblem {
    /// Create a new `DirichletProblem` with the boundary at `o = ob`.
    ///
    /// Fails if any value is non-finite, if `ob < 0`, or if `ob = 0` for a
    /// radial equation.
    pub fn new(eq: Arc<Equation>, i: f64, b: f64, ob: f64)
        -> ProblemResult<Self>
    {
        ProblemError::check_finite("i", i)?;
        ProblemError::check_finite("b", b)?;
        ProblemError::check_ob(ob, eq.dim().is_radial())?;
        Ok(Self { eq, i, b, ob })
    }

    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> { &self.eq }

    /// Get the initial value.
    pub fn i(&self) -> f64 { self.i }

    /// Get the boundary value.
    pub fn b(&self) -> f64 { self.b }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Direction of the solution profile moving away from the boundary.
    pub fn monotonicity(&self) -> f64 { sign(self.i - self.b) }
}

/// Semi-infinite cylindrical problem with a known initial value and an
/// imposed flow rate at the boundary.
#[derive(Clone, Debug)]
pub struct FlowrateProblem {
    pub(crate) eq: Arc<Equation>,
    pub(crate) i: f64,
    pub(crate) Qb: f64,
    pub(crate) angle: f64,
    pub(crate) height: f64,
    pub(crate) ob: f64,
}

impl FlowrateProblem {
    /// Create a new `FlowrateProblem` for a full circle of unit height.
    ///
    /// A point source (`ob = 0`) is allowed here; solvers substitute a small
    /// positive boundary position.
    pub fn new(eq: Arc<Equation>, i: f64, Qb: f64, ob: f64)
        -> ProblemResult<Self>
    {
        Self::new_geometry(eq, i, Qb, TAU, 1.0, ob)
    }

    /// Create a new `FlowrateProblem` for a wedge of angle `angle` and height
    /// `height`.
    pub fn new_geometry(
        eq: Arc<Equation>,
        i: f64,
        Qb: f64,
        angle: f64,
        height: f64,
        ob: f64,
    ) -> ProblemResult<Self>
    {
        (eq.dim() == Dim::Cylindrical).then_some(())
            .ok_or(ProblemError::FlowrateDim(eq.dim().m()))?;
        ProblemError::check_finite("i", i)?;
        ProblemError::check_finite("Qb", Qb)?;
        ProblemError::check_geometry("angle", angle)?;
        ProblemError::check_geometry("height", height)?;
        ProblemError::check_ob(ob, false)?;
        Ok(Self { eq, i, Qb, angle, height, ob })
    }

    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> { &self.eq }

    /// Get the initial value.
    pub fn i(&self) -> f64 { self.i }

    /// Get the boundary flow rate.
    pub fn Qb(&self) -> f64 { self.Qb }

    /// Get the angle of the wedge.
    pub fn angle(&self) -> f64 { self.angle }

    /// Get the height of the domain.
    pub fn height(&self) -> f64 { self.height }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Direction of the solution profile moving away from the boundary.
    pub fn monotonicity(&self) -> f64 { -sign(self.Qb) }

    /// Boundary derivative `du/do` implied by the flow rate for a boundary
    /// value `b` at `o = ob`.
    pub fn d_dob(&self, b: f64, ob: f64) -> f64 {
        -self.Qb / (self.angle * self.height * ob * self.eq.flow_diffusivity(b))
    }
}

/// Initial value problem in `o` with known boundary value and derivative.
#[derive(Clone, Debug)]
pub struct CauchyProblem {
    pub(crate) eq: Arc<Equation>,
    pub(crate) b: f64,
    pub(crate) d_dob: f64,
    pub(crate) ob: f64,
}

impl CauchyProblem {
    /// Create a new `CauchyProblem`.
    pub fn new(eq: Arc<Equation>, b: f64, d_dob: f64, ob: f64)
        -> ProblemResult<Self>
    {
        ProblemError::check_finite("b", b)?;
        ProblemError::check_finite("d_dob", d_dob)?;
        ProblemError::check_ob(ob, eq.dim().is_radial())?;
        Ok(Self { eq, b, d_dob, ob })
    }

    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> { &self.eq }

    /// Get the boundary value.
    pub fn b(&self) -> f64 { self.b }

    /// Get the boundary derivative.
    pub fn d_dob(&self) -> f64 { self.d_dob }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Direction of the solution profile moving away from the boundary.
    pub fn monotonicity(&self) -> f64 { sign(self.d_dob) }
}

/// Initial value problem in `o` with known boundary value and sorptivity.
#[derive(Clone, Debug)]
pub struct SorptivityCauchyProblem {
    pub(crate) eq: Arc<Equation>,
    pub(crate) b: f64,
    pub(crate) S: f64,
    pub(crate) ob: f64,
}

impl SorptivityCauchyProblem {
    /// Create a new `SorptivityCauchyProblem`.
    pub fn new(eq: Arc<Equation>, b: f64, S: f64, ob: f64)
        -> ProblemResult<Self>
    {
        ProblemError::check_finite("b", b)?;
        ProblemError::check_finite("S", S)?;
        ProblemError::check_ob(ob, eq.dim().is_radial())?;
        Ok(Self { eq, b, S, ob })
    }

    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> { &self.eq }

    /// Get the boundary value.
    pub fn b(&self) -> f64 { self.b }

    /// Get the sorptivity.
    pub fn S(&self) -> f64 { self.S }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Direction of the solution profile moving away from the boundary.
    pub fn monotonicity(&self) -> f64 { -sign(self.S) }

    /// Convert to the equivalent [`CauchyProblem`].
    pub fn to_cauchy(&self) -> ProblemResult<CauchyProblem> {
        let d_dob = boltzmann::d_do_from_sorptivity(&self.eq, self.b, self.S);
        CauchyProblem::new(self.eq.clone(), self.b, d_dob, self.ob)
    }
}

/// Semi-infinite problem with a known initial value and sorptivity.
#[derive(Clone, Debug)]
pub struct SorptivityProblem {
    pub(crate) eq: Arc<Equation>,
    pub(crate) i: f64,
    pub(crate) S: f64,
    pub(crate) ob: f64,
}

impl SorptivityProblem {
    /// Create a new `SorptivityProblem`.
    pub fn new(eq: Arc<Equation>, i: f64, S: f64, ob: f64)
        -> ProblemResult<Self>
    {
        ProblemError::check_finite("i", i)?;
        ProblemError::check_finite("S", S)?;
        ProblemError::check_ob(ob, eq.dim().is_radial())?;
        Ok(Self { eq, i, S, ob })
    }

    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> { &self.eq }

    /// Get the initial value.
    pub fn i(&self) -> f64 { self.i }

    /// Get the sorptivity.
    pub fn S(&self) -> f64 { self.S }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Direction of the solution profile moving away from the boundary.
    pub fn monotonicity(&self) -> f64 { -sign(self.S) }

    /// Boundary derivative `du/do` implied by the sorptivity for a boundary
    /// value `b`.
    pub fn d_dob(&self, b: f64) -> f64 {
        boltzmann::d_do_from_sorptivity(&self.eq, b, self.S)
    }
}

/// Any problem.
#[derive(Clone, Debug)]
pub enum Problem {
    Dirichlet(DirichletProblem),
    Flowrate(FlowrateProblem),
    Cauchy(CauchyProblem),
    SorptivityCauchy(SorptivityCauchyProblem),
    Sorptivity(SorptivityProblem),
}

impl Problem {
    /// Get the equation.
    pub fn eq(&self) -> &Arc<Equation> {
        match self {
            Self::Dirichlet(p) => p.eq(),
            Self::Flowrate(p) => p.eq(),
            Self::Cauchy(p) => p.eq(),
            Self::SorptivityCauchy(p) => p.eq(),
            Self::Sorptivity(p) => p.eq(),
        }
    }

    /// Direction of the solution profile moving away from the boundary.
    pub fn monotonicity(&self) -> f64 {
        match self {
            Self::Dirichlet(p) => p.monotonicity(),
            Self::Flowrate(p) => p.monotonicity(),
            Self::Cauchy(p) => p.monotonicity(),
            Self::SorptivityCauchy(p) => p.monotonicity(),
            Self::Sorptivity(p) => p.monotonicity(),
        }
    }
}

impl From<DirichletProblem> for Problem {
    fn from(p: DirichletProblem) -> Self { Self::Dirichlet(p) }
}

impl From<FlowrateProblem> for Problem {
    fn from(p: FlowrateProblem) -> Self { Self::Flowrate(p) }
}

impl From<CauchyProblem> for Problem {
    fn from(p: CauchyProblem) -> Self { Self::Cauchy(p) }
}

impl From<SorptivityCauchyProblem> for Problem {
    fn from(p: SorptivityCauchyProblem) -> Self { Self::SorptivityCauchy(p) }
}

impl From<SorptivityProblem> for Problem {
    fn from(p: SorptivityProblem) -> Self { Self::Sorptivity(p) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_dual::Dual2_64;

    fn planar() -> Arc<Equation> {
        Arc::new(Equation::diffusion(|u: Dual2_64| u * 2.0, Dim::Planar))
    }

    fn radial() -> Arc<Equation> {
        Arc::new(Equation::diffusion(|u: Dual2_64| u * 2.0, Dim::Cylindrical))
    }

    #[test]
    fn radial_requires_positive_ob() {
        assert!(DirichletProblem::new(planar(), 0.1, 1.0, 0.0).is_ok());
        assert!(matches!(
            DirichletProblem::new(radial(), 0.1, 1.0, 0.0),
            Err(ProblemError::RadialPointBoundary)
        ));
        assert!(DirichletProblem::new(radial(), 0.1, 1.0, 1e-3).is_ok());
        assert!(matches!(
            CauchyProblem::new(planar(), 1.0, -1.0, -1.0),
            Err(ProblemError::NegativeOb(_))
        ));
    }

    #[test]
    fn non_finite_values() {
        assert!(matches!(
            DirichletProblem::new(planar(), f64::NAN, 1.0, 0.0),
            Err(ProblemError::NonFinite("i", _))
        ));
        assert!(matches!(
            SorptivityProblem::new(planar(), 0.1, f64::INFINITY, 0.0),
            Err(ProblemError::NonFinite("S", _))
        ));
    }

    #[test]
    fn flowrate_geometry() {
        assert!(matches!(
            FlowrateProblem::new(planar(), 0.1, 1.0, 0.0),
            Err(ProblemError::FlowrateDim(1))
        ));
        assert!(matches!(
            FlowrateProblem::new_geometry(radial(), 0.1, 1.0, 0.0, 1.0, 0.0),
            Err(ProblemError::BadGeometry("angle", _))
        ));
        let prob = FlowrateProblem::new(radial(), 0.1, 1e-2, 0.0).unwrap();
        assert_eq!(prob.monotonicity(), -1.0);
        // Qb = -angle * height * ob * K(b) * d_dob
        let d_dob = prob.d_dob(0.5, 1e-3);
        assert_relative_eq!(-TAU * 1e-3 * 1.0 * d_dob, 1e-2);
    }

    #[test]
    fn monotonicity() {
        assert_eq!(DirichletProblem::new(planar(), 0.1, 1.0, 0.0).unwrap().monotonicity(), -1.0);
        assert_eq!(DirichletProblem::new(planar(), 0.5, 0.5, 0.0).unwrap().monotonicity(), 0.0);
        let prob: Problem = SorptivityProblem::new(planar(), 0.1, 2.0, 0.0).unwrap().into();
        assert_eq!(prob.monotonicity(), -1.0);
    }

    #[test]
    fn sorptivity_to_cauchy() {
        let prob = SorptivityCauchyProblem::new(planar(), 0.5, 2.0, 0.0).unwrap();
        let cauchy = prob.to_cauchy().unwrap();
        // d_dob = -S / (2 K(b))
        assert_relative_eq!(cauchy.d_dob(), -2.0 / (2.0 * 1.0));
        assert_relative_eq!(cauchy.b(), 0.5);
    }
}
