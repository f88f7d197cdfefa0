//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use thiserror::Error;
use crate::solution::RetCode;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from functions in [`interp`][crate::interp].
#[derive(Debug, Error)]
pub enum InterpError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// Returned when no interpolation nodes are given.
    #[error("interpolation requires at least one node")]
    NoNodes,
}

/// Returned from the constructors in [`bracket`][crate::bracket].
#[derive(Debug, Error)]
pub enum BracketError {
    /// Returned when both seed points coincide.
    #[error("bracket seeds must be distinct; got {0} twice")]
    SameSeeds(f64),

    /// Returned when the seed residual is zero or NaN; a zero residual is
    /// already a root and must be handled by the caller.
    #[error("seed residual must be non-zero and not NaN; got {0}")]
    BadSeedResidual(f64),

    /// Returned when a seed point is not finite.
    #[error("bracket seeds must be finite; got {0}")]
    NonFiniteSeed(f64),

    /// Returned when the expansion factor is less than 1.
    #[error("bracket growth factor must be at least 1; got {0}")]
    BadGrowth(f64),
}

impl BracketError {
    pub(crate) fn check_seeds(xa: f64, ya: f64, xb: f64) -> Result<(), Self> {
        xa.is_finite().then_some(()).ok_or(Self::NonFiniteSeed(xa))?;
        xb.is_finite().then_some(()).ok_or(Self::NonFiniteSeed(xb))?;
        (xa != xb).then_some(()).ok_or(Self::SameSeeds(xa))?;
        (ya != 0.0 && !ya.is_nan()).then_some(())
            .ok_or(Self::BadSeedResidual(ya))
    }

    pub(crate) fn check_growth(growth: f64) -> Result<(), Self> {
        (growth >= 1.0 && growth.is_finite()).then_some(())
            .ok_or(Self::BadGrowth(growth))
    }
}

/// Returned from equation and problem constructors.
#[derive(Debug, Error)]
pub enum ProblemError {
    /// Returned when a spatial dimension other than 1, 2, or 3 is requested.
    #[error("number of spatial dimensions must be 1, 2, or 3; got {0}")]
    BadDim(usize),

    /// Returned when a required value is NaN or infinite.
    #[error("{0} must be finite; got {1}")]
    NonFinite(&'static str, f64),

    /// Returned when the boundary position is negative.
    #[error("boundary position ob must be non-negative; got {0}")]
    NegativeOb(f64),

    /// Returned when a radial problem is posed with a point boundary.
    #[error("radial problems require a boundary position ob > 0")]
    RadialPointBoundary,

    /// Returned when a flow rate problem is posed for a non-cylindrical
    /// equation.
    #[error("flow rate problems require a cylindrical (m = 2) equation; got m = {0}")]
    FlowrateDim(usize),

    /// Returned when a geometric factor (angle or height) is not positive.
    #[error("{0} must be positive; got {1}")]
    BadGeometry(&'static str, f64),

    /// Returned when a constant capacity is not positive.
    #[error("constant capacity must be positive and finite; got {0}")]
    BadCapacity(f64),
}

impl ProblemError {
    pub(crate) fn check_finite(what: &'static str, val: f64)
        -> Result<(), Self>
    {
        val.is_finite().then_some(()).ok_or(Self::NonFinite(what, val))
    }

    pub(crate) fn check_ob(ob: f64, radial: bool) -> Result<(), Self> {
        Self::check_finite("ob", ob)?;
        (ob >= 0.0).then_some(()).ok_or(Self::NegativeOb(ob))?;
        (!radial || ob > 0.0).then_some(()).ok_or(Self::RadialPointBoundary)
    }

    pub(crate) fn check_geometry(what: &'static str, val: f64)
        -> Result<(), Self>
    {
        (val > 0.0 && val.is_finite()).then_some(())
            .ok_or(Self::BadGeometry(what, val))
    }
}

/// Returned from the shooting solvers.
#[derive(Debug, Error)]
pub enum SolveError {
    /// Returned when a negative or non-finite tolerance is encountered.
    #[error("tolerances must be non-negative and finite; got {0}")]
    BadTolerance(f64),

    /// Returned when a zero `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when a caller-supplied hint points the search in the wrong
    /// direction.
    #[error("hint {hint} is inconsistent with the monotonicity of the problem ({expected})")]
    HintSign { hint: f64, expected: f64 },

    /// Returned when a boundary or initial value lies outside the domain of
    /// the equation; the problem is unsolvable and no integration is
    /// attempted.
    #[error("{what} value {value} is outside the domain of the equation")]
    Domain { what: &'static str, value: f64 },

    /// Returned by [`Solution::converged`][crate::solution::Solution::converged]
    /// for a solution that did not meet its tolerance.
    #[error("solving failed with status {retcode:?} after {iterations} iterations")]
    SolvingFailed { retcode: RetCode, iterations: usize },

    /// [`ProblemError`]
    #[error("problem error: {0}")]
    Problem(#[from] ProblemError),

    /// [`BracketError`]
    #[error("bracket error: {0}")]
    Bracket(#[from] BracketError),
}

impl SolveError {
    pub(crate) fn check_tolerance(tol: f64) -> Result<(), Self> {
        (tol >= 0.0 && tol.is_finite()).then_some(())
            .ok_or(Self::BadTolerance(tol))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }
}
