//! Nonlinear diffusion equations reducible by the Boltzmann transformation.
//!
//! Two kinds of equations are supported:
//! ```text
//! ∂u                                     ∂h
//! -- = ∇·(D(u) ∇u)    (diffusion)    C(h) -- = ∇·(K(h) ∇h)    (Richards)
//! ∂t                                     ∂t
//! ```
//! in one, two (cylindrical), or three (spherical) radially symmetric spatial
//! dimensions. Property functions are written over [`Dual2_64`] so that their
//! first and second derivatives come out of a single evaluation.
//!
//! ```
//! use boltzmann::equation::{ Dim, Equation };
//! use boltzmann::{ Dual2_64, DualNum };
//!
//! let eq = Equation::diffusion(|u: Dual2_64| (-u.ln() + 1.0) * 0.5, Dim::Planar);
//! assert!((eq.diffusivity(1.0) - 0.5).abs() < 1e-15);
//! assert!(eq.isindomain(0.5));
//! assert!(!eq.isindomain(-0.5));
//! ```

use std::{ fmt, sync::Arc };
use num_dual::Dual2_64;
use crate::error::ProblemError;

/// A property function of the unknown (diffusivity, conductivity, or
/// capacity).
pub type Property = Arc<dyn Fn(Dual2_64) -> Dual2_64 + Send + Sync>;

// value, first, and second derivative of `f` at `x`
fn eval2(f: &Property, x: f64) -> (f64, f64, f64) {
    let y = f(Dual2_64::new(x, 1.0, 0.0));
    (y.re, y.v1, y.v2)
}

/// Number of spatial dimensions (with radial symmetry for more than one).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dim {
    /// m = 1
    Planar,
    /// m = 2
    Cylindrical,
    /// m = 3
    Spherical,
}

impl Dim {
    /// Create a new `Dim` from a number of spatial dimensions.
    pub fn new(m: usize) -> Result<Self, ProblemError> {
        match m {
            1 => Ok(Self::Planar),
            2 => Ok(Self::Cylindrical),
            3 => Ok(Self::Spherical),
            _ => Err(ProblemError::BadDim(m)),
        }
    }

    /// Return the number of spatial dimensions.
    pub fn m(self) -> usize {
        match self {
            Self::Planar => 1,
            Self::Cylindrical => 2,
            Self::Spherical => 3,
        }
    }

    /// Return the coefficient `k = m - 1` of the radial term in the
    /// transformed equation.
    pub fn k(self) -> f64 { (self.m() - 1) as f64 }

    /// Return `true` if `self` is not `Planar`.
    pub fn is_radial(self) -> bool { !matches!(self, Self::Planar) }
}

impl TryFrom<usize> for Dim {
    type Error = ProblemError;

    fn try_from(m: usize) -> Result<Self, Self::Error> { Self::new(m) }
}

/// Capacity function of a Richards equation.
#[derive(Clone)]
pub enum Capacity {
    /// Constant capacity.
    Const(f64),
    /// Capacity as a function of the unknown.
    Func(Property),
}

impl Capacity {
    /// Wrap a capacity function.
    pub fn func<F>(C: F) -> Self
    where F: Fn(Dual2_64) -> Dual2_64 + Send + Sync + 'static
    {
        Self::Func(Arc::new(C))
    }

    // value and first derivative
    fn eval1(&self, x: f64) -> (f64, f64) {
        match self {
            Self::Const(c) => (*c, 0.0),
            Self::Func(f) => {
                let (c, dc, _) = eval2(f, x);
                (c, dc)
            },
        }
    }
}

impl fmt::Debug for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "Const({})", c),
            Self::Func(_) => write!(f, "Func(..)"),
        }
    }
}

/// Kind of equation, along with its property functions.
#[derive(Clone)]
pub enum Kind {
    /// Diffusion equation with diffusivity `D`.
    Diffusion { D: Property },
    /// Richards equation with conductivity `K` and capacity `C`.
    Richards { K: Property, C: Capacity },
}

/// A nonlinear diffusion equation.
///
/// Immutable once constructed; problems and solutions share it through an
/// [`Arc`].
#[derive(Clone)]
pub struct Equation {
    kind: Kind,
    dim: Dim,
    label: String,
}

impl fmt::Debug for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            Kind::Diffusion { .. } => "Diffusion".to_string(),
            Kind::Richards { C, .. } => format!("Richards {{ C: {:?} }}", C),
        };
        f.debug_struct("Equation")
            .field("kind", &kind)
            .field("dim", &self.dim)
            .field("label", &self.label)
            .finish()
    }
}

impl Equation {
    /// Create a new diffusion equation from a diffusivity function.
    pub fn diffusion<F>(D: F, dim: Dim) -> Self
    where F: Fn(Dual2_64) -> Dual2_64 + Send + Sync + 'static
    {
        Self {
            kind: Kind::Diffusion { D: Arc::new(D) },
            dim,
            label: "u".to_string(),
        }
    }

    /// Create a new Richards equation from a conductivity function and a
    /// capacity.
    ///
    /// Fails if the capacity is a non-positive constant.
    pub fn richards<F>(K: F, C: Capacity, dim: Dim)
        -> Result<Self, ProblemError>
    where F: Fn(Dual2_64) -> Dual2_64 + Send + Sync + 'static
    {
        if let Capacity::Const(c) = C {
            (c > 0.0 && c.is_finite()).then_some(())
                .ok_or(ProblemError::BadCapacity(c))?;
        }
        Ok(Self {
            kind: Kind::Richards { K: Arc::new(K), C },
            dim,
            label: "h".to_string(),
        })
    }

    /// Set the name of the unknown.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Get the name of the unknown.
    pub fn label(&self) -> &str { &self.label }

    /// Get the kind of equation.
    pub fn kind(&self) -> &Kind { &self.kind }

    /// Get the number of spatial dimensions.
    pub fn dim(&self) -> Dim { self.dim }

    /// Conductivity `K`; equal to the diffusivity for a diffusion equation.
    pub fn conductivity(&self, val: f64) -> f64 {
        match &self.kind {
            Kind::Diffusion { D } => eval2(D, val).0,
            Kind::Richards { K, .. } => eval2(K, val).0,
        }
    }

    /// Capacity `C`; equal to 1 for a diffusion equation.
    pub fn capacity(&self, val: f64) -> f64 {
        match &self.kind {
            Kind::Diffusion { .. } => 1.0,
            Kind::Richards { C, .. } => C.eval1(val).0,
        }
    }

    /// Diffusivity `K / C`.
    pub fn diffusivity(&self, val: f64) -> f64 {
        self.conductivity(val) / self.capacity(val)
    }

    /// Diffusivity relating the flux of the conserved quantity to the
    /// gradient of the unknown, i.e. `K`.
    pub fn flow_diffusivity(&self, val: f64) -> f64 { self.conductivity(val) }

    /// Conductivity along with its first and second derivatives.
    pub fn conductivity_derivs(&self, val: f64) -> (f64, f64, f64) {
        match &self.kind {
            Kind::Diffusion { D } => eval2(D, val),
            Kind::Richards { K, .. } => eval2(K, val),
        }
    }

    /// Capacity along with its first derivative.
    pub fn capacity_derivs(&self, val: f64) -> (f64, f64) {
        match &self.kind {
            Kind::Diffusion { .. } => (1.0, 0.0),
            Kind::Richards { C, .. } => C.eval1(val),
        }
    }

    /// Return `true` if `val` is an admissible value of the unknown, i.e. the
    /// conductivity there is positive and finite with a finite derivative.
    pub fn isindomain(&self, val: f64) -> bool {
        self.derivs_in_domain(val).is_some()
    }

    /// Conductivity and capacity derivatives at `val` as
    /// `((K, K', K''), (C, C'))`, or `None` if `val` is not in the domain.
    pub(crate) fn derivs_in_domain(&self, val: f64)
        -> Option<((f64, f64, f64), (f64, f64))>
    {
        if !val.is_finite() { return None; }
        let (K, dK, d2K) = self.conductivity_derivs(val);
        let (C, dC) = self.capacity_derivs(val);
        let admissible
            = K > 0.0 && K.is_finite() && dK.is_finite()
            && C > 0.0 && C.is_finite();
        admissible.then_some(((K, dK, d2K), (C, dC)))
    }

    /// Return `true` if `val` lies in the closure of the domain: the
    /// conductivity there may be zero or infinite (an asymptotic limit), but
    /// not negative or NaN.
    pub(crate) fn is_limit_value(&self, val: f64) -> bool {
        if !val.is_finite() { return false; }
        let K = self.conductivity(val);
        !K.is_nan() && K >= 0.0
    }
}
