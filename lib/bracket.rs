//! Resumable bracket-and-bisect root finding over externally supplied samples.
//!
//! [`BracketBisect`] never evaluates a function itself: it hands out the next
//! point to sample and is fed back the (sign-meaningful) residual there. The
//! search runs in two phases:
//!
//! - *Expansion*: starting from two seeds with residuals of the same sign, the
//!   interval is pushed outward, `x ← x_b + g (x_b - x_a)`, until the sign
//!   changes.
//! - *Bisection*: the bracket is halved indefinitely, keeping the endpoint
//!   whose residual sign matches the new sample.
//!
//! There is no convergence criterion; the caller stops asking when the
//! residual is small enough.
//!
//! ```
//! use boltzmann::bracket::BracketBisect;
//!
//! // root of x² - 2 on x > 0, seeded left of the root
//! let f = |x: f64| x.powi(2) - 2.0;
//! let mut search = BracketBisect::new(0.0, f(0.0), 0.1).unwrap();
//! let mut x = search.next_x();
//! while f(x).abs() > 1e-10 {
//!     x = search.feed(f(x));
//! }
//! assert!((x - 2.0_f64.sqrt()).abs() < 1e-9);
//! ```

use crate::error::BracketError;

pub type BracketResult<T> = Result<T, BracketError>;

/// Default bracket expansion factor.
pub const DEF_GROWTH: f64 = 2.0;

fn same_sign(a: f64, b: f64) -> bool {
    (a > 0.0 && b > 0.0) || (a < 0.0 && b < 0.0)
}

/// Phase of a [`BracketBisect`] search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on the residual at the second seed.
    Seeding,
    /// Pushing the interval outward to find a sign change.
    Expanding,
    /// Halving a known bracket.
    Bisecting,
}

/// State of a resumable bracket-and-bisect search.
#[derive(Copy, Clone, Debug)]
pub struct BracketBisect {
    xa: f64,
    ya: f64,
    xb: f64,
    yb: f64,
    x: f64,
    growth: f64,
    phase: Phase,
}

impl BracketBisect {
    /// Start a new search from a sampled seed `(xa, ya)` and an unsampled seed
    /// `xb`, which is the first point requested.
    ///
    /// Fails if the seeds coincide or are non-finite, or if `ya` is zero or
    /// NaN.
    pub fn new(xa: f64, ya: f64, xb: f64) -> BracketResult<Self> {
        Self::with_growth(xa, ya, xb, DEF_GROWTH)
    }

    /// Like [`Self::new`], but with an expansion factor `growth ≥ 1`.
    pub fn with_growth(xa: f64, ya: f64, xb: f64, growth: f64)
        -> BracketResult<Self>
    {
        BracketError::check_seeds(xa, ya, xb)?;
        BracketError::check_growth(growth)?;
        Ok(Self {
            xa,
            ya,
            xb,
            yb: f64::NAN,
            x: xb,
            growth,
            phase: Phase::Seeding,
        })
    }

    /// Get the point whose residual is requested next.
    pub fn next_x(&self) -> f64 { self.x }

    /// Get the current phase of the search.
    pub fn phase(&self) -> Phase { self.phase }

    /// Return the current bracket `(xa, xb)` if a sign change has been found.
    pub fn bracket(&self) -> Option<(f64, f64)> {
        (self.phase == Phase::Bisecting).then_some((self.xa, self.xb))
    }

    fn midpoint(&self) -> f64 { (self.xa + self.xb) / 2.0 }

    /// Supply the residual at the last requested point and receive the next
    /// point to sample.
    ///
    /// A residual of exactly zero is treated as a sign change.
    pub fn feed(&mut self, y: f64) -> f64 {
        match self.phase {
            Phase::Seeding | Phase::Expanding => {
                self.yb = y;
                if same_sign(self.ya, self.yb) {
                    let x_new = self.xb + self.growth * (self.xb - self.xa);
                    self.xa = self.xb;
                    self.ya = self.yb;
                    self.xb = x_new;
                    self.phase = Phase::Expanding;
                    self.x = x_new;
                } else {
                    self.phase = Phase::Bisecting;
                    self.x = self.midpoint();
                }
            },
            Phase::Bisecting => {
                if same_sign(y, self.ya) {
                    self.xa = self.x;
                    self.ya = y;
                } else {
                    self.xb = self.x;
                    self.yb = y;
                }
                self.x = self.midpoint();
            },
        }
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bad_seeds() {
        assert!(matches!(
            BracketBisect::new(1.0, 1.0, 1.0), Err(BracketError::SameSeeds(_))));
        assert!(matches!(
            BracketBisect::new(0.0, 0.0, 1.0),
            Err(BracketError::BadSeedResidual(_))
        ));
        assert!(matches!(
            BracketBisect::new(0.0, f64::NAN, 1.0),
            Err(BracketError::BadSeedResidual(_))
        ));
        assert!(matches!(
            BracketBisect::with_growth(0.0, 1.0, 1.0, 0.5),
            Err(BracketError::BadGrowth(_))
        ));
        assert!(matches!(
            BracketBisect::new(0.0, 1.0, f64::INFINITY),
            Err(BracketError::NonFiniteSeed(_))
        ));
    }

    #[test]
    fn expansion_sequence() {
        let mut search = BracketBisect::new(0.0, -1.0, 1.0).unwrap();
        assert_eq!(search.next_x(), 1.0);
        assert_eq!(search.phase(), Phase::Seeding);
        // 1 + 2 (1 - 0)
        assert_relative_eq!(search.feed(-1.0), 3.0);
        assert_eq!(search.phase(), Phase::Expanding);
        // 3 + 2 (3 - 1)
        assert_relative_eq!(search.feed(-1.0), 7.0);
        assert!(search.bracket().is_none());
        // sign change in (3, 7)
        assert_relative_eq!(search.feed(1.0), 5.0);
        assert_eq!(search.bracket(), Some((3.0, 7.0)));
        assert_relative_eq!(search.feed(1.0), 4.0);
        assert_relative_eq!(search.feed(-1.0), 4.5);
        assert_eq!(search.bracket(), Some((4.0, 5.0)));
    }

    #[test]
    fn expands_in_negative_direction() {
        let mut search = BracketBisect::new(0.0, 1.0, -0.5).unwrap();
        assert_relative_eq!(search.feed(1.0), -1.5);
        assert_relative_eq!(search.feed(1.0), -3.5);
    }

    #[test]
    fn infinite_residuals_bracket() {
        // an unbounded residual on one side still brackets by sign
        let mut search = BracketBisect::new(0.0, 1.0, 2.0).unwrap();
        assert_relative_eq!(search.feed(f64::NEG_INFINITY), 1.0);
        assert_relative_eq!(search.feed(f64::INFINITY), 1.5);
        assert_eq!(search.bracket(), Some((1.0, 2.0)));
    }

    #[test]
    fn converges_on_cubic() {
        let f = |x: f64| x.powi(3) - x - 1.0;
        let mut search = BracketBisect::new(-1.0, f(-1.0), 0.0).unwrap();
        let mut x = search.next_x();
        for _ in 0..200 {
            let y = f(x);
            if y.abs() < 1e-12 { break; }
            x = search.feed(y);
        }
        assert_relative_eq!(x, 1.324717957244746, epsilon = 1e-10);
    }
}
