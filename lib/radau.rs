//! Fifth-order Radau IIA implicit Runge-Kutta stepping for two-component
//! systems.
//!
//! Each step solves the collocation conditions
//! ```text
//! z_i = h Σ_j a_ij f(t + c_j h, y + z_j),    i = 1, 2, 3
//! ```
//! for the stage increments `z_i` by simplified Newton iteration on the full
//! `(I - h A ⊗ J)` system, then advances with `y + z_3` (the method is stiffly
//! accurate). The local error is estimated following Hairer & Wanner[^1], and
//! the collocation polynomial through `(0, y)`, `(c_1, y + z_1)`,
//! `(c_2, y + z_2)`, `(1, y + z_3)` is kept as dense output.
//!
//! [^1]: E. Hairer and G. Wanner, *Solving Ordinary Differential Equations II:
//! Stiff and Differential-Algebraic Problems*, 2nd ed. (Springer, 1996), §IV.8.

use nalgebra as na;
use crate::boltzmann::{ BoltzmannSystem, Jacobian, State };

const SQRT6: f64 = 2.449489742783178;

/// Collocation nodes.
pub const C: [f64; 3] = [(4.0 - SQRT6) / 10.0, (4.0 + SQRT6) / 10.0, 1.0];

const A: [[f64; 3]; 3] = [
    [
        (88.0 - 7.0 * SQRT6) / 360.0,
        (296.0 - 169.0 * SQRT6) / 1800.0,
        (-2.0 + 3.0 * SQRT6) / 225.0,
    ],
    [
        (296.0 + 169.0 * SQRT6) / 1800.0,
        (88.0 + 7.0 * SQRT6) / 360.0,
        (-2.0 - 3.0 * SQRT6) / 225.0,
    ],
    [
        (16.0 - SQRT6) / 36.0,
        (16.0 + SQRT6) / 36.0,
        1.0 / 9.0,
    ],
];

// error estimator weights
const DD: [f64; 3] = [
    -(13.0 + 7.0 * SQRT6) / 3.0,
    (-13.0 + 7.0 * SQRT6) / 3.0,
    -1.0 / 3.0,
];

// inverse of the real eigenvalue of A
const U1: f64 = 3.637834252744496;

const MAX_NEWTON: usize = 7;
const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 8.0;

type Mat6 = na::SMatrix<f64, 6, 6>;
type Vec6 = na::SVector<f64, 6>;

/// A first-order system of two ODEs with a known Jacobian.
pub trait OdeSystem {
    /// Evaluate `dy/dt`. Non-finite components signal that `y` is not
    /// admissible.
    fn rhs(&self, t: f64, y: &State) -> State;

    /// Evaluate `∂(dy/dt)/∂y`.
    fn jacobian(&self, t: f64, y: &State) -> Jacobian;
}

impl OdeSystem for BoltzmannSystem<'_> {
    fn rhs(&self, t: f64, y: &State) -> State { BoltzmannSystem::rhs(self, t, y) }

    fn jacobian(&self, t: f64, y: &State) -> Jacobian {
        BoltzmannSystem::jacobian(self, t, y)
    }
}

/// A single accepted step, along with its dense output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    /// Start of the step.
    pub t0: f64,
    /// Step size.
    pub h: f64,
    /// State at the start of the step.
    pub y0: State,
    /// Stage increments.
    pub z: [State; 3],
}

impl Step {
    /// End of the step.
    pub fn t1(&self) -> f64 { self.t0 + self.h }

    /// State at the end of the step.
    pub fn y1(&self) -> State { self.y0 + self.z[2] }

    /// Interpolation nodes in `t`.
    pub fn nodes_t(&self) -> [f64; 4] {
        [
            self.t0,
            self.t0 + C[0] * self.h,
            self.t0 + C[1] * self.h,
            self.t1(),
        ]
    }

    /// Values of the `comp`-th state component at the interpolation nodes.
    pub fn nodes_y(&self, comp: usize) -> [f64; 4] {
        [
            self.y0[comp],
            self.y0[comp] + self.z[0][comp],
            self.y0[comp] + self.z[1][comp],
            self.y0[comp] + self.z[2][comp],
        ]
    }

    /// Evaluate the `comp`-th component of the collocation polynomial at `t`.
    pub fn interpolate(&self, comp: usize, t: f64) -> f64 {
        let ts = self.nodes_t();
        let ys = self.nodes_y(comp);
        (0..4)
            .map(|j| {
                let lj: f64
                    = (0..4).filter(|&k| k != j)
                    .map(|k| (t - ts[k]) / (ts[j] - ts[k]))
                    .product();
                ys[j] * lj
            })
            .sum()
    }
}

/// Outcome of a single step attempt.
#[derive(Copy, Clone, Debug)]
pub enum Attempt {
    /// The step met the error bound.
    Accepted { step: Step, h_next: f64 },
    /// The step failed the error bound, the Newton iteration diverged, or the
    /// system could not be evaluated; retry with `h_next`.
    Rejected { h_next: f64 },
}

/// Radau IIA (order 5) stepper.
#[derive(Copy, Clone, Debug)]
pub struct Radau5 {
    rtol: f64,
    atol: f64,
    newton_tol: f64,
}

// root-mean-square norm of `x` weighted by `scal`
fn rms<const N: usize>(x: &na::SVector<f64, N>, scal: &na::SVector<f64, N>)
    -> f64
{
    (x.iter().zip(scal.iter())
        .map(|(xk, sk)| (xk / sk).powi(2))
        .sum::<f64>() / N as f64)
        .sqrt()
}

fn all_finite<const N: usize>(x: &na::SVector<f64, N>) -> bool {
    x.iter().all(|xk| xk.is_finite())
}

impl Radau5 {
    /// Create a new stepper for relative and absolute tolerances `rtol` and
    /// `atol`.
    pub fn new(rtol: f64, atol: f64) -> Self {
        let newton_tol
            = (10.0 * f64::EPSILON / rtol).max(0.03_f64.min(rtol.sqrt()));
        Self { rtol, atol, newton_tol }
    }

    /// Size of the first step.
    pub fn initial_step(&self) -> f64 { 1e-6 }

    fn scale(&self, y: &State, y_new: &State) -> State {
        State::new(
            self.atol + self.rtol * y[0].abs().max(y_new[0].abs()),
            self.atol + self.rtol * y[1].abs().max(y_new[1].abs()),
        )
    }

    /// Attempt a single step of size `h` from `(t, y)`.
    ///
    /// Pass `refine = true` after a rejection or on the first step to have a
    /// failing error estimate re-evaluated with an additional function call,
    /// which filters out spurious rejections for stiff components.
    pub fn attempt<S>(&self, sys: &S, t: f64, y: &State, h: f64, refine: bool)
        -> Attempt
    where S: OdeSystem
    {
        let reject = Attempt::Rejected { h_next: 0.5 * h };

        let f0 = sys.rhs(t, y);
        let J = sys.jacobian(t, y);
        if !all_finite(&f0) || !J.iter().all(|Jk| Jk.is_finite()) {
            return reject;
        }

        // simplified Newton on the stage system
        let M = Mat6::from_fn(|r, c| {
            let (i, p) = (r / 2, r % 2);
            let (j, q) = (c / 2, c % 2);
            let id = if r == c { 1.0 } else { 0.0 };
            id - h * A[i][j] * J[(p, q)]
        });
        let lu = M.lu();
        let scal_newton = {
            let s = self.scale(y, y);
            Vec6::from_fn(|r, _| s[r % 2])
        };
        let mut Z = Vec6::zeros();
        let mut dnorm_prev: Option<f64> = None;
        let mut faccon: f64 = 1.0;
        let mut converged = false;
        let mut newt: usize = 0;
        for _ in 0..MAX_NEWTON {
            newt += 1;
            let F: [State; 3] = std::array::from_fn(|i| {
                let zi = State::new(Z[2 * i], Z[2 * i + 1]);
                sys.rhs(t + C[i] * h, &(y + zi))
            });
            if !F.iter().all(|Fk| all_finite(Fk)) { return reject; }
            let G = Vec6::from_fn(|r, _| {
                let (i, p) = (r / 2, r % 2);
                let hAF: f64
                    = (0..3).map(|j| A[i][j] * F[j][p]).sum::<f64>() * h;
                hAF - Z[r]
            });
            let Some(dZ) = lu.solve(&G) else { return reject; };
            if !all_finite(&dZ) { return reject; }
            let dnorm = rms(&dZ, &scal_newton);
            if let Some(prev) = dnorm_prev {
                let theta = dnorm / prev;
                if theta >= 0.99 { return reject; }
                faccon = theta / (1.0 - theta);
            }
            Z += dZ;
            if faccon * dnorm <= self.newton_tol {
                converged = true;
                break;
            }
            dnorm_prev = Some(dnorm);
        }
        if !converged { return reject; }

        let z = [
            State::new(Z[0], Z[1]),
            State::new(Z[2], Z[3]),
            State::new(Z[4], Z[5]),
        ];
        let y_new = y + z[2];
        if !all_finite(&y_new) { return reject; }

        // error estimate
        let E1 = Jacobian::identity() * (U1 / h) - J;
        let E1_lu = E1.lu();
        let f2: State
            = z[0] * (DD[0] / h) + z[1] * (DD[1] / h) + z[2] * (DD[2] / h);
        let scal = self.scale(y, &y_new);
        let mut err = match E1_lu.solve(&(f2 + f0)) {
            Some(e) if all_finite(&e) => e,
            _ => return reject,
        };
        let mut err_norm = rms(&err, &scal).max(1e-10);
        if err_norm >= 1.0 && refine {
            let f = sys.rhs(t, &(y + err));
            if all_finite(&f) {
                if let Some(e) = E1_lu.solve(&(f + f2)) {
                    if all_finite(&e) {
                        err = e;
                        err_norm = rms(&err, &scal).max(1e-10);
                    }
                }
            }
        }

        let fac = SAFETY
            * (2 * MAX_NEWTON + 1) as f64 / (2 * MAX_NEWTON + newt) as f64;
        let quot
            = (err_norm.powf(0.25) / fac)
            .clamp(MAX_FACTOR.recip(), MIN_FACTOR.recip());
        let h_next = h / quot;
        if err_norm < 1.0 {
            Attempt::Accepted { step: Step { t0: t, h, y0: *y, z }, h_next }
        } else {
            Attempt::Rejected { h_next }
        }
    }
}
