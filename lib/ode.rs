//! Integration of the transformed equation away from the boundary.
//!
//! An [`Integrator`] advances `(u, du/do)` from `o = ob` with the
//! [`Radau5`] stepper until one of two events fires:
//! - *settled*: `sign(d_dob) v ≤ 0`, i.e. the profile has flattened out and
//!   the current `u` is the value it approaches as `o → ∞`;
//! - *past limit*: `sign(d_dob) (u - limit) > 0` for an optional `limit`,
//!   which lets a shooting trial stop as soon as it overshoots its target.
//!
//! Both events are also checked on the initial state. When both fire on the
//! same step, settling takes precedence. Within the settling step, the
//! location of `v = 0` is found on the step's collocation polynomial.
//!
//! An integrator can be reinitialized in place with a new boundary state,
//! keeping its step buffer.

use crate::{
    DEF_ATOL,
    DEF_MAX_STEPS,
    DEF_RTOL,
    boltzmann::{ BoltzmannSystem, State },
    equation::Equation,
    error::SolveError,
    problem::CauchyProblem,
    radau::{ Attempt, Radau5, Step },
    sign,
    solve::SolveResult,
};

// bisection iterations when locating the settling point within a step
const EVENT_ITERS: usize = 60;

/// Integrator settings.
///
/// Unset fields take their default values:
/// - `rtol`: [`DEF_RTOL`][crate::DEF_RTOL]
/// - `atol`: [`DEF_ATOL`][crate::DEF_ATOL]
/// - `max_steps`: [`DEF_MAX_STEPS`][crate::DEF_MAX_STEPS]
#[derive(Clone, Debug, Default)]
pub struct BoltzmannOde {
    /// Relative tolerance of each step.
    pub rtol: Option<f64>,
    /// Absolute tolerance of each step.
    pub atol: Option<f64>,
    /// Maximum number of step attempts (accepted or rejected) per run.
    pub max_steps: Option<usize>,
}

impl BoltzmannOde {
    /// Create an integrator for a [`CauchyProblem`], optionally stopping once
    /// `u` passes `limit`.
    pub fn init<'a>(&self, prob: &'a CauchyProblem, limit: Option<f64>)
        -> SolveResult<Integrator<'a>>
    {
        let mut integ = self.arena(prob.eq(), prob.ob(), limit)?;
        integ.reinit(prob.b(), prob.d_dob());
        Ok(integ)
    }

    /// Create an idle integrator to be [reinitialized][Integrator::reinit]
    /// with boundary states.
    pub(crate) fn arena<'a>(&self, eq: &'a Equation, ob: f64, limit: Option<f64>)
        -> SolveResult<Integrator<'a>>
    {
        let rtol = self.rtol.unwrap_or(DEF_RTOL);
        let atol = self.atol.unwrap_or(DEF_ATOL);
        let max_steps = self.max_steps.unwrap_or(DEF_MAX_STEPS);
        SolveError::check_tolerance(rtol)?;
        (rtol > 0.0).then_some(()).ok_or(SolveError::BadTolerance(rtol))?;
        SolveError::check_tolerance(atol)?;
        SolveError::check_maxiters(max_steps)?;
        let stepper = Radau5::new(rtol, atol);
        Ok(Integrator {
            sys: BoltzmannSystem::new(eq),
            stepper,
            ob,
            limit,
            max_steps,
            b: f64::NAN,
            d_dob: f64::NAN,
            monotonicity: 0.0,
            o: ob,
            U: State::new(f64::NAN, f64::NAN),
            h: stepper.initial_step(),
            refine: true,
            nattempts: 0,
            steps: Vec::new(),
            o_end: ob,
            u_end: f64::NAN,
            status: Status::Idle,
        })
    }
}

/// Status of an [`Integrator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// No boundary state has been set.
    Idle,
    /// Ready to step, or stepping.
    Running,
    /// The derivative reached zero.
    Settled,
    /// `u` passed the limit value.
    PastLimit,
    /// The step attempt cap was reached.
    MaxSteps,
    /// The step size became too small to advance `o`.
    StepUnderflow,
}

impl Status {
    /// Return `true` if `self` is `Settled`.
    pub fn is_settled(self) -> bool { self == Self::Settled }

    /// Return `true` if the run has ended.
    pub fn is_done(self) -> bool { !matches!(self, Self::Idle | Self::Running) }
}

/// Mutable integration state for one equation and boundary position.
#[derive(Clone, Debug)]
pub struct Integrator<'a> {
    sys: BoltzmannSystem<'a>,
    stepper: Radau5,
    ob: f64,
    limit: Option<f64>,
    max_steps: usize,
    b: f64,
    d_dob: f64,
    monotonicity: f64,
    o: f64,
    U: State,
    h: f64,
    refine: bool,
    nattempts: usize,
    steps: Vec<Step>,
    o_end: f64,
    u_end: f64,
    status: Status,
}

impl<'a> Integrator<'a> {
    /// Reset to the boundary state `(b, d_dob)` at `o = ob`, discarding all
    /// steps.
    pub fn reinit(&mut self, b: f64, d_dob: f64) {
        self.b = b;
        self.d_dob = d_dob;
        self.monotonicity = sign(d_dob);
        self.o = self.ob;
        self.U = State::new(b, d_dob);
        self.h = self.stepper.initial_step();
        self.refine = true;
        self.nattempts = 0;
        self.steps.clear();
        self.o_end = self.ob;
        self.u_end = b;
        self.status = Status::Running;
    }

    fn is_settled(&self, v: f64) -> bool { self.monotonicity * v <= 0.0 }

    fn is_past_limit(&self, u: f64) -> bool {
        self.limit
            .is_some_and(|limit| self.monotonicity * (u - limit) > 0.0)
    }

    // position of v = 0 within a step whose end has settled
    fn settle_point(&self, step: &Step) -> f64 {
        let mut lo = step.t0;
        let mut hi = step.t1();
        for _ in 0..EVENT_ITERS {
            let mid = (lo + hi) / 2.0;
            if self.is_settled(step.interpolate(1, mid)) {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        hi
    }

    /// Integrate until an event fires or the run fails.
    ///
    /// Calling this on an integrator that is idle or has already finished
    /// does nothing.
    pub fn run(&mut self) -> Status {
        if self.status != Status::Running { return self.status; }

        if self.is_settled(self.U[1]) {
            self.status = Status::Settled;
            return self.status;
        }
        if self.is_past_limit(self.U[0]) {
            self.status = Status::PastLimit;
            return self.status;
        }

        loop {
            if self.nattempts >= self.max_steps {
                self.status = Status::MaxSteps;
                break;
            }
            if self.h <= 16.0 * f64::EPSILON * self.o.abs().max(1.0) {
                self.status = Status::StepUnderflow;
                break;
            }
            self.nattempts += 1;
            let attempt
                = self.stepper.attempt(&self.sys, self.o, &self.U, self.h, self.refine);
            match attempt {
                Attempt::Accepted { step, h_next } => {
                    self.o = step.t1();
                    self.U = step.y1();
                    self.h = h_next;
                    self.refine = false;
                    self.steps.push(step);
                    self.o_end = self.o;
                    self.u_end = self.U[0];
                    if self.is_settled(self.U[1]) {
                        self.o_end = self.settle_point(&step);
                        self.u_end = step.interpolate(0, self.o_end);
                        self.status = Status::Settled;
                        break;
                    }
                    if self.is_past_limit(self.U[0]) {
                        self.status = Status::PastLimit;
                        break;
                    }
                },
                Attempt::Rejected { h_next } => {
                    self.h = h_next;
                    self.refine = true;
                },
            }
        }
        log::trace!(
            "integration from b = {:e}, d_dob = {:e} ended with {:?} at o = {:e} after {} attempts",
            self.b, self.d_dob, self.status, self.o_end, self.nattempts,
        );
        self.status
    }

    /// Get the current status.
    pub fn status(&self) -> Status { self.status }

    /// Get the equation being integrated.
    pub fn equation(&self) -> &'a Equation { self.sys.equation() }

    /// Get the boundary position.
    pub fn ob(&self) -> f64 { self.ob }

    /// Get the boundary value of the current run.
    pub fn b(&self) -> f64 { self.b }

    /// Get the boundary derivative of the current run.
    pub fn d_dob(&self) -> f64 { self.d_dob }

    /// Get the limit value, if any.
    pub fn limit(&self) -> Option<f64> { self.limit }

    /// Get the position at which the current run ended; for a settled run,
    /// this is where the derivative vanishes.
    pub fn o_end(&self) -> f64 { self.o_end }

    /// Get the value of the unknown at [`Self::o_end`].
    pub fn u_end(&self) -> f64 { self.u_end }

    /// Get the accepted steps of the current run.
    pub fn steps(&self) -> &[Step] { &self.steps }

    /// Get the number of step attempts in the current run.
    pub fn nattempts(&self) -> usize { self.nattempts }
}
