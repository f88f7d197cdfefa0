//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Problems](#problems)
//! - [Shooting](#shooting)
//! - [Integration](#integration)
//!
//! # Background
//! Many transport processes (heat conduction, solute diffusion, and water
//! infiltration into unsaturated porous media among them) are described by
//! nonlinear diffusion equations
//! ```text
//! ∂u   1  ∂  /  m-1       ∂u \
//! -- = --- -- | r    D(u) -- |
//! ∂t  m-1 ∂r  \           ∂r /
//!     r
//! ```
//! with *m* = 1, 2, 3 spatial dimensions under planar, cylindrical, or
//! spherical symmetry. The same structure covers the Richards equation in
//! pressure-head form, where the left-hand side carries a capacity, *C*(*h*)
//! *∂h*/*∂t*, and the diffusivity is replaced by a conductivity *K*(*h*).
//!
//! On a semi-infinite domain *r* > *r*<sub>b</sub>(*t*) with a uniform initial
//! condition *u*(*r*, 0) = *i* and a boundary condition that does not
//! introduce a length scale, the solution is self-similar[^1]. The Boltzmann
//! variable
//! ```text
//!      r
//! o = ---
//!     √t
//! ```
//! collapses both independent variables into one, turning the partial
//! differential equation into the ordinary differential equation
//! ```text
//!   d  /   du \   k     du     C(u) o du
//!  -- | K --- | + - K --- = - ---------,    k = m - 1
//!  do  \   do /   o     do         2   do
//! ```
//! on *o* > *o*<sub>b</sub>, subject to *u* → *i* as *o* → ∞. Derivatives in
//! physical coordinates follow by the chain rule,
//! ```text
//! ∂u   du  1       ∂u     du  o
//! -- = -- ---,     -- = - -- ---
//! ∂r   do √t       ∂t     do 2t
//! ```
//! and the *sorptivity*, which characterizes the cumulative absorption
//! *I* = *S* √*t* through a planar boundary, is
//! ```text
//!                du |
//! S = -2 K(u_b) --- |
//!                do |o=o_b
//! ```
//!
//! # Problems
//! The transformed equation is second order, but only one condition is
//! imposed at each end of a semi-infinite problem. The far-field condition
//! *u*(∞) = *i* is not an initial condition for integration in *o*; what can
//! be integrated is a *Cauchy problem* with known *u* and *du*/*do* at
//! *o*<sub>b</sub>. A boundary value problem becomes a Cauchy problem once the
//! missing boundary condition is found:
//! - Dirichlet: *u*(*o*<sub>b</sub>) = *b* is known; the boundary derivative
//!   is missing.
//! - Flow rate (cylindrical): a volumetric rate *Q*<sub>b</sub> through a
//!   wedge of angle *θ* and height *H* fixes the derivative for any trial
//!   boundary value,
//!   ```text
//!    du |            Q_b
//!    -- |    = - ------------------
//!    do |o_b     θ H o_b K(u_b)
//!   ```
//!   so the boundary value is missing.
//! - Sorptivity: *S* fixes the derivative for any trial boundary value; the
//!   boundary value is missing.
//!
//! # Shooting
//! Integrated away from the boundary, a trajectory with the correct sign of
//! derivative either flattens out (*du*/*do* crosses zero), at which point the
//! value of *u* is the far-field value implied by the trial, or it runs past
//! the target value *i*. The mismatch
//! ```text
//! ρ = u(settled) - i
//! ```
//! is monotonic in the missing boundary condition, and a trajectory that
//! overshoots is assigned an infinite mismatch in the direction of the
//! overshoot. The root of *ρ* is found by first expanding an interval
//! outward from two seeds until the sign of *ρ* changes, then bisecting the
//! bracket until |*ρ*| is within tolerance. Integration of a trial is cut
//! short as soon as *u* passes *i* by more than the tolerance, since such a
//! trajectory cannot settle within it.
//!
//! For a Dirichlet problem the seeds are a zero derivative (which settles
//! immediately at *b*, giving *ρ* = *b* - *i*) and the estimate
//! ```text
//!  du |        i - b
//!  -- |    ≈ ---------
//!  do |o_b   2 √(D(b))
//! ```
//! from the linear problem with diffusivity frozen at *D*(*b*). For the
//! boundary value searches, the seeds are *b* = *i* (a profile starting at
//! *i* with nonzero slope always overshoots) and a hint on the other side of
//! *i*; trial boundary values outside the domain of the equation count as an
//! infinite mismatch in the opposite direction.
//!
//! # Integration
//! Near the settling point the transformed equation is stiff, since the
//! advective term *C o*/2*K* grows without bound while the derivative decays
//! like a Gaussian. Trajectories are therefore integrated with the three-stage
//! Radau IIA method of order five[^2], an L-stable collocation method. Each
//! step solves the collocation conditions
//! ```text
//! z_i = h Σ_j a_ij f(o + c_j h, U + z_j)
//! ```
//! by simplified Newton iteration using the analytic Jacobian of the
//! transformed system, which involves up to the second derivative of *K*.
//! Property functions are evaluated with second-order dual numbers, so that
//! these derivatives are exact.
//!
//! The collocation polynomial of every accepted step is kept, and solutions
//! are evaluated on the same polynomials that the integrator used.
//!
//! [^1]: J. Crank, *The Mathematics of Diffusion*, 2nd ed. (Oxford University
//! Press, 1975), §7.
//!
//! [^2]: E. Hairer and G. Wanner, *Solving Ordinary Differential Equations II:
//! Stiff and Differential-Algebraic Problems*, 2nd ed. (Springer, 1996), §IV.8.
