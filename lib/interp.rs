//! Polynomial interpolation through sampled points.
//!
//! Used to evaluate the dense output of accepted integrator steps, whose
//! collocation polynomials are stored as their values at the nodes.
//!
//! ```
//! use ndarray as nd;
//! use boltzmann::interp::lagrange;
//!
//! let x = nd::array![0.0, 1.0, 2.0];
//! let y = x.mapv(|xk: f64| xk.powi(2) - 1.0);
//! let val = lagrange(&x, &y, 1.5).unwrap();
//! assert!((val - 1.25).abs() < 1e-12);
//! ```

use ndarray as nd;
use num_traits::Num;
use crate::error::*;

pub type InterpResult<T> = Result<T, InterpError>;

/// Compute the value of a sampled function via a Lagrange polynomial.
pub fn lagrange<S, T, A>(
    data_x: &nd::ArrayBase<S, nd::Ix1>,
    data_y: &nd::ArrayBase<T, nd::Ix1>,
    x: A,
) -> InterpResult<A>
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Num + Copy
{
    LengthError::check(data_x, data_y)?;
    (!data_x.is_empty()).then_some(()).ok_or(InterpError::NoNodes)?;
    let res: A
        = data_x.iter().zip(data_y).enumerate()
        .map(|(j, (xj, yj))| {
            let xj = *xj;
            let inner
                = data_x.iter().enumerate()
                .filter(|(m, _)| *m != j)
                .map(|(_, xm)| (x - *xm) / (xj - *xm))
                .fold(A::one(), A::mul);
            *yj * inner
        })
        .fold(A::zero(), A::add);
    Ok(res)
}

/// Find the index of the interval `[nodes[k], nodes[k + 1]]` containing `x`
/// in a sorted array of breakpoints.
///
/// Points at or beyond the last breakpoint belong to the last interval;
/// returns `None` if `x` is NaN, lies before the first breakpoint, or there
/// are fewer than two breakpoints.
pub fn locate<S>(nodes: &nd::ArrayBase<S, nd::Ix1>, x: f64) -> Option<usize>
where S: nd::Data<Elem = f64>
{
    let n = nodes.len();
    if n < 2 || x.is_nan() || x < nodes[0] { return None; }
    let k = nodes.as_slice()
        .map(|s| s.partition_point(|xk| *xk <= x))
        .unwrap_or_else(|| nodes.iter().take_while(|xk| **xk <= x).count());
    Some(k.saturating_sub(1).min(n - 2))
}
