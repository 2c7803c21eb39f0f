//! Quadratic escape-time iteration `z := z^2 + c`.

use num_traits::Float;

use crate::complex::Complex;

/// Squared escape radius. A point whose orbit leaves the disc of radius 2
/// never returns.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Counts completed iterations of `z := z^2 + c` before `|z|^2 > 4`.
///
/// Mandelbrot (`julia_constant = None`) iterates from `z = 0` with `c = point`.
/// Julia iterates from `z = point` with the fixed `c = julia_constant`.
///
/// Returns `max_iterations` exactly when the orbit stayed bounded. A
/// non-finite orbit that never compares greater than the bound also runs to
/// `max_iterations`.
pub fn evaluate<F: Float>(
    point: Complex<F>,
    julia_constant: Option<Complex<F>>,
    max_iterations: u32,
) -> u32 {
    let (mut z, c) = match julia_constant {
        None => (Complex::zero(), point),
        Some(constant) => (point, constant),
    };
    let bound = F::from(ESCAPE_RADIUS_SQUARED).unwrap_or_else(F::max_value);

    let mut iteration = 0;
    while iteration < max_iterations {
        if z.norm_squared() > bound {
            break;
        }
        z = z.square_add(c);
        iteration += 1;
    }
    iteration
}
