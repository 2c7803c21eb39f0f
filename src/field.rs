//! Host-side iteration-count field.

use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{escape, params::FractalParameters, screen};

/// Iteration counts for a raster, row-major: pixel `(px, py)` lives at
/// `py * width + px`, the same layout as [`crate::scalar::PixelBuffer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationField {
    size: screen::Size,
    max_iterations: u32,
    counts: Vec<u32>,
}

impl IterationField {
    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn get(&self, px: u32, py: u32) -> Option<u32> {
        if px >= self.size.width || py >= self.size.height {
            return None;
        }
        self.counts
            .get(py as usize * self.size.width as usize + px as usize)
            .copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.counts.chunks_exact(self.size.width.max(1) as usize)
    }
}

/// Evaluates every pixel of `size` under `params`.
///
/// Rows are computed in parallel on the current rayon pool. Callers validate
/// `params` first; an empty raster yields an empty field.
pub fn compute_field(params: &FractalParameters, size: screen::Size) -> IterationField {
    trace!("begin compute_field {}x{}", size.width, size.height);

    let julia_constant = params.julia_constant();
    let mut counts = vec![0; size.pixel_count()];

    if !size.is_empty() {
        counts
            .par_chunks_mut(size.width as usize)
            .enumerate()
            .for_each(|(py, row)| {
                for (px, count) in row.iter_mut().enumerate() {
                    let point =
                        size.to_complex(px as u32, py as u32, params.view_scale, params.pan_offset);
                    *count = escape::evaluate(point, julia_constant, params.max_iterations);
                }
            });
    }

    trace!("end compute_field");

    IterationField {
        size,
        max_iterations: params.max_iterations,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_field;
    use crate::{
        complex::Complex,
        escape,
        params::{FractalFamily, FractalParameters},
        screen::Size,
    };

    #[test]
    fn field_matches_pointwise_evaluation() {
        let params = FractalParameters {
            family: FractalFamily::Julia,
            max_iterations: 60,
            view_scale: 3.0,
            pan_offset: Complex::new(0.1, -0.2),
            ..Default::default()
        };
        let size = Size::new(37, 23);
        let field = compute_field(&params, size);

        assert_eq!(field.counts().len(), 37 * 23);
        for py in 0..size.height {
            for px in 0..size.width {
                let point = size.to_complex(px, py, params.view_scale, params.pan_offset);
                let expected = escape::evaluate(point, Some(params.julia_constant), 60);
                assert_eq!(field.get(px, py), Some(expected));
            }
        }
    }

    #[test]
    fn rows_follow_raster_height() {
        let field = compute_field(&FractalParameters::default(), Size::new(8, 5));
        assert_eq!(field.rows().count(), 5);
        assert!(field.rows().all(|row| row.len() == 8));
        assert_eq!(field.get(8, 0), None);
        assert_eq!(field.get(0, 5), None);
    }

    #[test]
    fn mandelbrot_field_is_symmetric_about_the_real_axis() {
        // Even height with the pan on the real axis puts row `h/2 + k` at
        // imaginary `k * s` and row `h/2 - k` at `-k * s`.
        let params = FractalParameters {
            max_iterations: 80,
            pan_offset: Complex::new(-0.5, 0.0),
            ..Default::default()
        };
        let size = Size::new(32, 32);
        let field = compute_field(&params, size);
        for k in 1..16 {
            for px in 0..32 {
                assert_eq!(field.get(px, 16 + k), field.get(px, 16 - k));
            }
        }
    }

    #[test]
    fn empty_raster_gives_empty_field() {
        let field = compute_field(&FractalParameters::default(), Size::new(0, 4));
        assert!(field.counts().is_empty());
    }
}
