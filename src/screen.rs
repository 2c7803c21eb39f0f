use bytemuck::{Pod, Zeroable};

use crate::complex::Complex;

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Complex-plane units per pixel. The shorter side spans `view_scale`.
    pub fn pixel_scale(&self, view_scale: f64) -> f64 {
        view_scale / self.width.min(self.height) as f64
    }

    /// Maps pixel `(px, py)` to the point of the complex plane it looks at.
    ///
    /// `fractal.wgsl#pixel_to_complex` mirrors this per fragment; the two must
    /// agree that the raster centre lands on `pan_offset`.
    pub fn to_complex(&self, px: u32, py: u32, view_scale: f64, pan_offset: Complex) -> Complex {
        let s = self.pixel_scale(view_scale);
        Complex {
            real: (px as f64 - self.width as f64 / 2.0) * s + pan_offset.real,
            imaginary: (py as f64 - self.height as f64 / 2.0) * s + pan_offset.imaginary,
        }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::Size;
    use crate::complex::Complex;

    #[test]
    fn centre_pixel_maps_to_pan_offset() {
        let pan = Complex::new(-0.743643887037151, 0.131825904205330);
        for (width, height) in [(800, 800), (640, 480), (2, 1000)] {
            let size = Size::new(width, height);
            for scale in [4.0, 1e-3, 37.5] {
                let point = size.to_complex(width / 2, height / 2, scale, pan);
                assert_eq!(point, pan);
            }
        }
    }

    #[test]
    fn shorter_side_spans_view_scale() {
        let size = Size::new(400, 200);
        let origin = Complex::new(0.0, 0.0);
        let top = size.to_complex(200, 0, 3.0, origin);
        let bottom = size.to_complex(200, 200, 3.0, origin);
        assert_relative_eq!(bottom.imaginary - top.imaginary, 3.0, epsilon = 1e-12);

        let left = size.to_complex(0, 100, 3.0, origin);
        let right = size.to_complex(400, 100, 3.0, origin);
        assert_relative_eq!(right.real - left.real, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_raster_is_detected() {
        assert!(Size::new(0, 10).is_empty());
        assert!(Size::new(10, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }
}
