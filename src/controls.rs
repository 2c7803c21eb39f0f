//! Keyboard control surface. Clamping lives here, never in the core.

use winit::event::VirtualKeyCode;

use wgpu_fractal::{complex::Complex, params::FractalParameters};

/// Fraction of the view scale moved per pan step.
const PAN_STEP: f64 = 0.05;
const ZOOM_FACTOR_IN: f64 = 0.8;
const ZOOM_FACTOR_OUT: f64 = 1.25;
const HUE_STEP: f64 = 10.0;
const JULIA_STEP: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    HueForward,
    HueBack,
    MoreIterations,
    FewerIterations,
    ToggleFamily,
    JuliaRealUp,
    JuliaRealDown,
    JuliaImaginaryUp,
    JuliaImaginaryDown,
}

impl Control {
    pub fn from_key(key: VirtualKeyCode, shift: bool) -> Option<Self> {
        let control = match key {
            VirtualKeyCode::Left => Control::PanLeft,
            VirtualKeyCode::Right => Control::PanRight,
            VirtualKeyCode::Up => Control::PanUp,
            VirtualKeyCode::Down => Control::PanDown,
            VirtualKeyCode::Equals | VirtualKeyCode::Plus | VirtualKeyCode::NumpadAdd => {
                Control::ZoomIn
            }
            VirtualKeyCode::Minus | VirtualKeyCode::NumpadSubtract => Control::ZoomOut,
            VirtualKeyCode::H if shift => Control::HueBack,
            VirtualKeyCode::H => Control::HueForward,
            VirtualKeyCode::RBracket => Control::MoreIterations,
            VirtualKeyCode::LBracket => Control::FewerIterations,
            VirtualKeyCode::J => Control::ToggleFamily,
            VirtualKeyCode::R if shift => Control::JuliaRealDown,
            VirtualKeyCode::R => Control::JuliaRealUp,
            VirtualKeyCode::I if shift => Control::JuliaImaginaryDown,
            VirtualKeyCode::I => Control::JuliaImaginaryUp,
            _ => return None,
        };
        Some(control)
    }

    pub fn apply(self, params: &FractalParameters) -> FractalParameters {
        let mut next = *params;
        let step = params.view_scale * PAN_STEP;
        let pan = |real: f64, imaginary: f64| {
            Complex::new(
                params.pan_offset.real + real,
                params.pan_offset.imaginary + imaginary,
            )
        };
        match self {
            Control::PanLeft => next.pan_offset = pan(-step, 0.0),
            Control::PanRight => next.pan_offset = pan(step, 0.0),
            // Rows grow downwards, and so does the imaginary axis.
            Control::PanUp => next.pan_offset = pan(0.0, -step),
            Control::PanDown => next.pan_offset = pan(0.0, step),
            Control::ZoomIn => next.view_scale = params.view_scale * ZOOM_FACTOR_IN,
            Control::ZoomOut => next.view_scale = params.view_scale * ZOOM_FACTOR_OUT,
            Control::HueForward => next.hue_offset = (params.hue_offset + HUE_STEP).rem_euclid(360.0),
            Control::HueBack => next.hue_offset = (params.hue_offset - HUE_STEP).rem_euclid(360.0),
            Control::MoreIterations => {
                next.max_iterations = params.max_iterations.saturating_mul(2)
            }
            Control::FewerIterations => next.max_iterations = (params.max_iterations / 2).max(1),
            Control::ToggleFamily => next.family = params.family.toggled(),
            Control::JuliaRealUp => next.julia_constant.real += JULIA_STEP,
            Control::JuliaRealDown => next.julia_constant.real -= JULIA_STEP,
            Control::JuliaImaginaryUp => next.julia_constant.imaginary += JULIA_STEP,
            Control::JuliaImaginaryDown => next.julia_constant.imaginary -= JULIA_STEP,
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use winit::event::VirtualKeyCode;

    use super::Control;
    use wgpu_fractal::params::{FractalFamily, FractalParameters};

    #[test]
    fn keys_map_to_controls() {
        assert_eq!(Control::from_key(VirtualKeyCode::H, false), Some(Control::HueForward));
        assert_eq!(Control::from_key(VirtualKeyCode::H, true), Some(Control::HueBack));
        assert_eq!(Control::from_key(VirtualKeyCode::J, false), Some(Control::ToggleFamily));
        assert_eq!(Control::from_key(VirtualKeyCode::R, true), Some(Control::JuliaRealDown));
        assert_eq!(Control::from_key(VirtualKeyCode::I, false), Some(Control::JuliaImaginaryUp));
        assert_eq!(Control::from_key(VirtualKeyCode::Q, false), None);
    }

    #[test]
    fn julia_constant_nudges_one_component() {
        let params = FractalParameters::default();

        let next = Control::JuliaRealUp.apply(&params);
        assert_relative_eq!(next.julia_constant.real, -0.69, epsilon = 1e-12);
        assert_eq!(next.julia_constant.imaginary, params.julia_constant.imaginary);

        let next = Control::JuliaImaginaryDown.apply(&params);
        assert_eq!(next.julia_constant.real, params.julia_constant.real);
        assert_relative_eq!(next.julia_constant.imaginary, 0.26015, epsilon = 1e-12);
        assert_eq!(next.family, params.family);
    }

    #[test]
    fn pan_moves_by_fraction_of_view() {
        let params = FractalParameters::default();
        let next = Control::PanRight.apply(&params);
        assert_relative_eq!(next.pan_offset.real, 0.2);
        assert_eq!(next.pan_offset.imaginary, 0.0);
    }

    #[test]
    fn iterations_never_drop_below_one() {
        let mut params = FractalParameters {
            max_iterations: 3,
            ..Default::default()
        };
        for _ in 0..4 {
            params = Control::FewerIterations.apply(&params);
        }
        assert_eq!(params.max_iterations, 1);
        assert_eq!(Control::MoreIterations.apply(&params).max_iterations, 2);
    }

    #[test]
    fn hue_wraps() {
        let params = FractalParameters::default();
        assert_eq!(Control::HueBack.apply(&params).hue_offset, 350.0);
    }

    #[test]
    fn zoom_round_trips() {
        let params = FractalParameters::default();
        let zoomed = Control::ZoomOut.apply(&Control::ZoomIn.apply(&params));
        assert_relative_eq!(zoomed.view_scale, params.view_scale, epsilon = 1e-12);
        assert_eq!(
            Control::ToggleFamily.apply(&params).family,
            FractalFamily::Julia
        );
    }
}
