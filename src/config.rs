//! Command-line configuration.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;

use crate::{
    complex::Complex,
    error::ConfigurationError,
    params::{FractalFamily, FractalParameters},
    screen,
};

#[derive(Debug, Parser)]
#[clap(author, version, about = "Interactive Mandelbrot and Julia set renderer")]
pub struct Args {
    /// Parameter snapshot to start from. The `S` key stores back to it.
    #[clap(long)]
    pub params: Option<PathBuf>,

    /// Render the Julia set instead of the Mandelbrot set.
    #[clap(long)]
    pub julia: bool,

    #[clap(long, allow_hyphen_values = true)]
    pub julia_real: Option<f64>,

    #[clap(long, allow_hyphen_values = true)]
    pub julia_imag: Option<f64>,

    #[clap(long)]
    pub iterations: Option<u32>,

    /// Complex-plane span of the shorter side of the image.
    #[clap(long)]
    pub scale: Option<f64>,

    #[clap(long, allow_hyphen_values = true)]
    pub pan_x: Option<f64>,

    #[clap(long, allow_hyphen_values = true)]
    pub pan_y: Option<f64>,

    /// Hue offset in degrees.
    #[clap(long, allow_hyphen_values = true)]
    pub hue: Option<f64>,

    /// Raster size, `WIDTHxHEIGHT`.
    #[clap(long, default_value = "800x800")]
    pub size: RasterSize,

    /// Render one frame to this PNG file instead of opening a window.
    #[clap(long, short)]
    pub output: Option<PathBuf>,

    /// Never use the fragment-program renderer.
    #[clap(long)]
    pub scalar: bool,

    /// Worker threads for host rendering. Defaults to the number of CPUs.
    #[clap(long)]
    pub threads: Option<usize>,
}

impl Args {
    /// Applies command-line overrides on top of `base`.
    pub fn apply(&self, base: FractalParameters) -> FractalParameters {
        let mut params = base;
        if self.julia {
            params.family = FractalFamily::Julia;
        }
        params.julia_constant = Complex::new(
            self.julia_real.unwrap_or(params.julia_constant.real),
            self.julia_imag.unwrap_or(params.julia_constant.imaginary),
        );
        params.max_iterations = self.iterations.unwrap_or(params.max_iterations);
        params.view_scale = self.scale.unwrap_or(params.view_scale);
        params.pan_offset = Complex::new(
            self.pan_x.unwrap_or(params.pan_offset.real),
            self.pan_y.unwrap_or(params.pan_offset.imaginary),
        );
        params.hue_offset = self.hue.unwrap_or(params.hue_offset);
        params
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterSize(pub screen::Size);

impl FromStr for RasterSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|error| format!("bad dimension {part:?}: {error}"))
        };
        let size = screen::Size::new(parse(width)?, parse(height)?);
        if size.is_empty() {
            return Err(ConfigurationError::EmptyRaster {
                width: size.width,
                height: size.height,
            }
            .to_string());
        }
        Ok(RasterSize(size))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Args, RasterSize};
    use crate::{
        complex::Complex,
        params::{FractalFamily, FractalParameters},
        screen::Size,
    };

    #[test]
    fn raster_size_parses() {
        assert_eq!("640x480".parse(), Ok(RasterSize(Size::new(640, 480))));
        assert_eq!("12X7".parse(), Ok(RasterSize(Size::new(12, 7))));
        assert!("640".parse::<RasterSize>().is_err());
        assert!("ax4".parse::<RasterSize>().is_err());
    }

    #[test]
    fn empty_raster_is_rejected_on_the_command_line() {
        assert!("0x10".parse::<RasterSize>().is_err());
        assert!("10x0".parse::<RasterSize>().is_err());
        assert!(Args::try_parse_from(["wgpu-fractal", "--output", "out.png", "--size", "0x10"]).is_err());
    }

    #[test]
    fn overrides_apply_over_base() {
        let args = Args::parse_from([
            "wgpu-fractal",
            "--julia",
            "--julia-real",
            "-0.8",
            "--iterations",
            "250",
            "--pan-y",
            "-0.25",
        ]);
        let params = args.apply(FractalParameters::default());
        assert_eq!(params.family, FractalFamily::Julia);
        assert_eq!(params.julia_constant, Complex::new(-0.8, 0.27015));
        assert_eq!(params.max_iterations, 250);
        assert_eq!(params.pan_offset, Complex::new(0.0, -0.25));
        assert_eq!(params.view_scale, 4.0);
        assert_eq!(args.size, RasterSize(Size::new(800, 800)));
    }

    #[test]
    fn no_overrides_keep_base() {
        let args = Args::parse_from(["wgpu-fractal"]);
        assert_eq!(
            args.apply(FractalParameters::default()),
            FractalParameters::default()
        );
        assert!(args.threads() >= 1);
    }
}
