//! Parameter snapshot consumed by one render pass.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{complex::Complex, error::ConfigurationError};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FractalFamily {
    Mandelbrot,
    Julia,
}

impl FractalFamily {
    pub fn toggled(self) -> Self {
        match self {
            FractalFamily::Mandelbrot => FractalFamily::Julia,
            FractalFamily::Julia => FractalFamily::Mandelbrot,
        }
    }
}

/// Immutable input to a render pass. The core never clamps these; see
/// [`FractalParameters::validate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParameters {
    pub family: FractalFamily,
    /// Only read when `family` is [`FractalFamily::Julia`].
    pub julia_constant: Complex,
    pub max_iterations: u32,
    pub view_scale: f64,
    pub pan_offset: Complex,
    pub hue_offset: f64,
}

impl Default for FractalParameters {
    fn default() -> Self {
        Self {
            family: FractalFamily::Mandelbrot,
            julia_constant: Complex::new(-0.7, 0.27015),
            max_iterations: 100,
            view_scale: 4.0,
            pan_offset: Complex::new(0.0, 0.0),
            hue_offset: 0.0,
        }
    }
}

impl FractalParameters {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_iterations == 0 {
            return Err(ConfigurationError::ZeroIterations);
        }
        // Also rejects NaN.
        if !(self.view_scale > 0.0) {
            return Err(ConfigurationError::NonPositiveViewScale(self.view_scale));
        }
        Ok(())
    }

    pub fn julia_constant(&self) -> Option<Complex> {
        match self.family {
            FractalFamily::Mandelbrot => None,
            FractalFamily::Julia => Some(self.julia_constant),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        Ok(snapshot.into())
    }

    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let contents = serde_json::to_string_pretty(&Snapshot::from(*self))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Flat key-value form of [`FractalParameters`], stored verbatim.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub is_julia: bool,
    pub julia_real: f64,
    pub julia_imag: f64,
    pub iterations: u32,
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub hue: f64,
}

impl From<FractalParameters> for Snapshot {
    fn from(params: FractalParameters) -> Self {
        Self {
            is_julia: params.family == FractalFamily::Julia,
            julia_real: params.julia_constant.real,
            julia_imag: params.julia_constant.imaginary,
            iterations: params.max_iterations,
            scale: params.view_scale,
            pan_x: params.pan_offset.real,
            pan_y: params.pan_offset.imaginary,
            hue: params.hue_offset,
        }
    }
}

impl From<Snapshot> for FractalParameters {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            family: if snapshot.is_julia {
                FractalFamily::Julia
            } else {
                FractalFamily::Mandelbrot
            },
            julia_constant: Complex::new(snapshot.julia_real, snapshot.julia_imag),
            max_iterations: snapshot.iterations,
            view_scale: snapshot.scale,
            pan_offset: Complex::new(snapshot.pan_x, snapshot.pan_y),
            hue_offset: snapshot.hue,
        }
    }
}
