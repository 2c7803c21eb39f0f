//! Mandelbrot and Julia escape-time rendering on the host or in a
//! fragment program.

pub mod blit;
pub mod colour;
pub mod command_buffer;
pub mod command_encoder;
pub mod complex;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod escape;
pub mod field;
pub mod gpu;
pub mod params;
pub mod scalar;
pub mod screen;
pub mod shader;
pub mod surface;
pub mod typed_buffer;
pub mod window;
