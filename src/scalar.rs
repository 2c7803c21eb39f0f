//! Host-side renderer: iteration field in, RGBA pixels out.

use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSlice, ParallelSliceMut};

use crate::{colour, field::IterationField, screen};

pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major RGBA8 pixels, alpha always 255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: screen::Size,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(size: screen::Size) -> Self {
        Self {
            size,
            data: vec![0; size.pixel_count() * BYTES_PER_PIXEL],
        }
    }

    /// Wraps tightly packed RGBA rows. `None` if `data` does not fit `size`.
    pub fn from_raw(size: screen::Size, data: Vec<u8>) -> Option<Self> {
        (data.len() == size.pixel_count() * BYTES_PER_PIXEL).then_some(Self { size, data })
    }

    pub fn size(&self) -> screen::Size {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, px: u32, py: u32) -> Option<[u8; 4]> {
        if px >= self.size.width || py >= self.size.height {
            return None;
        }
        let start = (py as usize * self.size.width as usize + px as usize) * BYTES_PER_PIXEL;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[start..start + BYTES_PER_PIXEL]);
        Some(rgba)
    }
}

/// Colours every cell of `field` with [`colour::colour_for`].
pub fn render(field: &IterationField, hue_offset: f64, max_iterations: u32) -> PixelBuffer {
    trace!("begin scalar render");

    let size = field.size();
    let mut pixels = PixelBuffer::new(size);

    if !size.is_empty() {
        let row_bytes = size.width as usize * BYTES_PER_PIXEL;
        pixels
            .data
            .par_chunks_mut(row_bytes)
            .zip(field.counts().par_chunks(size.width as usize))
            .for_each(|(row, counts)| {
                for (pixel, &count) in row.chunks_exact_mut(BYTES_PER_PIXEL).zip(counts) {
                    pixel.copy_from_slice(
                        &colour::colour_for(count, max_iterations, hue_offset).rgba(),
                    );
                }
            });
    }

    trace!("end scalar render");

    pixels
}
