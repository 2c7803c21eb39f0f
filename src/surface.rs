//! Display surfaces a render pass draws into.

use std::num::NonZeroU32;

use log::trace;

use crate::{
    command_buffer,
    error::{ConfigurationError, SurfaceError},
    gpu::GpuContext,
    scalar::{PixelBuffer, BYTES_PER_PIXEL},
    screen,
    typed_buffer::Buffer,
};

/// A device-backed colour target for one pass.
pub struct GpuTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub view: &'a wgpu::TextureView,
    pub format: wgpu::TextureFormat,
    pub size: screen::Size,
}

pub trait Surface {
    fn size(&self) -> screen::Size;

    /// Target for the parallel path, if this surface lives on a device.
    fn gpu_target(&self) -> Option<GpuTarget<'_>>;

    /// Shows a frame rendered on the host. `pixels` has the surface's size.
    fn present_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), SurfaceError>;
}

pub(crate) fn check_size(expected: screen::Size, pixels: &PixelBuffer) -> Result<(), SurfaceError> {
    if pixels.size() == expected {
        Ok(())
    } else {
        Err(SurfaceError::SizeMismatch {
            expected,
            actual: pixels.size(),
        })
    }
}

/// Host memory surface. Keeps the last presented frame.
pub struct MemorySurface {
    size: screen::Size,
    frame: Option<PixelBuffer>,
}

impl MemorySurface {
    pub fn new(size: screen::Size) -> Self {
        Self { size, frame: None }
    }

    pub fn frame(&self) -> Option<&PixelBuffer> {
        self.frame.as_ref()
    }

    pub fn into_frame(self) -> Option<PixelBuffer> {
        self.frame
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> screen::Size {
        self.size
    }

    fn gpu_target(&self) -> Option<GpuTarget<'_>> {
        None
    }

    fn present_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), SurfaceError> {
        check_size(self.size, pixels)?;
        self.frame = Some(pixels.clone());
        Ok(())
    }
}

/// An RGBA texture on the device that can be read back to host memory.
pub struct OffscreenSurface<'a> {
    gpu: &'a GpuContext,
    size: screen::Size,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl<'a> OffscreenSurface<'a> {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Allocates the target texture. An empty raster is rejected before
    /// anything is created on the device.
    pub fn new(gpu: &'a GpuContext, size: screen::Size) -> Result<Self, ConfigurationError> {
        if size.is_empty() {
            return Err(ConfigurationError::EmptyRaster {
                width: size.width,
                height: size.height,
            });
        }

        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen-texture"),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            gpu,
            size,
            texture,
            view,
        })
    }

    /// Copies the texture into host memory, dropping row padding.
    pub fn read_pixels(&self) -> Result<PixelBuffer, SurfaceError> {
        trace!("begin read_pixels");

        let row_bytes = self.size.width as usize * BYTES_PER_PIXEL;
        let padded_row_bytes = padded_bytes_per_row(row_bytes);

        let staging = Buffer::<u8>::with_len(
            &self.gpu.device,
            "readback-buffer",
            padded_row_bytes as u64 * self.size.height as u64,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        );

        let command_buffer = command_buffer::create(&self.gpu.device, "readback", |encoder| {
            encoder.copy_texture_to_buffer(
                self.texture.as_image_copy(),
                wgpu::ImageCopyBuffer {
                    buffer: staging.buffer(),
                    layout: wgpu::ImageDataLayout {
                        offset: 0,
                        bytes_per_row: NonZeroU32::new(padded_row_bytes as u32),
                        rows_per_image: NonZeroU32::new(self.size.height),
                    },
                },
                extent(self.size),
            );
        });
        self.gpu.queue.submit([command_buffer]);

        let padded = staging.read(&self.gpu.device)?;
        let data: Vec<u8> = padded
            .chunks_exact(padded_row_bytes)
            .flat_map(|row| &row[..row_bytes])
            .copied()
            .collect();

        trace!("end read_pixels");

        PixelBuffer::from_raw(self.size, data).ok_or_else(|| {
            SurfaceError::Unavailable("read-back returned a truncated frame".into())
        })
    }
}

impl Surface for OffscreenSurface<'_> {
    fn size(&self) -> screen::Size {
        self.size
    }

    fn gpu_target(&self) -> Option<GpuTarget<'_>> {
        Some(GpuTarget {
            device: &self.gpu.device,
            queue: &self.gpu.queue,
            view: &self.view,
            format: Self::FORMAT,
            size: self.size,
        })
    }

    fn present_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), SurfaceError> {
        check_size(self.size, pixels)?;
        write_texture(&self.gpu.queue, &self.texture, pixels);
        Ok(())
    }
}

pub(crate) fn extent(size: screen::Size) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

/// Uploads tightly packed RGBA rows into `texture`.
pub(crate) fn write_texture(queue: &wgpu::Queue, texture: &wgpu::Texture, pixels: &PixelBuffer) {
    let size = pixels.size();
    queue.write_texture(
        texture.as_image_copy(),
        pixels.as_bytes(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: NonZeroU32::new(size.width * BYTES_PER_PIXEL as u32),
            rows_per_image: NonZeroU32::new(size.height),
        },
        extent(size),
    );
}

fn padded_bytes_per_row(row_bytes: usize) -> usize {
    let alignment = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as usize;
    (row_bytes + alignment - 1) / alignment * alignment
}

#[cfg(test)]
mod tests {
    use super::{padded_bytes_per_row, MemorySurface, Surface};
    use crate::{error::SurfaceError, scalar::PixelBuffer, screen::Size};

    #[test]
    fn rows_pad_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(4), 256);
        assert_eq!(padded_bytes_per_row(256), 256);
        assert_eq!(padded_bytes_per_row(3200), 3328);
    }

    #[test]
    fn memory_surface_keeps_last_frame() {
        let size = Size::new(3, 2);
        let mut surface = MemorySurface::new(size);
        assert!(surface.gpu_target().is_none());
        assert!(surface.frame().is_none());

        let pixels = PixelBuffer::from_raw(size, vec![7; 24]).unwrap();
        surface.present_pixels(&pixels).unwrap();
        assert_eq!(surface.frame(), Some(&pixels));
    }

    #[test]
    fn memory_surface_rejects_wrong_size() {
        let mut surface = MemorySurface::new(Size::new(3, 2));
        let pixels = PixelBuffer::new(Size::new(2, 3));
        assert!(matches!(
            surface.present_pixels(&pixels),
            Err(SurfaceError::SizeMismatch { .. })
        ));
        assert!(surface.frame().is_none());
    }
}
