//! Presentation to a window through a `wgpu` surface.

use log::debug;

use crate::{
    blit::Blitter,
    error::SurfaceError,
    gpu::GpuContext,
    scalar::PixelBuffer,
    screen,
    surface::{self, GpuTarget, Surface},
};

pub struct WindowSurface {
    surface: wgpu::Surface,
    configuration: wgpu::SurfaceConfiguration,
    blitter: Blitter,
}

impl WindowSurface {
    pub fn new(gpu: &GpuContext, surface: wgpu::Surface, size: screen::Size) -> Self {
        let formats = surface.get_supported_formats(&gpu.adapter);
        // A non-sRGB target stores colour bytes unchanged.
        let format = formats
            .iter()
            .copied()
            .find(|format| !format.describe().srgb)
            .or_else(|| formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8Unorm);
        debug!("window surface format {:?}", format);

        let configuration = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        };
        surface.configure(&gpu.device, &configuration);

        let blitter = Blitter::new(&gpu.device, format);

        Self {
            surface,
            configuration,
            blitter,
        }
    }

    pub fn size(&self) -> screen::Size {
        screen::Size::new(self.configuration.width, self.configuration.height)
    }

    pub fn resize(&mut self, gpu: &GpuContext, size: screen::Size) {
        if size.is_empty() {
            return;
        }
        debug!("resizing to {:?}", size);
        self.configuration.width = size.width;
        self.configuration.height = size.height;
        self.surface.configure(&gpu.device, &self.configuration);
    }

    /// Acquires the next frame, reconfiguring once if the surface went stale.
    pub fn acquire<'a>(&'a mut self, gpu: &'a GpuContext) -> Result<WindowFrame<'a>, SurfaceError> {
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&gpu.device, &self.configuration);
                self.surface
                    .get_current_texture()
                    .map_err(|error| SurfaceError::Unavailable(error.to_string()))?
            }
            Err(error) => return Err(SurfaceError::Unavailable(error.to_string())),
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(WindowFrame {
            gpu,
            blitter: &mut self.blitter,
            format: self.configuration.format,
            size: screen::Size::new(self.configuration.width, self.configuration.height),
            texture,
            view,
        })
    }
}

/// One acquired swapchain image. Shown by [`WindowFrame::present`].
pub struct WindowFrame<'a> {
    gpu: &'a GpuContext,
    blitter: &'a mut Blitter,
    format: wgpu::TextureFormat,
    size: screen::Size,
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl WindowFrame<'_> {
    pub fn present(self) {
        self.texture.present();
    }
}

impl Surface for WindowFrame<'_> {
    fn size(&self) -> screen::Size {
        self.size
    }

    fn gpu_target(&self) -> Option<GpuTarget<'_>> {
        Some(GpuTarget {
            device: &self.gpu.device,
            queue: &self.gpu.queue,
            view: &self.view,
            format: self.format,
            size: self.size,
        })
    }

    fn present_pixels(&mut self, pixels: &PixelBuffer) -> Result<(), SurfaceError> {
        surface::check_size(self.size, pixels)?;
        let target = GpuTarget {
            device: &self.gpu.device,
            queue: &self.gpu.queue,
            view: &self.view,
            format: self.format,
            size: self.size,
        };
        self.blitter.draw(&target, pixels);
        Ok(())
    }
}
