/*!
Chooses between the parallel fragment-program renderer and the host
renderer for each pass.

The parallel path is taken when the surface lives on a device, the
iteration budget is within [`shader::ITERATION_CAP`], and the fractal
program compiles for the surface's format. Everything else, including a
program that fails to compile, is drawn on the host. Nothing is drawn
before the choice is made.
*/

use log::{debug, error, trace};

use crate::{
    error::{ConfigurationError, RenderError, SurfaceError},
    field,
    params::FractalParameters,
    scalar,
    shader::{self, ShaderRenderer},
    surface::Surface,
};

/// Which renderer produced a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Shader,
    Scalar,
}

/// A renderer selected for one pass.
pub enum Renderer<'a> {
    Shader(&'a ShaderRenderer),
    Scalar(Option<&'a rayon::ThreadPool>),
}

impl Renderer<'_> {
    pub fn backend(&self) -> Backend {
        match self {
            Renderer::Shader(_) => Backend::Shader,
            Renderer::Scalar(_) => Backend::Scalar,
        }
    }

    pub fn render(
        &self,
        params: &FractalParameters,
        surface: &mut dyn Surface,
    ) -> Result<(), RenderError> {
        match self {
            Renderer::Shader(renderer) => {
                let target = surface.gpu_target().ok_or_else(|| {
                    SurfaceError::Unavailable("surface has no device target".into())
                })?;
                renderer.render(&target, params);
            }
            Renderer::Scalar(thread_pool) => {
                let size = surface.size();
                let pixels = match thread_pool {
                    Some(thread_pool) => thread_pool.install(|| render_on_host(params, size)),
                    None => render_on_host(params, size),
                };
                surface.present_pixels(&pixels)?;
            }
        }
        Ok(())
    }
}

fn render_on_host(params: &FractalParameters, size: crate::screen::Size) -> scalar::PixelBuffer {
    let field = field::compute_field(params, size);
    scalar::render(&field, params.hue_offset, params.max_iterations)
}

enum ShaderState {
    Untried,
    Ready(ShaderRenderer),
    /// Compilation failed for this format; not retried.
    Failed(wgpu::TextureFormat),
}

pub struct RenderDispatcher {
    shader: ShaderState,
    program: &'static str,
    shader_enabled: bool,
    thread_pool: Option<rayon::ThreadPool>,
}

impl Default for RenderDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderDispatcher {
    pub fn new() -> Self {
        Self {
            shader: ShaderState::Untried,
            program: shader::FRACTAL_PROGRAM,
            shader_enabled: true,
            thread_pool: None,
        }
    }

    /// Never tries the parallel path.
    pub fn scalar_only() -> Self {
        Self {
            shader_enabled: false,
            ..Self::new()
        }
    }

    /// Runs host passes on `thread_pool` instead of the global rayon pool.
    pub fn with_thread_pool(mut self, thread_pool: rayon::ThreadPool) -> Self {
        self.thread_pool = Some(thread_pool);
        self
    }

    /// Compiles `program` instead of the built-in fractal program. It must
    /// expose the same entry points and bindings.
    pub fn with_program_source(mut self, program: &'static str) -> Self {
        self.program = program;
        self.shader = ShaderState::Untried;
        self
    }

    /// Picks the renderer for `params` on `surface`, compiling the fractal
    /// program on first use. Compilation failures are logged and cause the
    /// host renderer to be chosen.
    pub fn select(&mut self, params: &FractalParameters, surface: &dyn Surface) -> Renderer<'_> {
        if !self.shader_enabled {
            return Renderer::Scalar(self.thread_pool.as_ref());
        }
        if params.max_iterations > shader::ITERATION_CAP {
            debug!(
                "{} iterations exceed the fragment program cap of {}; rendering on the host",
                params.max_iterations,
                shader::ITERATION_CAP
            );
            return Renderer::Scalar(self.thread_pool.as_ref());
        }
        let Some(target) = surface.gpu_target() else {
            return Renderer::Scalar(self.thread_pool.as_ref());
        };

        let needs_compile = match &self.shader {
            ShaderState::Untried => true,
            ShaderState::Ready(renderer) => renderer.format() != target.format,
            ShaderState::Failed(format) => *format != target.format,
        };
        if needs_compile {
            let compiled = ShaderRenderer::with_program(target.device, target.format, self.program);
            self.shader = match compiled {
                Ok(renderer) => ShaderState::Ready(renderer),
                Err(initialization_error) => {
                    error!("{initialization_error}; falling back to host rendering");
                    ShaderState::Failed(target.format)
                }
            };
        }

        match &self.shader {
            ShaderState::Ready(renderer) => Renderer::Shader(renderer),
            _ => Renderer::Scalar(self.thread_pool.as_ref()),
        }
    }

    /// Renders one full frame of `params` into `surface`.
    ///
    /// Fails without drawing when `params` is invalid or the surface has no
    /// pixels, and when the surface cannot take the frame.
    pub fn render(
        &mut self,
        params: &FractalParameters,
        surface: &mut dyn Surface,
    ) -> Result<Backend, RenderError> {
        params.validate()?;
        let size = surface.size();
        if size.is_empty() {
            return Err(ConfigurationError::EmptyRaster {
                width: size.width,
                height: size.height,
            }
            .into());
        }

        let renderer = self.select(params, surface);
        let backend = renderer.backend();
        trace!("begin {:?} pass {}x{}", backend, size.width, size.height);
        renderer.render(params, surface)?;
        trace!("end {:?} pass", backend);

        Ok(backend)
    }
}
