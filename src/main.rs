mod controls;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::{debug, error, info, warn};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, Event, KeyboardInput, ModifiersState, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use wgpu_fractal::{
    config::Args,
    dispatch::RenderDispatcher,
    error::RenderError,
    gpu::GpuContext,
    params::FractalParameters,
    screen,
    surface::{MemorySurface, OffscreenSurface},
    window::WindowSurface,
};

use crate::controls::Control;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let base = match &args.params {
        Some(path) if path.exists() => FractalParameters::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        _ => FractalParameters::default(),
    };
    let params = args.apply(base);
    params.validate()?;

    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads())
        .build()
        .context("failed to start render threads")?;
    let dispatcher = if args.scalar {
        RenderDispatcher::scalar_only()
    } else {
        RenderDispatcher::new()
    }
    .with_thread_pool(thread_pool);

    match &args.output {
        Some(output) => render_to_file(dispatcher, &params, args.size.0, args.scalar, output),
        None => run_window(dispatcher, params, args.size.0, args.params.clone()),
    }
}

fn render_to_file(
    mut dispatcher: RenderDispatcher,
    params: &FractalParameters,
    size: screen::Size,
    scalar: bool,
    output: &Path,
) -> anyhow::Result<()> {
    let gpu = if scalar {
        None
    } else {
        GpuContext::headless()
            .map_err(|initialization_error| {
                warn!("{initialization_error}; rendering on the host");
            })
            .ok()
    };

    let pixels = match &gpu {
        Some(gpu) => {
            let mut surface = OffscreenSurface::new(gpu, size)?;
            let backend = dispatcher.render(params, &mut surface)?;
            info!("rendered {}x{} with {:?}", size.width, size.height, backend);
            surface.read_pixels()?
        }
        None => {
            let mut surface = MemorySurface::new(size);
            let backend = dispatcher.render(params, &mut surface)?;
            info!("rendered {}x{} with {:?}", size.width, size.height, backend);
            surface
                .into_frame()
                .context("render pass completed without a frame")?
        }
    };

    image::save_buffer(
        output,
        pixels.as_bytes(),
        size.width,
        size.height,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("failed to write {}", output.display()))?;

    Ok(())
}

fn run_window(
    mut dispatcher: RenderDispatcher,
    mut params: FractalParameters,
    size: screen::Size,
    snapshot_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("wgpu-fractal")
        .with_inner_size(PhysicalSize::new(size.width, size.height))
        .build(&event_loop)
        .context("failed to open window")?;

    let instance = wgpu::Instance::new(wgpu::Backends::all());
    let surface = unsafe { instance.create_surface(&window) };
    let gpu = GpuContext::new(&instance, Some(&surface))
        .context("no graphics device to present to; use --output for a headless render")?;
    let mut window_surface = WindowSurface::new(&gpu, surface, window.inner_size().into());

    let mut modifiers = ModifiersState::empty();

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    window_surface.resize(&gpu, size.into());
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    window_surface.resize(&gpu, (*new_inner_size).into());
                    window.request_redraw();
                }
                WindowEvent::ModifiersChanged(state) => {
                    modifiers = state;
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match key {
                    VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                    VirtualKeyCode::S => store_snapshot(&params, snapshot_path.as_deref()),
                    key => {
                        if let Some(control) = Control::from_key(key, modifiers.shift()) {
                            params = control.apply(&params);
                            debug!("{:?} -> {:?}", control, params);
                            window.request_redraw();
                        }
                    }
                },
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                if window_surface.size().is_empty() {
                    return;
                }
                let mut frame = match window_surface.acquire(&gpu) {
                    Ok(frame) => frame,
                    Err(surface_error) => {
                        warn!("skipping frame: {surface_error}");
                        return;
                    }
                };
                match dispatcher.render(&params, &mut frame) {
                    Ok(backend) => {
                        debug!("frame drawn with {:?}", backend);
                        frame.present();
                    }
                    Err(RenderError::Configuration(configuration_error)) => {
                        error!("not rendering: {configuration_error}");
                    }
                    Err(render_error) => {
                        warn!("frame not drawn: {render_error}");
                    }
                }
            }
            _ => {}
        }
    })
}

fn store_snapshot(params: &FractalParameters, path: Option<&Path>) {
    let Some(path) = path else {
        warn!("no --params file given; snapshot not stored");
        return;
    };
    match params.store(path) {
        Ok(()) => info!("stored parameters in {}", path.display()),
        Err(snapshot_error) => error!("{snapshot_error}"),
    }
}
