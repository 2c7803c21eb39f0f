/*!
Parallel renderer: the escape iteration and colouring run in `fractal.wgsl`,
one fragment per pixel, driven by [`Uniforms`] rather than a precomputed
iteration field.

The program is compiled once per target format and kept; each pass only
rewrites the uniforms, clears the target and issues one draw of a
full-screen quad.
*/

use bytemuck::{Pod, Zeroable};
use log::{debug, trace};

use crate::{
    command_buffer, command_encoder, error::DeviceInitializationError,
    params::FractalParameters, screen, surface::GpuTarget,
    typed_buffer::{Buffer, Uniform},
};

/// Loop trip cap of `fractal.wgsl#escape_time`. Budgets above it are not
/// reproduced faithfully by the fragment program.
pub const ITERATION_CAP: u32 = 4096;

pub const FRACTAL_PROGRAM: &str = include_str!("fractal.wgsl");

/// Two triangles covering clip space.
const FULL_SCREEN_QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

/// Corresponds to `fractal.wgsl#Params`.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Uniforms {
    pub resolution: [f32; 2],
    pub pan: [f32; 2],
    pub julia_constant: [f32; 2],
    pub scale: f32,
    pub hue_offset: f32,
    pub max_iterations: u32,
    pub is_julia: u32,
    pub srgb_target: u32,
    _padding: u32,
}

impl Uniforms {
    pub fn new(params: &FractalParameters, size: screen::Size, format: wgpu::TextureFormat) -> Self {
        Self {
            resolution: [size.width as f32, size.height as f32],
            pan: [
                params.pan_offset.real as f32,
                params.pan_offset.imaginary as f32,
            ],
            julia_constant: [
                params.julia_constant.real as f32,
                params.julia_constant.imaginary as f32,
            ],
            scale: size.pixel_scale(params.view_scale) as f32,
            hue_offset: params.hue_offset as f32,
            max_iterations: params.max_iterations,
            is_julia: params.julia_constant().is_some() as u32,
            srgb_target: format.describe().srgb as u32,
            _padding: 0,
        }
    }
}

pub struct ShaderRenderer {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniforms: Uniform<Uniforms>,
    quad: Buffer<[f32; 2]>,
}

impl ShaderRenderer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> Result<Self, DeviceInitializationError> {
        Self::with_program(device, format, FRACTAL_PROGRAM)
    }

    /// Compiles and links `source`, which must expose the entry points and
    /// bindings of `fractal.wgsl`.
    ///
    /// Validation errors are captured in an error scope and returned with
    /// the compiler's log, so no pipeline exists for an invalid program.
    pub fn with_program(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        source: &str,
    ) -> Result<Self, DeviceInitializationError> {
        debug!("compiling fractal program for {:?}", format);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fractal-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(DeviceInitializationError::ShaderCompilation(error.to_string()));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fractal-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fractal-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fractal-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: "vertex_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: "fragment_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(DeviceInitializationError::PipelineLink(error.to_string()));
        }

        let uniforms = Uniform::new(device, "fractal-uniforms", Uniforms::zeroed());
        let quad = Buffer::with_contents(
            device,
            "full-screen-quad",
            &FULL_SCREEN_QUAD,
            wgpu::BufferUsages::VERTEX,
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fractal-bind-group"),
            layout: &bind_group_layout,
            entries: &[uniforms.bind_group_entry(0)],
        });

        Ok(Self {
            format,
            pipeline,
            bind_group,
            uniforms,
            quad,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Draws one full frame of `params` into `target`.
    pub fn render(&self, target: &GpuTarget<'_>, params: &FractalParameters) {
        trace!("begin shader render");

        self.uniforms.write(
            target.queue,
            Uniforms::new(params, target.size, self.format),
        );

        let command_buffer = command_buffer::create(target.device, "fractal-encoder", |encoder| {
            command_encoder::clear_and_draw(encoder, "fractal-pass", target.view, |render_pass| {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.quad.slice());
                render_pass.draw(0..self.quad.len() as u32, 0..1);
            });
        });
        target.queue.submit([command_buffer]);

        trace!("end shader render");
    }
}
