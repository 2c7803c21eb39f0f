//! Shows a host-rendered [`PixelBuffer`] on a device surface by uploading it
//! to a texture and drawing it over the whole target.

use log::debug;

use crate::{
    command_buffer, command_encoder,
    scalar::PixelBuffer,
    screen,
    surface::{self, GpuTarget},
    typed_buffer::Uniform,
};

struct UploadedFrame {
    size: screen::Size,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

pub struct Blitter {
    target_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    sampler: wgpu::Sampler,
    screen_size: Uniform<[f32; 2]>,
    frame: Option<UploadedFrame>,
}

impl Blitter {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: "vertex_main",
                buffers: &[],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
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
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

        let screen_size = Uniform::new(device, "blit-screen-size", [0.0f32; 2]);

        Self {
            target_format,
            pipeline,
            sampler,
            screen_size,
            frame: None,
        }
    }

    /// Upload format whose stored bytes read back unchanged through the
    /// target's encoding.
    fn upload_format(&self) -> wgpu::TextureFormat {
        if self.target_format.describe().srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    fn ensure_frame(&mut self, device: &wgpu::Device, size: screen::Size) {
        let stale = self.frame.as_ref().map_or(true, |frame| frame.size != size);
        if stale {
            debug!("allocating blit texture {}x{}", size.width, size.height);

            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("blit-texture"),
                size: surface::extent(size),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: self.upload_format(),
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            });
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("blit-bind-group"),
                layout: &self.pipeline.get_bind_group_layout(0),
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    self.screen_size.bind_group_entry(2),
                ],
            });

            self.frame = Some(UploadedFrame {
                size,
                texture,
                bind_group,
            });
        }
    }

    /// Draws `pixels` over the whole of `target`.
    pub fn draw(&mut self, target: &GpuTarget<'_>, pixels: &PixelBuffer) {
        let size = pixels.size();
        self.screen_size
            .write(target.queue, [size.width as f32, size.height as f32]);

        self.ensure_frame(target.device, size);
        let Some(frame) = &self.frame else {
            return;
        };
        surface::write_texture(target.queue, &frame.texture, pixels);

        let command_buffer = command_buffer::create(target.device, "blit-encoder", |encoder| {
            command_encoder::clear_and_draw(encoder, "blit-pass", target.view, |render_pass| {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &frame.bind_group, &[]);
                render_pass.draw(0..4, 0..1);
            });
        });
        target.queue.submit([command_buffer]);
    }
}
