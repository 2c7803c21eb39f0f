//! Graphics device acquisition.

use log::info;

use crate::error::DeviceInitializationError;

pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Opens a device on `instance`, able to present to `compatible_surface`
    /// when one is given.
    pub fn new(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface>,
    ) -> Result<Self, DeviceInitializationError> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface,
        }))
        .ok_or(DeviceInitializationError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        info!(
            "using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                features: wgpu::Features::empty(),
                limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
            },
            None,
        ))?;

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// A device with no presentation surface, for off-screen rendering.
    pub fn headless() -> Result<Self, DeviceInitializationError> {
        let instance = wgpu::Instance::new(wgpu::Backends::all());
        Self::new(&instance, None)
    }
}
