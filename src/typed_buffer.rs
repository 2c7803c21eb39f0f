/*!
Typed `wgpu` buffers.

A buffer created from `[A]` stays a buffer of `A`s: lengths are counted in
elements, and reads come back as `Vec<A>` with [`bytemuck`] doing the casting.
*/

use std::{marker::PhantomData, mem::size_of, sync::mpsc};

use wgpu::util::DeviceExt;

pub struct Buffer<A> {
    buffer: wgpu::Buffer,
    len: u64,
    phantom_data: PhantomData<A>,
}

impl<A: bytemuck::Pod> Buffer<A> {
    /// A buffer initialised with `contents`.
    pub fn with_contents(
        device: &wgpu::Device,
        label: &str,
        contents: &[A],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(contents),
            usage,
        });
        Self {
            buffer,
            len: contents.len() as u64,
            phantom_data: PhantomData,
        }
    }

    /// An uninitialised buffer with room for `len` elements.
    pub fn with_len(
        device: &wgpu::Device,
        label: &str,
        len: u64,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: len * size_of::<A>() as u64,
            usage,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            len,
            phantom_data: PhantomData,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of `A`s the buffer holds.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    /// Maps the buffer, blocks until the device has finished with it, and
    /// copies its contents out. The buffer needs `MAP_READ` usage.
    pub fn read(&self, device: &wgpu::Device) -> Result<Vec<A>, wgpu::BufferAsyncError> {
        let slice = self.slice();
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        receiver.recv().unwrap_or(Err(wgpu::BufferAsyncError))?;

        let contents = bytemuck::cast_slice(&*slice.get_mapped_range()).to_vec();
        self.buffer.unmap();
        Ok(contents)
    }
}

/// A uniform buffer holding exactly one `A`, rewritten before each pass.
pub struct Uniform<A> {
    buffer: wgpu::Buffer,
    phantom_data: PhantomData<A>,
}

impl<A: bytemuck::Pod> Uniform<A> {
    pub fn new(device: &wgpu::Device, label: &str, contents: A) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[contents]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            phantom_data: PhantomData,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, contents: A) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[contents]));
    }

    pub fn bind_group_entry(&self, binding: u32) -> wgpu::BindGroupEntry<'_> {
        wgpu::BindGroupEntry {
            binding,
            resource: self.buffer.as_entire_binding(),
        }
    }
}
