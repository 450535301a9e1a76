use wgpu::util::DeviceExt;

use crate::sampler::ColorBuffer;

/// One image pixel drawn as a colored point.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl PointVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Place every pixel center in clip space, `(0, 0)` at the top left.
pub fn point_vertices(buffer: &ColorBuffer) -> Vec<PointVertex> {
    let width = buffer.width() as f32;
    let height = buffer.height() as f32;
    let mut vertices = Vec::with_capacity(buffer.pixels().len());

    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let ndc_x = 2.0 * (x as f32 + 0.5) / width - 1.0;
            let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height;
            vertices.push(PointVertex {
                position: [ndc_x, ndc_y, 0.0],
                color: buffer.clamped(x, y).to_array(),
            });
        }
    }

    vertices
}

pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

impl VertexBuffer {
    pub fn init_immediate<'label>(
        device: &wgpu::Device,
        vertices: &[PointVertex],
        label: Option<&'label str>,
    ) -> Self {
        let init_descriptor = wgpu::util::BufferInitDescriptor {
            label,
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        };
        let buffer = device.create_buffer_init(&init_descriptor);
        Self {
            buffer,
            count: vertices.len() as u32,
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
