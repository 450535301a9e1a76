//! Preview window drawing a rendered [`ColorBuffer`] as one point per pixel.

use wgpu::{
    include_wgsl, CommandEncoderDescriptor, PipelineLayoutDescriptor, RenderPassColorAttachment,
    RenderPassDescriptor, RenderPipelineDescriptor, TextureViewDescriptor,
};
use winit::{dpi::PhysicalSize, event::Event};

use crate::application::{AppState, Application, Layer, Screen, ViewerError};
use crate::config::WindowConfig;
use crate::renderer::{point_vertices, PointVertex, VertexBuffer};
use crate::sampler::ColorBuffer;

/// Everything the viewer needs, handed over once the window exists.
pub struct ViewerInit {
    pub vertices: Vec<PointVertex>,
    pub clear_color: wgpu::Color,
}

impl ViewerInit {
    pub fn new(buffer: &ColorBuffer, window: &WindowConfig) -> Self {
        let [r, g, b] = window.clear_color;
        Self {
            vertices: point_vertices(buffer),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        }
    }
}

pub struct PointViewer {
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: VertexBuffer,
    clear_color: wgpu::Color,
}

impl Layer for PointViewer {
    type Init = ViewerInit;
    type LayerErr = ();

    fn start(screen: &mut Screen, _app: &AppState, init: ViewerInit) -> Self {
        let shader = screen
            .device
            .create_shader_module(include_wgsl!("asset/shader/points.wgsl"));

        let vertex_buffer =
            VertexBuffer::init_immediate(&screen.device, &init.vertices, Some("Point Buffer"));

        let render_pipeline_layout =
            screen
                .device
                .create_pipeline_layout(&PipelineLayoutDescriptor {
                    label: Some("Point Pipeline Layout"),
                    bind_group_layouts: &[],
                    push_constant_ranges: &[],
                });

        let render_pipeline = screen
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some("Point Pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[PointVertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: screen.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::PointList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            });

        tracing::info!(points = vertex_buffer.count(), "viewer ready");

        Self {
            render_pipeline,
            vertex_buffer,
            clear_color: init.clear_color,
        }
    }

    fn process_event(&mut self, _event: &Event<()>, _screen: &mut Screen) {}

    fn resize(&mut self, new_size: PhysicalSize<u32>, _app: &AppState, _screen: &mut Screen) {
        tracing::debug!(width = new_size.width, height = new_size.height, "resized");
    }

    fn update(&mut self, _app: &AppState, _screen: &mut Screen) {}

    fn render(&mut self, _app: &AppState, screen: &mut Screen) -> Result<(), wgpu::SurfaceError> {
        let output = screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&TextureViewDescriptor::default());
        let mut encoder = screen
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));
            render_pass.draw(0..self.vertex_buffer.count(), 0..1);
        }

        screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn shutdown(&mut self, app: &AppState, _screen: &mut Screen) -> Result<(), Self::LayerErr> {
        tracing::info!(
            frames = app.frames(),
            seconds = app.elapsed_secs(),
            "exiting"
        );
        Ok(())
    }
}

/// Show `buffer` in a window sized to the image until it is closed.
pub fn show(buffer: &ColorBuffer, window: &WindowConfig) -> Result<(), ViewerError> {
    let size = PhysicalSize::new(buffer.width(), buffer.height());
    let init = ViewerInit::new(buffer, window);
    pollster::block_on(Application::<PointViewer>::init(&window.title, size, init))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::math::Vector3;

    #[test]
    fn test_viewer_init_from_buffer() {
        let mut buffer = ColorBuffer::new(3, 2);
        buffer.set(0, 0, Vector3::splat(2.0));
        let window = WindowConfig {
            clear_color: [0.1, 0.2, 0.3],
            ..WindowConfig::default()
        };

        let init = ViewerInit::new(&buffer, &window);
        assert_eq!(init.vertices.len(), 6);
        assert_eq!(init.vertices[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(init.clear_color.b, 0.3);
        assert_eq!(init.clear_color.a, 1.0);
    }
}
