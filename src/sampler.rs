use std::time::Instant;

use crate::camera::Camera;
use crate::scene::Scene;
use crate::tracer::Tracer;
use crate::util::math::Vector3;

/// Row-major image of linear colors, `(0, 0)` is the top left pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Vector3>,
}

impl ColorBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vector3::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Vector3] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Vector3 {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Vector3) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Pixel color capped at 1.0 per channel, ready for display.
    ///
    /// Channels are only limited from above; a 0..255 conversion saturates
    /// anything below zero.
    pub fn clamped(&self, x: u32, y: u32) -> Vector3 {
        self.get(x, y).min(Vector3::ONE)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Casts one primary ray per pixel and records what it sees.
#[derive(Debug, Clone, Copy)]
pub struct ImageSampler {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
}

impl ImageSampler {
    pub fn new(width: u32, height: u32, camera: Camera) -> Self {
        Self {
            width,
            height,
            camera,
        }
    }

    pub fn render(&self, scene: &Scene, tracer: &Tracer) -> ColorBuffer {
        tracing::info!(
            width = self.width,
            height = self.height,
            spheres = scene.len(),
            "rendering"
        );
        let start = Instant::now();

        let projection = self.camera.projection(self.width, self.height);
        let mut buffer = ColorBuffer::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let ray = projection.ray(x, y);
                buffer.set(x, y, tracer.trace(ray.origin, ray.direction, scene, 0));
            }
            tracing::trace!(row = y, "row done");
        }

        tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "render finished");
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Sphere;

    #[test]
    fn test_buffer_is_row_major() {
        let mut buffer = ColorBuffer::new(4, 2);
        buffer.set(3, 1, Vector3::X);
        assert_eq!(buffer.pixels()[7], Vector3::X);
        assert_eq!(buffer.get(3, 1), Vector3::X);
        assert_eq!(buffer.get(0, 0), Vector3::ZERO);
    }

    #[test]
    fn test_clamped_caps_at_one() {
        let mut buffer = ColorBuffer::new(1, 1);
        buffer.set(0, 0, Vector3::new(3.0, 0.5, -0.25));
        assert_eq!(buffer.clamped(0, 0), Vector3::new(1.0, 0.5, -0.25));
    }

    #[test]
    fn test_empty_scene_renders_background() {
        let sampler = ImageSampler::new(8, 6, Camera::default());
        let buffer = sampler.render(&Scene::new(), &Tracer::default());
        assert_eq!(buffer.pixels().len(), 48);
        assert!(buffer.pixels().iter().all(|c| *c == Vector3::ONE));
    }

    #[test]
    fn test_sphere_covers_image_center() {
        let mut scene = Scene::new();
        scene.push(Sphere::new(
            Vector3::new(0.0, 0.0, -10.0),
            2.0,
            Vector3::ONE,
            0.0,
            0.0,
        ));

        let buffer = ImageSampler::new(9, 9, Camera::default()).render(&scene, &Tracer::default());
        assert_eq!(buffer.get(4, 4), Vector3::ZERO);
        assert_eq!(buffer.get(0, 0), Vector3::ONE);
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = Scene::demo();
        let sampler = ImageSampler::new(16, 9, Camera::default());
        let first = sampler.render(&scene, &Tracer::default());
        let second = sampler.render(&scene, &Tracer::default());
        assert_eq!(first, second);
    }
}
