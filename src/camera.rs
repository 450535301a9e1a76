use crate::util::math::{self, Vector3};

/// Transient ray, `direction` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vector3 {
        self.origin + self.direction * t
    }
}

/// Pinhole camera at the world origin looking down `-z`, `+y` up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Field of view in degrees, spanning the image height.
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: Self::DEFAULT_FOV,
        }
    }
}

impl Camera {
    pub const DEFAULT_FOV: f32 = 40.0;
    pub const ORIGIN: Vector3 = Vector3::ZERO;

    pub fn new(fov: f32) -> Self {
        Self { fov }
    }

    pub fn projection(&self, width: u32, height: u32) -> Projection {
        Projection {
            inv_width: 1.0 / width as f32,
            inv_height: 1.0 / height as f32,
            angle: (math::degree_to_radian(self.fov) * 0.5).tan(),
            aspect_ratio: width as f32 / height as f32,
        }
    }

    /// Ray through the center of pixel `(x, y)`, `(0, 0)` being the top left.
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        self.projection(width, height).ray(x, y)
    }
}

/// Per image constants of the pixel to ray mapping.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    inv_width: f32,
    inv_height: f32,
    angle: f32,
    aspect_ratio: f32,
}

impl Projection {
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        let xx = (2.0 * ((x as f32 + 0.5) * self.inv_width) - 1.0) * self.angle * self.aspect_ratio;
        let yy = (1.0 - 2.0 * ((y as f32 + 0.5) * self.inv_height)) * self.angle;
        Ray::new(Camera::ORIGIN, math::normalize(Vector3::new(xx, yy, -1.0)))
    }
}
