//! Recursive ray tracer for scenes of spheres with reflective, refractive and
//! emissive materials, plus a small wgpu preview window.

pub mod application;
pub mod camera;
pub mod config;
pub mod output;
pub mod random;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod tracer;
pub mod util;
pub mod viewer;

pub use camera::Camera;
pub use sampler::{ColorBuffer, ImageSampler};
pub use scene::{Scene, Sphere};
pub use tracer::{trace, Tracer};
pub use util::math::Vector3;
