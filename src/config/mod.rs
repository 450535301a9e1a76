mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::camera::Camera;
use crate::random;
use crate::sampler::ImageSampler;
use crate::scene::{Scene, Sphere};
use crate::tracer::{self, Tracer};
use crate::util::math::Vector3;

pub use loader::load_config;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub tracer: TracerConfig,
    #[serde(default)]
    pub window: WindowConfig,
    /// PNG file written after rendering
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Spheres to render; the built-in demo scene when absent
    #[serde(default)]
    pub scene: Option<SceneConfig>,
    /// Generate the scene from a seed, replacing `scene`
    #[serde(default)]
    pub random: Option<RandomSceneConfig>,
}

/// Output image size and camera
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_fov() -> f32 {
    Camera::DEFAULT_FOV
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fov: default_fov(),
        }
    }
}

/// Deepest `max_depth` accepted. Each level can double the rays per pixel.
pub const MAX_DEPTH_LIMIT: u32 = 16;

/// Shading constants
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TracerConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default = "default_bias")]
    pub bias: f32,
    #[serde(default = "default_ior")]
    pub ior: f32,
    #[serde(default = "default_background")]
    pub background: Vector3,
}

fn default_max_depth() -> u32 {
    tracer::MAX_DEPTH
}

fn default_bias() -> f32 {
    tracer::BIAS
}

fn default_ior() -> f32 {
    tracer::IOR
}

fn default_background() -> Vector3 {
    tracer::BACKGROUND
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            bias: default_bias(),
            ior: default_ior(),
            background: default_background(),
        }
    }
}

/// Preview window settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_enabled")]
    pub enabled: bool,
    #[serde(default = "default_title")]
    pub title: String,
    /// Clear color behind the drawn points
    #[serde(default)]
    pub clear_color: [f64; 3],
}

fn default_window_enabled() -> bool {
    true
}

fn default_title() -> String {
    "sphere_tracer".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            enabled: default_window_enabled(),
            title: default_title(),
            clear_color: [0.0; 3],
        }
    }
}

/// Seeded random scene settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RandomSceneConfig {
    #[serde(default = "default_random_count")]
    pub count: usize,
    /// Fresh seed from system entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Write the resolved configuration, generated spheres included, here
    #[serde(default)]
    pub log: Option<PathBuf>,
}

fn default_random_count() -> usize {
    random::DEFAULT_COUNT
}

impl Default for RandomSceneConfig {
    fn default() -> Self {
        Self {
            count: default_random_count(),
            seed: None,
            log: None,
        }
    }
}

/// Ordered sphere list
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub spheres: Vec<SphereConfig>,
}

/// One sphere as written in a scene file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SphereConfig {
    pub center: Vector3,
    pub radius: f32,
    pub surface_color: Vector3,
    #[serde(default)]
    pub reflection: f32,
    #[serde(default)]
    pub transparency: f32,
    #[serde(default)]
    pub emission_color: Vector3,
}

impl From<&SphereConfig> for Sphere {
    fn from(config: &SphereConfig) -> Self {
        Sphere::new(
            config.center,
            config.radius,
            config.surface_color,
            config.reflection,
            config.transparency,
        )
        .with_emission(config.emission_color)
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load the given file, or fall back to the defaults when no path is set
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["scene.yaml", "scene.yml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                Ok(Self::default())
            }
        }
    }

    /// Write this configuration as YAML.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the `random` section by the spheres it generates.
    ///
    /// The chosen seed is logged, and the resolved configuration is written to
    /// `random.log` when set so the run can be repeated with `--config`.
    pub fn resolve_random_scene(&mut self) -> Result<(), ConfigError> {
        let Some(settings) = self.random.take() else {
            return Ok(());
        };
        if self.scene.is_some() {
            tracing::warn!("random scene replaces the configured spheres");
        }

        let seed = settings.seed.unwrap_or_else(random::random_seed);
        tracing::info!(count = settings.count, seed, "generating random scene");
        self.scene = Some(random::random_scene(settings.count, seed));

        if let Some(path) = &settings.log {
            self.save(path)?;
            tracing::info!("scene written to {}", path.display());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image.width == 0 || self.image.height == 0 {
            return Err(ConfigError::Validation(format!(
                "image size must be non-zero, got {}x{}",
                self.image.width, self.image.height
            )));
        }
        if !(self.image.fov > 0.0 && self.image.fov < 180.0) {
            return Err(ConfigError::Validation(format!(
                "fov must be between 0 and 180 degrees, got {}",
                self.image.fov
            )));
        }
        if self.tracer.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Validation(format!(
                "max_depth must be at most {MAX_DEPTH_LIMIT}, got {}",
                self.tracer.max_depth
            )));
        }
        if !(self.tracer.bias >= 0.0 && self.tracer.bias.is_finite()) {
            return Err(ConfigError::Validation(format!(
                "bias must be a finite non-negative number, got {}",
                self.tracer.bias
            )));
        }
        if !(self.tracer.ior > 0.0) {
            return Err(ConfigError::Validation(format!(
                "ior must be positive, got {}",
                self.tracer.ior
            )));
        }
        if let Some(scene) = &self.scene {
            for (index, sphere) in scene.spheres.iter().enumerate() {
                sphere
                    .validate()
                    .map_err(|reason| ConfigError::Validation(format!("sphere {index}: {reason}")))?;
            }
        }
        Ok(())
    }

    pub fn build_scene(&self) -> Scene {
        match &self.scene {
            Some(scene) => scene.spheres.iter().map(Sphere::from).collect(),
            None => Scene::demo(),
        }
    }

    pub fn build_tracer(&self) -> Tracer {
        Tracer {
            max_depth: self.tracer.max_depth,
            bias: self.tracer.bias,
            ior: self.tracer.ior,
            background: self.tracer.background,
        }
    }

    pub fn build_sampler(&self) -> ImageSampler {
        ImageSampler::new(
            self.image.width,
            self.image.height,
            Camera::new(self.image.fov),
        )
    }
}

impl SphereConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.radius > 0.0) {
            return Err(format!("radius must be positive, got {}", self.radius));
        }
        for (name, value) in [
            ("reflection", self.reflection),
            ("transparency", self.transparency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
