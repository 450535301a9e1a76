use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use sphere_tracer_lib::{
    config::{AppConfig, RandomSceneConfig},
    output, viewer,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "sphere_tracer")]
#[command(version)]
#[command(about = "Recursive ray tracer for scenes of spheres")]
struct Cli {
    /// Scene and render settings (YAML); built-in demo scene when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Maximum reflection/refraction recursion depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Render this many random spheres above a mirror floor instead of the configured scene
    #[arg(long, value_name = "N")]
    random: Option<usize>,

    /// Seed for the random scene; implies --random
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Write the configuration with the generated spheres to this YAML file; implies --random
    #[arg(long, value_name = "PATH")]
    scene_log: Option<PathBuf>,

    /// Write the rendered image to this PNG file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not open the preview window
    #[arg(long)]
    headless: bool,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(width) = self.width {
            config.image.width = width;
        }
        if let Some(height) = self.height {
            config.image.height = height;
        }
        if let Some(fov) = self.fov {
            config.image.fov = fov;
        }
        if let Some(max_depth) = self.max_depth {
            config.tracer.max_depth = max_depth;
        }
        if self.random.is_some() || self.seed.is_some() || self.scene_log.is_some() {
            let random = config
                .random
                .get_or_insert_with(RandomSceneConfig::default);
            if let Some(count) = self.random {
                random.count = count;
            }
            if let Some(seed) = self.seed {
                random.seed = Some(seed);
            }
            if let Some(log) = &self.scene_log {
                random.log = Some(log.clone());
            }
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if self.headless {
            config.window.enabled = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .init();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    cli.apply(&mut config);
    config.resolve_random_scene()?;
    config.validate()?;

    let scene = config.build_scene();
    let tracer = config.build_tracer();
    let buffer = config.build_sampler().render(&scene, &tracer);

    if let Some(path) = &config.output {
        output::save_png(&buffer, path)?;
    }

    if config.window.enabled {
        viewer::show(&buffer, &config.window).context("opening preview window")?;
    } else if config.output.is_none() {
        tracing::warn!("headless run without --output, the image is discarded");
    }

    Ok(())
}
