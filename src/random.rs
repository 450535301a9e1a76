//! Seeded random scenes: a large mirror floor with small glassy spheres
//! scattered in a row above it.
//!
//! The same seed always yields the same spheres, so a generated scene can be
//! reproduced from its seed alone or reloaded from the YAML it was logged to.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config::{SceneConfig, SphereConfig};
use crate::util::math::Vector3;

/// Number of random spheres when none is requested.
pub const DEFAULT_COUNT: usize = 15;

const BALL_DEPTH: f32 = -20.0;
const BALL_TRANSPARENCY: f32 = 0.9;

/// Fresh seed from system entropy.
pub fn random_seed() -> u64 {
    rand::rng().random()
}

/// Floor sphere followed by `count` random spheres drawn from `seed`.
pub fn random_scene(count: usize, seed: u64) -> SceneConfig {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut spheres = Vec::with_capacity(count + 1);
    spheres.push(floor());
    spheres.extend((0..count).map(|_| random_sphere(&mut rng)));

    SceneConfig { spheres }
}

fn floor() -> SphereConfig {
    SphereConfig {
        center: Vector3::new(0.0, -10004.0, -20.0),
        radius: 10001.0,
        surface_color: Vector3::ONE,
        reflection: 1.0,
        transparency: 0.0,
        emission_color: Vector3::ZERO,
    }
}

fn random_sphere<R: Rng>(rng: &mut R) -> SphereConfig {
    let center = Vector3::new(
        rng.random_range(-10.0..10.0),
        rng.random_range(-2.0..2.0),
        BALL_DEPTH,
    );
    let radius = rng.random_range(0.3..1.2);
    let surface_color = Vector3::new(
        rng.random_range(0.5..0.9),
        rng.random_range(0.5..0.9),
        rng.random_range(0.5..0.9),
    );
    let reflection = rng.random_range(0.2..0.5);

    SphereConfig {
        center,
        radius,
        surface_color,
        reflection,
        transparency: BALL_TRANSPARENCY,
        emission_color: Vector3::ZERO,
    }
}
