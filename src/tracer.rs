//! Recursive Whitted-style shading over a [`Scene`] of spheres.

use crate::scene::{Scene, Sphere};
use crate::util::math::{mix, normalize, reflect, refract, Vector3};

/// Deepest recursion level at which secondary rays are still spawned.
pub const MAX_DEPTH: u32 = 5;

/// Offset applied to secondary ray origins along the surface normal.
pub const BIAS: f32 = 1e-4;

/// Index of refraction shared by every transparent sphere.
pub const IOR: f32 = 1.2;

/// Color returned for rays that escape the scene.
pub const BACKGROUND: Vector3 = Vector3::ONE;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer {
    pub max_depth: u32,
    pub bias: f32,
    pub ior: f32,
    pub background: Vector3,
}

impl Default for Tracer {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            bias: BIAS,
            ior: IOR,
            background: BACKGROUND,
        }
    }
}

/// Trace with the default tracer settings.
pub fn trace(origin: Vector3, direction: Vector3, scene: &Scene, depth: u32) -> Vector3 {
    Tracer::default().trace(origin, direction, scene, depth)
}

impl Tracer {
    /// Color observed along the ray `origin + t * direction`.
    ///
    /// `direction` must be unit length; `depth` is 0 for primary rays. Every
    /// secondary ray is traced at `depth + 1`, and once `depth` reaches
    /// `max_depth` specular surfaces are shaded as diffuse ones, so the
    /// recursion always ends.
    pub fn trace(&self, origin: Vector3, direction: Vector3, scene: &Scene, depth: u32) -> Vector3 {
        let Some(hit) = scene.nearest_hit(origin, direction) else {
            return self.background;
        };

        let sphere = hit.sphere;
        let point = origin + direction * hit.distance;
        let mut normal = normalize(point - sphere.center);
        if direction.dot(normal) > 0.0 {
            normal = -normal;
        }

        if sphere.is_specular() && depth < self.max_depth {
            self.shade_specular(sphere, point, normal, direction, scene, depth)
        } else {
            self.shade_diffuse(sphere, point, normal, scene)
        }
    }

    fn shade_specular(
        &self,
        sphere: &Sphere,
        point: Vector3,
        normal: Vector3,
        direction: Vector3,
        scene: &Scene,
        depth: u32,
    ) -> Vector3 {
        let facing = (-direction.dot(normal)).max(0.0);
        let fresnel = mix((1.0 - facing).powi(3), 1.0, 0.1);

        let reflected = reflect(direction, normal);
        let reflection = self.trace(point + normal * self.bias, reflected, scene, depth + 1);

        let refraction = if sphere.transparency > 0.0 {
            // k < 0 means total internal reflection, which contributes nothing
            match refract(direction, normal, 1.0 / self.ior) {
                Some(refracted) => {
                    self.trace(point - normal * self.bias, refracted, scene, depth + 1)
                }
                None => Vector3::ZERO,
            }
        } else {
            Vector3::ZERO
        };

        (reflection * fresnel + refraction * (1.0 - fresnel) * sphere.transparency)
            * sphere.surface_color
    }

    /// Direct light from every emissive sphere, dimmed by whatever lies between.
    ///
    /// `shadow` is carried across lights and each occluder folds the current
    /// value into the light's transmission, so occluders of earlier lights
    /// also darken later ones.
    fn shade_diffuse(
        &self,
        sphere: &Sphere,
        point: Vector3,
        normal: Vector3,
        scene: &Scene,
    ) -> Vector3 {
        let mut color = Vector3::ZERO;
        let mut shadow = 1.0_f32;
        let shadow_origin = point + normal * self.bias;

        for (light_index, light) in scene.lights() {
            let mut transmission = 1.0_f32;
            let to_light = normalize(light.center - point);

            for (index, occluder) in scene.spheres().iter().enumerate() {
                if index == light_index {
                    continue;
                }
                if occluder.intersect(shadow_origin, to_light).is_some() {
                    shadow = (shadow - (1.0 - occluder.transparency)).max(0.0);
                    transmission *= shadow;
                }
            }

            color += sphere.surface_color * transmission * light.emission_color;
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: Vector3, b: Vector3) -> bool {
        (a - b).abs().max_element() < EPS
    }

    fn diffuse(center: Vector3, radius: f32, color: Vector3) -> Sphere {
        Sphere::new(center, radius, color, 0.0, 0.0)
    }

    fn light(center: Vector3, emission: Vector3) -> Sphere {
        Sphere::new(center, 1.0, Vector3::ZERO, 0.0, 0.0).with_emission(emission)
    }

    // A unit sphere straight ahead, hit at (0, 0, -4) with normal +z.
    fn target(color: Vector3) -> Sphere {
        diffuse(Vector3::new(0.0, 0.0, -5.0), 1.0, color)
    }

    #[test]
    fn test_miss_returns_background() {
        let mut scene = Scene::new();
        scene.push(target(Vector3::ONE));
        let color = trace(Vector3::ZERO, Vector3::Y, &scene, 0);
        assert_eq!(color, BACKGROUND);
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let scene = Scene::new();
        for direction in [Vector3::NEG_Z, Vector3::X, normalize(Vector3::new(1.0, 1.0, -1.0))] {
            assert_eq!(trace(Vector3::ZERO, direction, &scene, 0), Vector3::ONE);
        }
    }

    #[test]
    fn test_unlit_diffuse_is_black() {
        let mut scene = Scene::new();
        scene.push(target(Vector3::new(0.8, 0.4, 0.2)));
        assert_eq!(trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0), Vector3::ZERO);
    }

    #[test]
    fn test_lit_diffuse() {
        let mut scene = Scene::new();
        scene.push(target(Vector3::splat(0.5)));
        scene.push(light(Vector3::new(0.0, 10.0, 0.0), Vector3::new(1.0, 0.5, 0.25)));

        let color = trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0);
        assert!(approx(color, Vector3::new(0.5, 0.25, 0.125)));
    }

    #[test]
    fn test_opaque_occluder_blocks_light() {
        let mut scene = Scene::new();
        scene.push(target(Vector3::splat(0.5)));
        scene.push(light(Vector3::new(0.0, 10.0, 0.0), Vector3::ONE));
        scene.push(diffuse(Vector3::new(0.0, 5.0, -2.0), 1.0, Vector3::ONE));

        let color = trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0);
        assert!(approx(color, Vector3::ZERO));
    }

    #[test]
    fn test_transparent_occluder_dims_light() {
        let mut scene = Scene::new();
        scene.push(target(Vector3::splat(0.5)));
        scene.push(light(Vector3::new(0.0, 10.0, 0.0), Vector3::ONE));
        scene.push(Sphere::new(Vector3::new(0.0, 5.0, -2.0), 1.0, Vector3::ONE, 0.0, 0.75));

        let color = trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0);
        assert!(approx(color, Vector3::splat(0.375)));
    }

    #[test]
    fn test_shadow_carries_across_lights() {
        let mut scene = Scene::new();
        scene.push(target(Vector3::splat(0.5)));
        scene.push(light(Vector3::new(0.0, 10.0, 0.0), Vector3::X));
        scene.push(light(Vector3::new(10.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 0.0)));
        scene.push(Sphere::new(Vector3::new(0.0, 5.0, -2.0), 1.0, Vector3::ONE, 0.0, 0.75));
        scene.push(Sphere::new(Vector3::new(5.0, 0.0, -2.0), 1.0, Vector3::ONE, 0.0, 0.75));

        // First light: shadow 1.0 -> 0.75. Second light starts from 0.75 and
        // drops to 0.5 instead of its own 0.75.
        let color = trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0);
        let expected = Vector3::splat(0.5) * Vector3::X * 0.75
            + Vector3::splat(0.5) * Vector3::new(1.0, 1.0, 0.0) * 0.5;
        assert!(approx(color, expected));
    }

    #[test]
    fn test_mirror_reflects_background() {
        let surface = Vector3::new(0.9, 0.5, 0.1);
        let mut scene = Scene::new();
        scene.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, surface, 1.0, 0.0));

        // Head-on: fresnel bottoms out at 0.1 and the bounce escapes.
        let color = trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0);
        assert!(approx(color, surface * 0.1));
    }

    #[test]
    fn test_depth_limit_falls_back_to_diffuse() {
        let mut scene = Scene::new();
        scene.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, Vector3::ONE, 1.0, 0.0));

        let tracer = Tracer::default();
        let color = tracer.trace(Vector3::ZERO, Vector3::NEG_Z, &scene, MAX_DEPTH);
        assert_eq!(color, Vector3::ZERO);

        let shallow = Tracer {
            max_depth: 0,
            ..Tracer::default()
        };
        assert_eq!(shallow.trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0), Vector3::ZERO);
    }

    #[test]
    fn test_color_stabilizes_once_depth_suffices() {
        let mut scene = Scene::new();
        scene.push(Sphere::new(
            Vector3::new(0.0, 0.0, -5.0),
            1.0,
            Vector3::new(0.7, 0.7, 0.9),
            1.0,
            0.0,
        ));
        scene.push(Sphere::new(
            Vector3::new(0.0, 0.0, 5.0),
            1.0,
            Vector3::new(0.4, 0.9, 0.4),
            0.0,
            0.0,
        ));
        scene.push(light(Vector3::new(0.0, 10.0, 0.0), Vector3::ONE));

        let colors: Vec<Vector3> = (1..12)
            .map(|max_depth| {
                Tracer {
                    max_depth,
                    ..Tracer::default()
                }
                .trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0)
            })
            .collect();

        for color in &colors {
            assert_eq!(*color, colors[0]);
        }
    }

    #[test]
    fn test_glass_stays_finite() {
        let mut scene = Scene::new();
        scene.push(Sphere::new(
            Vector3::new(0.0, 0.0, -6.0),
            2.0,
            Vector3::new(0.9, 0.9, 0.9),
            1.0,
            0.9,
        ));
        scene.push(light(Vector3::new(0.0, 10.0, -6.0), Vector3::splat(2.0)));

        let dense = Tracer {
            ior: 0.5,
            ..Tracer::default()
        };
        for x in [-0.3_f32, -0.1, 0.0, 0.15, 0.3] {
            let direction = normalize(Vector3::new(x, 0.05, -1.0));
            assert!(trace(Vector3::ZERO, direction, &scene, 0).is_finite());
            assert!(dense.trace(Vector3::ZERO, direction, &scene, 0).is_finite());
        }
    }

    #[test]
    fn test_refraction_through_glass() {
        let surface = Vector3::new(0.8, 0.6, 0.4);
        let mut scene = Scene::new();
        scene.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, surface, 0.0, 0.5));
        scene.push(light(Vector3::new(0.0, 10.0, 0.0), Vector3::ONE));

        let tracer = Tracer {
            max_depth: 1,
            ..Tracer::default()
        };
        let color = tracer.trace(Vector3::ZERO, Vector3::NEG_Z, &scene, 0);

        // The refracted ray starts just inside the front face and lands on the
        // back face at (0, 0, -6), shaded diffuse at depth 1. Its shadow ray
        // leaves from inside the glass, which dims the light by half.
        let refraction = surface * 0.5;
        // Head-on, fresnel is 0.1 and the reflected ray escapes to the sky.
        let expected = (BACKGROUND * 0.1 + refraction * 0.9 * 0.5) * surface;
        assert!(approx(color, expected), "{color} != {expected}");
    }

    #[test]
    fn test_total_internal_reflection_drops_refraction() {
        let surface = Vector3::new(0.8, 0.6, 0.4);
        let mut scene = Scene::new();
        scene.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, surface, 0.0, 1.0));

        // Hits at (0.6, 0, -4.2) where the normal is (0.6, 0, 0.8). With
        // eta = 2 the radicand is 1 - 4 * 0.36 < 0.
        let origin = Vector3::new(0.6, 0.0, 0.0);
        let normal = Vector3::new(0.6, 0.0, 0.8);
        assert!(refract(Vector3::NEG_Z, normal, 2.0).is_none());

        let dense = Tracer {
            ior: 0.5,
            ..Tracer::default()
        };
        let color = dense.trace(origin, Vector3::NEG_Z, &scene, 0);

        let fresnel = mix(0.2_f32.powi(3), 1.0, 0.1);
        assert!(approx(color, BACKGROUND * fresnel * surface), "{color}");
    }

    #[test]
    fn test_trace_is_deterministic() {
        let scene = Scene::demo();
        let direction = normalize(Vector3::new(0.1, -0.05, -1.0));
        let first = trace(Vector3::ZERO, direction, &scene, 0);
        for _ in 0..4 {
            assert_eq!(trace(Vector3::ZERO, direction, &scene, 0).to_array(), first.to_array());
        }
    }
}
