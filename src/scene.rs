use crate::util::math::Vector3;

#[derive(Debug, Default, Clone)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

/// Closest intersection found by [`Scene::nearest_hit`].
#[derive(Debug, Clone, Copy)]
pub struct Hit<'scene> {
    pub index: usize,
    pub sphere: &'scene Sphere,
    pub distance: f32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Spheres acting as light sources, with their scene index.
    pub fn lights(&self) -> impl Iterator<Item = (usize, &Sphere)> {
        self.spheres
            .iter()
            .enumerate()
            .filter(|(_, sphere)| sphere.is_light())
    }

    /// Linear scan for the closest sphere along the ray.
    ///
    /// When the origin is inside a sphere the exit distance is used. On equal
    /// distances the sphere that comes first in the scene wins.
    pub fn nearest_hit(&self, origin: Vector3, direction: Vector3) -> Option<Hit<'_>> {
        let mut nearest: Option<Hit<'_>> = None;

        for (index, sphere) in self.spheres.iter().enumerate() {
            if let Some((t0, t1)) = sphere.intersect(origin, direction) {
                let distance = if t0 < 0.0 { t1 } else { t0 };
                if nearest.map_or(true, |hit| distance < hit.distance) {
                    nearest = Some(Hit {
                        index,
                        sphere,
                        distance,
                    });
                }
            }
        }

        nearest
    }

    /// Fixed showcase scene: a mirror floor, a row of glass spheres and one
    /// light above and behind the camera target.
    pub fn demo() -> Self {
        let mut scene = Self::new();

        scene.push(Sphere::new(
            Vector3::new(0.0, -10004.0, -20.0),
            10000.0,
            Vector3::new(0.2, 0.2, 0.2),
            0.0,
            0.0,
        ));
        scene.push(Sphere::new(
            Vector3::new(0.0, 0.0, -20.0),
            4.0,
            Vector3::new(1.0, 0.32, 0.36),
            1.0,
            0.5,
        ));
        scene.push(Sphere::new(
            Vector3::new(5.0, -1.0, -15.0),
            2.0,
            Vector3::new(0.9, 0.76, 0.46),
            1.0,
            0.0,
        ));
        scene.push(Sphere::new(
            Vector3::new(5.0, 0.0, -25.0),
            3.0,
            Vector3::new(0.65, 0.77, 0.97),
            1.0,
            0.0,
        ));
        scene.push(Sphere::new(
            Vector3::new(-5.5, 0.0, -15.0),
            3.0,
            Vector3::new(0.9, 0.9, 0.9),
            1.0,
            0.0,
        ));
        scene.push(
            Sphere::new(Vector3::new(0.0, 20.0, -30.0), 3.0, Vector3::ZERO, 0.0, 0.0)
                .with_emission(Vector3::new(3.0, 3.0, 3.0)),
        );

        scene
    }
}

impl FromIterator<Sphere> for Scene {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        Self {
            spheres: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    radius: f32,
    radius2: f32,

    pub surface_color: Vector3,
    pub emission_color: Vector3,
    pub reflection: f32,
    pub transparency: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vector3::ZERO, 0.5, Vector3::ONE, 0.0, 0.0)
    }
}

impl Sphere {
    pub fn new(
        center: Vector3,
        radius: f32,
        surface_color: Vector3,
        reflection: f32,
        transparency: f32,
    ) -> Self {
        Self {
            center,
            radius,
            radius2: radius * radius,
            surface_color,
            emission_color: Vector3::ZERO,
            reflection,
            transparency,
        }
    }

    pub fn with_emission(mut self, emission_color: Vector3) -> Self {
        self.emission_color = emission_color;
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn radius2(&self) -> f32 {
        self.radius2
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.radius2 = radius * radius;
    }

    pub fn is_light(&self) -> bool {
        self.emission_color.x > 0.0
    }

    /// Reflective or refractive surfaces spawn secondary rays.
    pub fn is_specular(&self) -> bool {
        self.reflection > 0.0 || self.transparency > 0.0
    }

    /// Ray/sphere test in geometric form.
    ///
    /// `direction` must be unit length. Returns the signed entry and exit
    /// distances along the ray. A sphere whose center projects behind the
    /// origin is rejected outright, so an origin inside the sphere with the
    /// center behind it reports no hit.
    pub fn intersect(&self, origin: Vector3, direction: Vector3) -> Option<(f32, f32)> {
        let l = self.center - origin;
        let proj = l.dot(direction);
        if proj < 0.0 {
            return None;
        }

        let d2 = l.dot(l) - proj * proj;
        if d2 > self.radius2 {
            return None;
        }

        let half_chord = (self.radius2 - d2).sqrt();
        Some((proj - half_chord, proj + half_chord))
    }
}
