pub mod math {
    /// Three component `f32` vector used for points, directions and colors.
    pub type Vector3 = glam::Vec3;

    pub fn degree_to_radian(degree: f32) -> f32 {
        degree * std::f32::consts::PI / 180.0
    }

    /// Linear blend, `a` at `t = 0` and `b` at `t = 1`.
    pub fn mix(a: f32, b: f32, t: f32) -> f32 {
        b * t + a * (1.0 - t)
    }

    /// Unit vector in the direction of `v`.
    ///
    /// A zero length vector is returned unchanged instead of dividing by zero.
    pub fn normalize(v: Vector3) -> Vector3 {
        v.try_normalize().unwrap_or(v)
    }

    /// Mirror `direction` about `normal`.
    pub fn reflect(direction: Vector3, normal: Vector3) -> Vector3 {
        normalize(direction - normal * 2.0 * direction.dot(normal))
    }

    /// Bend `direction` through a surface with relative index `eta`.
    ///
    /// `normal` must face against `direction`. Returns `None` on total internal
    /// reflection, when the radicand under the square root goes negative.
    pub fn refract(direction: Vector3, normal: Vector3, eta: f32) -> Option<Vector3> {
        let cos_i = direction.dot(normal);
        let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
        if k < 0.0 {
            return None;
        }
        Some(normalize(direction * eta - normal * (eta * cos_i + k.sqrt())))
    }

}
