use crate::{Mat4, Vec3, Vec4};

/// A ray in homogeneous coordinates.
///
/// `origin` is a point (w = 1) and `direction` a vector (w = 0), so the same
/// ray can be carried into any coordinate space with a single `Mat4`.
/// The direction is not normalized; hit times are measured in units of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec4,
    pub direction: Vec4,
}

impl Ray {
    /// Create a new ray from a 3D origin and direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin: origin.extend(1.0),
            direction: direction.extend(0.0),
        }
    }

    /// Get the origin point of the ray (without the homogeneous term).
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin.truncate()
    }

    /// Get the direction vector of the ray (without the homogeneous term).
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction.truncate()
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction, with w = 1
    pub fn at(&self, t: f32) -> Vec4 {
        (self.origin() + self.direction() * t).extend(1.0)
    }

    /// Express this ray in another coordinate space.
    ///
    /// Because `t` is preserved by affine maps, a hit found at `t` in the
    /// transformed ray lies at `self.at(t)` in the original space.
    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: *m * self.origin,
            direction: *m * self.direction,
        }
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}
