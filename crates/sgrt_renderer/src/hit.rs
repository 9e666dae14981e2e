//! HitRecord: the nearest known intersection of a ray with the scene.

use sgrt_core::{Material, DEFAULT_TEXTURE};
use sgrt_math::{Vec2, Vec4};

/// Material reported by a record that has not hit anything.
static DEFAULT_MATERIAL: Material = Material::DEFAULT;

/// Record of a ray-primitive intersection.
///
/// `time` is `f32::INFINITY` until something is hit, so a default record
/// means "no hit" and any real hit is closer than it.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit
    pub time: f32,
    /// Hit location (w = 1) in the space the ray was cast in
    pub point: Vec4,
    /// Unit surface normal (w = 0) in the same space as `point`
    pub normal: Vec4,
    /// Material of the leaf that was hit
    pub material: &'a Material,
    /// Texture of the leaf that was hit
    pub texture_name: &'a str,
    /// Texture coordinates at the hit point
    pub tex_coord: Vec2,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            time: f32::INFINITY,
            point: Vec4::new(0.0, 0.0, 0.0, 1.0),
            normal: Vec4::new(0.0, 0.0, 1.0, 0.0),
            material: &DEFAULT_MATERIAL,
            texture_name: DEFAULT_TEXTURE,
            tex_coord: Vec2::ZERO,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// True once a primitive has been hit.
    pub fn intersected(&self) -> bool {
        self.time < f32::INFINITY
    }

    /// Replace this record with `candidate` if the candidate is strictly nearer.
    ///
    /// Returns whether the record changed.
    pub fn update(&mut self, candidate: HitRecord<'a>) -> bool {
        if candidate.time < self.time {
            *self = candidate;
            true
        } else {
            false
        }
    }
}

/// The nearer of two optional hits. On a tie the first one is kept.
pub fn nearer<'a>(best: Option<HitRecord<'a>>, candidate: Option<HitRecord<'a>>) -> Option<HitRecord<'a>> {
    match (best, candidate) {
        (Some(mut best), Some(candidate)) => {
            best.update(candidate);
            Some(best)
        }
        (best, None) => best,
        (None, candidate) => candidate,
    }
}
