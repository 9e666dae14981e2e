// Transform utilities for Mat4
//
// Extends glam::Mat4 with the conversions the ray tracer needs between
// node-local and view space.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Matrix that carries surface normals through this transform
    /// (the inverse-transpose).
    fn normal_matrix(&self) -> Mat4;

    /// Transform an object-space normal into the space this matrix maps to.
    /// The result is re-normalized and has w=0.
    fn transform_normal(&self, normal: Vec3) -> Vec4;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat4 {
        self.inverse().transpose()
    }

    fn transform_normal(&self, normal: Vec3) -> Vec4 {
        self.normal_matrix()
            .transform_vector3(normal)
            .normalize_or_zero()
            .extend(0.0)
    }
}

/// Map a point from one axis-aligned rectangle onto another.
///
/// `min_to`/`max_to` may be swapped per axis to mirror the mapping.
pub fn window_transform(p: Vec2, min_from: Vec2, max_from: Vec2, min_to: Vec2, max_to: Vec2) -> Vec2 {
    (p - min_from) * (max_to - min_to) / (max_from - min_from) + min_to
}
