//! Analytic ray intersection with the unit primitives.
//!
//! Each test works in the primitive's object space: a unit sphere (radius 1)
//! or a unit box ([-0.5, 0.5] on every axis), both centred at the origin.
//! [`intersect_leaf`] carries the ray into that space and the result back out.

use std::f32::consts::PI;

use sgrt_core::{LeafNode, Primitive};
use sgrt_math::{window_transform, Interval, Mat4, Mat4Ext, Ray, Vec2, Vec3};

use crate::HitRecord;

/// Direction components smaller than this count as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-4;

/// Distance within which a box hit point is considered to lie on a face.
const FACE_EPSILON: f32 = 1e-3;

/// Extent of the unit box on each axis.
const BOX_SLAB: Interval = Interval::new(-0.5, 0.5);

/// An intersection in object space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter
    pub t: f32,
    /// Unit outward normal in object space
    pub normal: Vec3,
    /// Texture coordinates
    pub tex_coord: Vec2,
}

/// Intersect an object-space ray with a primitive.
///
/// Unknown primitives are never hit.
pub fn intersect_primitive(primitive: &Primitive, ray: &Ray) -> Option<SurfaceHit> {
    match primitive {
        Primitive::Sphere => intersect_sphere(ray),
        Primitive::Box => intersect_box(ray),
        Primitive::Unknown(_) => None,
    }
}

/// Intersect a ray with a leaf.
///
/// `ray` is in the caller's space (view space during rendering) and
/// `modelview` maps the leaf's object space into that space. The returned
/// point and normal are in the caller's space.
pub fn intersect_leaf<'a>(leaf: &'a LeafNode, ray: &Ray, modelview: &Mat4) -> Option<HitRecord<'a>> {
    if let Primitive::Unknown(kind) = &leaf.primitive {
        log::trace!("Skipping leaf '{}' with unknown primitive '{}'", leaf.name, kind);
        return None;
    }

    // A collapsed transform has no inverse and nothing visible to hit.
    let inverse = modelview.inverse();
    if !inverse.is_finite() {
        return None;
    }

    let object_ray = ray.transformed(&inverse);
    let surface = intersect_primitive(&leaf.primitive, &object_ray)?;

    Some(HitRecord {
        time: surface.t,
        point: ray.at(surface.t),
        normal: modelview.transform_normal(surface.normal),
        material: &leaf.material,
        texture_name: &leaf.texture,
        tex_coord: surface.tex_coord,
    })
}

/// Intersect with the unit sphere. Takes the nearest root that is not behind
/// the ray origin, so a ray starting inside hits the far side.
pub fn intersect_sphere(ray: &Ray) -> Option<SurfaceHit> {
    let origin = ray.origin();
    let direction = ray.direction();

    let a = direction.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * origin.dot(direction);
    let c = origin.length_squared() - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let near = (-b - sqrtd) / (2.0 * a);
    let far = (-b + sqrtd) / (2.0 * a);

    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };

    let normal = (origin + direction * t).normalize_or_zero();

    Some(SurfaceHit {
        t,
        normal,
        tex_coord: sphere_uv(normal),
    })
}

/// Longitude/latitude mapping of a point on the unit sphere.
///
/// `u` wraps around the Y axis with the seam behind the sphere (-Z side
/// facing away from +X); `v` runs from 0 at the south pole to 1 at the north.
pub fn sphere_uv(p: Vec3) -> Vec2 {
    let u = (PI + (-p.z).atan2(p.x)) / (2.0 * PI);
    let u = (u + 0.5).rem_euclid(1.0);
    let v = (PI / 2.0 + p.y.clamp(-1.0, 1.0).asin()) / PI;
    Vec2::new(u, v)
}

/// Intersect with the unit box using the slab method.
///
/// A ray starting inside the box hits it where it leaves.
pub fn intersect_box(ray: &Ray) -> Option<SurfaceHit> {
    let origin = ray.origin();
    let direction = ray.direction();

    let mut range = Interval::UNIVERSE;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < PARALLEL_EPSILON {
            // Parallel to this pair of slabs: must already be between them
            if !BOX_SLAB.contains(o) {
                return None;
            }
        } else {
            let slab = Interval::spanning((BOX_SLAB.min - o) / d, (BOX_SLAB.max - o) / d);
            range = range.intersect(&slab);
        }
    }

    if range.is_empty() || range.max <= 0.0 {
        return None;
    }

    let t = if range.min > 0.0 { range.min } else { range.max };
    if !t.is_finite() {
        return None;
    }

    let (normal, tex_coord) = box_face(origin + direction * t);

    Some(SurfaceHit {
        t,
        normal,
        tex_coord,
    })
}

/// One face of the unit box and where it sits in the texture atlas.
struct Face {
    axis: usize,
    sign: f32,
    atlas_min: Vec2,
    atlas_max: Vec2,
}

/// Faces in the order they are tested. Where a point lies on an edge, the
/// normal combines every face it touches and the last one sets the texture
/// coordinates.
static FACES: [Face; 6] = [
    // right
    Face { axis: 0, sign: 1.0, atlas_min: Vec2::new(0.5, 0.25), atlas_max: Vec2::new(0.75, 0.5) },
    // left
    Face { axis: 0, sign: -1.0, atlas_min: Vec2::new(0.25, 0.25), atlas_max: Vec2::new(0.0, 0.5) },
    // top
    Face { axis: 1, sign: 1.0, atlas_min: Vec2::new(0.25, 0.5), atlas_max: Vec2::new(0.5, 0.75) },
    // bottom
    Face { axis: 1, sign: -1.0, atlas_min: Vec2::new(0.25, 0.25), atlas_max: Vec2::new(0.5, 0.0) },
    // front
    Face { axis: 2, sign: 1.0, atlas_min: Vec2::new(1.0, 0.25), atlas_max: Vec2::new(0.75, 0.5) },
    // rear
    Face { axis: 2, sign: -1.0, atlas_min: Vec2::new(0.25, 0.25), atlas_max: Vec2::new(0.5, 0.5) },
];

impl Face {
    fn contains(&self, p: Vec3) -> bool {
        (p[self.axis] - self.sign * BOX_SLAB.max).abs() < FACE_EPSILON
    }

    /// Map the point's in-face coordinates into this face's atlas cell.
    fn atlas_coord(&self, p: Vec3) -> Vec2 {
        let local = match self.axis {
            0 => Vec2::new(p.z, p.y),
            1 => Vec2::new(p.x, p.z),
            _ => Vec2::new(p.x, p.y),
        };
        window_transform(
            local,
            Vec2::splat(BOX_SLAB.min),
            Vec2::splat(BOX_SLAB.max),
            self.atlas_min,
            self.atlas_max,
        )
    }
}

/// Outward normal and atlas coordinates of a point on the box surface.
fn box_face(p: Vec3) -> (Vec3, Vec2) {
    let mut normal = Vec3::ZERO;
    let mut tex_coord = None;

    for face in FACES.iter().filter(|face| face.contains(p)) {
        normal[face.axis] = face.sign;
        tex_coord = Some(face.atlas_coord(p));
    }

    match tex_coord {
        Some(tex_coord) => (normal.normalize(), tex_coord),
        None => {
            // Numerically off every face: use the one the point is closest to
            let axis = dominant_axis(p);
            let sign = if p[axis] < 0.0 { -1.0 } else { 1.0 };
            let face = FACES
                .iter()
                .find(|face| face.axis == axis && face.sign == sign)
                .unwrap_or(&FACES[0]);
            let mut normal = Vec3::ZERO;
            normal[axis] = sign;
            (normal, face.atlas_coord(p))
        }
    }
}

/// Index of the component with the largest magnitude.
fn dominant_axis(p: Vec3) -> usize {
    let a = p.abs();
    if a.x >= a.y && a.x >= a.z {
        0
    } else if a.y >= a.z {
        1
    } else {
        2
    }
}
