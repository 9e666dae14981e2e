//! Phong shading of resolved hits.
//!
//! Everything is evaluated in view space: the eye sits at the origin, and hit
//! points, normals and lights have all been carried through the modelview
//! before they get here.

use sgrt_core::{Light, Material, TextureStore};
use sgrt_math::Vec3;

use crate::HitRecord;

/// Linear RGB color.
pub type Color = Vec3;

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Unit vector from `point` towards the light.
fn light_vector(light: &Light, point: Vec3) -> Vec3 {
    if light.is_directional() {
        (-light.position.truncate()).normalize_or_zero()
    } else {
        (light.position.truncate() - point).normalize_or_zero()
    }
}

/// Whether `point` lies outside the cone of a spot light.
///
/// Lights with the default 180 degree cutoff never cull.
fn outside_cone(light: &Light, to_light: Vec3) -> bool {
    if !light.is_spot() {
        return false;
    }
    let axis = light.spot_direction.truncate().normalize();
    (-to_light).dot(axis) <= light.spot_cutoff.to_radians().cos()
}

fn phong(material: &Material, light: &Light, point: Vec3, normal: Vec3, view: Vec3) -> Color {
    let to_light = light_vector(light, point);
    if outside_cone(light, to_light) {
        return Color::ZERO;
    }

    let n_dot_l = normal.dot(to_light);
    let r_dot_v = reflect(-to_light, normal).dot(view).max(0.0);

    let ambient = material.ambient * light.ambient;
    let diffuse = material.diffuse * light.diffuse * n_dot_l.max(0.0);
    let specular = if n_dot_l > 0.0 {
        material.specular * light.specular * r_dot_v.powf(material.shininess)
    } else {
        Color::ZERO
    };

    ambient + diffuse + specular
}

/// Color of a hit lit by `lights`, modulated by the hit's texture.
///
/// A record that did not hit anything shades as black. The result is clamped
/// to [0, 1] per channel.
pub fn shade(hit: &HitRecord<'_>, lights: &[Light], textures: &TextureStore) -> Color {
    if !hit.intersected() {
        return Color::ZERO;
    }

    let point = hit.point.truncate();
    let normal = hit.normal.truncate();
    let view = (-point).normalize_or_zero();

    let lit = lights
        .iter()
        .fold(Color::ZERO, |acc, light| acc + phong(hit.material, light, point, normal, view));

    let texel = textures.sample(hit.texture_name, hit.tex_coord.x, 1.0 - hit.tex_coord.y);
    (lit * texel).clamp(Color::ZERO, Color::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sgrt_core::Texture;
    use sgrt_math::{Vec2, Vec4};

    const EPS: f32 = 1e-5;

    /// Hit on a surface facing the camera, one unit in front of it.
    fn facing_hit(material: &Material) -> HitRecord<'_> {
        HitRecord {
            time: 1.0,
            point: Vec4::new(0.0, 0.0, -1.0, 1.0),
            normal: Vec4::new(0.0, 0.0, 1.0, 0.0),
            material,
            texture_name: "white",
            tex_coord: Vec2::new(0.5, 0.5),
        }
    }

    fn approx(a: Color, b: Color) -> bool {
        (a - b).abs().max_element() < EPS
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert!(approx(r, Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn test_no_hit_is_black() {
        let lights = [Light::default()];
        let color = shade(&HitRecord::default(), &lights, &TextureStore::new());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_head_on_directional() {
        let material = Material::DEFAULT;
        let hit = facing_hit(&material);

        // ambient 0.2 * 0.2 + diffuse 0.8 * 0.8
        let color = shade(&hit, &[Light::default()], &TextureStore::new());
        assert!(approx(color, Color::splat(0.68)), "{color}");
    }

    #[test]
    fn test_light_behind_surface_leaves_ambient() {
        let material = Material::DEFAULT.with_specular(Vec3::ONE, 8.0);
        let hit = facing_hit(&material);
        let light = Light::directional(Vec3::Z);

        let color = shade(&hit, &[light], &TextureStore::new());
        assert!(approx(color, Color::splat(0.04)), "{color}");
    }

    #[test]
    fn test_point_light_grazing() {
        let material = Material::DEFAULT;
        let hit = facing_hit(&material);
        let light = Light::point(Vec3::new(3.0, 0.0, -1.0));

        let color = shade(&hit, &[light], &TextureStore::new());
        assert!(approx(color, Color::splat(0.04)), "{color}");
    }

    #[test]
    fn test_specular_highlight_and_clamp() {
        let material = Material::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE, 16.0);
        let hit = facing_hit(&material);
        let light = Light::default().with_colors(Vec3::ZERO, Vec3::ZERO, Vec3::splat(0.5));

        let color = shade(&hit, &[light], &TextureStore::new());
        assert!(approx(color, Color::splat(0.5)), "{color}");

        let bright = Light::default().with_colors(Vec3::ONE, Vec3::ONE, Vec3::ONE);
        let color = shade(&hit, &[bright, bright], &TextureStore::new());
        assert_eq!(color, Color::ONE);
    }

    #[test]
    fn test_lights_are_summed() {
        let material = Material::DEFAULT;
        let hit = facing_hit(&material);
        let dim = Light::default().with_colors(Vec3::ZERO, Vec3::splat(0.3), Vec3::ZERO);

        let one = shade(&hit, &[dim], &TextureStore::new());
        let two = shade(&hit, &[dim, dim], &TextureStore::new());
        assert!(approx(one, Color::splat(0.24)), "{one}");
        assert!(approx(two, Color::splat(0.48)), "{two}");
    }

    #[test]
    fn test_texture_lookup_flips_v() {
        // 1x2 texture: red on the top row, blue on the bottom row
        let mut textures = TextureStore::new();
        textures.insert(
            "stripes",
            Texture::new(1, 2, vec![[1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 1.0]], "<stripes>").unwrap(),
        );

        let material = Material::DEFAULT;
        let mut hit = facing_hit(&material);
        hit.texture_name = "stripes";

        hit.tex_coord = Vec2::new(0.5, 0.0);
        let bottom = shade(&hit, &[Light::default()], &textures);
        assert!(approx(bottom, Color::new(0.0, 0.0, 0.68)), "{bottom}");

        hit.tex_coord = Vec2::new(0.5, 1.0);
        let top = shade(&hit, &[Light::default()], &textures);
        assert!(approx(top, Color::new(0.68, 0.0, 0.0)), "{top}");
    }

    #[test]
    fn test_unknown_texture_is_white() {
        let material = Material::DEFAULT;
        let mut hit = facing_hit(&material);
        hit.texture_name = "missing";

        let color = shade(&hit, &[Light::default()], &TextureStore::new());
        assert!(approx(color, Color::splat(0.68)));
    }

    #[test]
    fn test_spot_cone() {
        let material = Material::DEFAULT;
        let spot = Light::point(Vec3::ZERO).with_spot(Vec3::NEG_Z, 10.0);

        let inside = facing_hit(&material);
        let color = shade(&inside, &[spot], &TextureStore::new());
        assert!(approx(color, Color::splat(0.68)), "{color}");

        let mut outside = facing_hit(&material);
        outside.point = Vec4::new(1.0, 0.0, -1.0, 1.0);
        let color = shade(&outside, &[spot], &TextureStore::new());
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_default_cutoff_does_not_cull() {
        let material = Material::DEFAULT;
        let mut hit = facing_hit(&material);
        hit.point = Vec4::new(1.0, 0.0, -1.0, 1.0);

        // Spot direction set, cutoff left at 180
        let light = Light::point(Vec3::ZERO).with_spot(Vec3::Z, 180.0);
        let color = shade(&hit, &[light], &TextureStore::new());
        assert!(color.max_element() > 0.0);
    }

    #[test]
    fn test_shading_is_repeatable() {
        let material = Material::DEFAULT.with_specular(Vec3::splat(0.7), 12.0);
        let mut hit = facing_hit(&material);
        hit.normal = Vec4::new(0.3, 0.4, 0.866, 0.0).normalize();
        let lights = [Light::default(), Light::point(Vec3::new(2.0, 1.0, 0.5))];
        let textures = TextureStore::new();

        let first = shade(&hit, &lights, &textures);
        let second = shade(&hit, &lights, &textures);
        assert_eq!(first.to_array(), second.to_array());
    }
}
