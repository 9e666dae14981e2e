//! Whole-pipeline renders: scene in, pixels out.

use std::sync::atomic::AtomicBool;

use sgrt_core::{parse_scene, Camera, GroupNode, LeafNode, Light, Material, Scene, Texture, TextureStore};
use sgrt_renderer::{render, render_serial, render_with_cancel, ImageBuffer, Mat4, RenderConfig, RenderError, Vec3};

const BLACK: [u8; 3] = [0, 0, 0];

/// One unit sphere two units in front of the camera, lit head-on.
fn single_sphere() -> Scene {
    let root = GroupNode::new("root")
        .with_light(Light::directional(Vec3::NEG_Z))
        .with_child(LeafNode::new("ball", "sphere").with_material(Material::DEFAULT));

    Scene::new("single", root).with_camera(Camera::look_at(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y))
}

fn busy_scene() -> Scene {
    let mut textures = TextureStore::new();
    textures.insert(
        "checker",
        Texture::new(
            2,
            2,
            vec![
                [1.0, 0.2, 0.2, 1.0],
                [0.2, 1.0, 0.2, 1.0],
                [0.2, 0.2, 1.0, 1.0],
                [1.0, 1.0, 0.2, 1.0],
            ],
            "<checker>",
        )
        .unwrap(),
    );

    let root = GroupNode::new("root")
        .with_light(Light::directional(Vec3::new(-1.0, -1.0, -1.0)))
        .with_light(Light::point(Vec3::new(2.0, 3.0, 1.0)).with_colors(Vec3::ZERO, Vec3::splat(0.4), Vec3::ONE))
        .with_child(
            GroupNode::new("left")
                .with_transform(Mat4::from_translation(Vec3::new(-1.2, 0.0, 0.0)))
                .with_child(
                    LeafNode::new("ball", "sphere")
                        .with_material(Material::solid(Vec3::new(0.9, 0.3, 0.1)).with_specular(Vec3::ONE, 32.0))
                        .with_texture("checker"),
                ),
        )
        .with_child(
            GroupNode::new("right")
                .with_transform(
                    Mat4::from_translation(Vec3::new(1.2, 0.0, 0.0))
                        * Mat4::from_rotation_y(0.6)
                        * Mat4::from_rotation_x(0.4)
                        * Mat4::from_scale(Vec3::splat(1.5)),
                )
                .with_child(LeafNode::new("crate", "box").with_texture("checker")),
        )
        .with_child(LeafNode::new("pot", "teapot"));

    Scene::new("busy", root)
        .with_camera(Camera::look_at(Vec3::new(0.0, 1.0, 6.0), Vec3::ZERO, Vec3::Y))
        .with_textures(textures)
}

fn count_lit(image: &ImageBuffer) -> usize {
    image.pixels.iter().filter(|&&p| p != BLACK).count()
}

#[test]
fn test_sphere_centre_lit_corners_black() {
    let scene = single_sphere();
    let config = RenderConfig::default().with_resolution(4, 4).with_fovy(90.0);

    let image = render(&scene, &config).unwrap();
    assert_eq!((image.width, image.height), (4, 4));

    for (x, y) in [(0, 0), (3, 0), (0, 3), (3, 3)] {
        assert_eq!(image.get(x, y), BLACK, "corner ({x}, {y})");
    }

    // Pixel (2, 2) lands on row 1; ambient 0.04 + diffuse 0.64
    assert_eq!(image.get(2, 1), [173, 173, 173]);
    assert_ne!(image.get(1, 1), BLACK);
    assert_ne!(image.get(2, 2), BLACK);
}

#[test]
fn test_serial_matches_parallel() {
    let scene = busy_scene();
    let base = RenderConfig::default().with_resolution(37, 29).with_fovy(60.0);

    let serial = render_serial(&scene, &base).unwrap();
    assert!(count_lit(&serial) > 0);

    for (bucket_size, threads) in [(64, 0), (5, 2), (1, 3), (8, 1)] {
        let config = base.clone().with_bucket_size(bucket_size).with_threads(threads);
        let parallel = render(&scene, &config).unwrap();
        assert_eq!(parallel, serial, "bucket {bucket_size}, threads {threads}");
    }
}

#[test]
fn test_camera_move_changes_image() {
    let mut scene = single_sphere();
    let config = RenderConfig::default().with_resolution(16, 16).with_fovy(90.0);
    let near = count_lit(&render(&scene, &config).unwrap());

    scene.camera = Camera::look_at(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, Vec3::Y);
    let far = count_lit(&render(&scene, &config).unwrap());

    assert!(far > 0);
    assert!(far < near, "far {far}, near {near}");
}

#[test]
fn test_scene_without_lights_is_black() {
    let scene = Scene::new("dark", LeafNode::new("ball", "sphere"))
        .with_camera(Camera::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y));
    let config = RenderConfig::default().with_resolution(8, 8).with_fovy(90.0);

    assert_eq!(count_lit(&render(&scene, &config).unwrap()), 0);
}

#[test]
fn test_moving_a_node_by_name() {
    let mut scene = busy_scene();
    let config = RenderConfig::default().with_resolution(24, 16).with_fovy(60.0);
    let before = render(&scene, &config).unwrap();

    if let Some(sgrt_core::Node::Group(group)) = scene.root.find_mut("left") {
        group.transform = Mat4::from_translation(Vec3::new(0.0, 0.0, -50.0));
    }
    let after = render(&scene, &config).unwrap();

    assert_ne!(before, after);
    assert!(count_lit(&after) < count_lit(&before));
}

#[test]
fn test_cancelled_render_returns_no_image() {
    let scene = busy_scene();
    let config = RenderConfig::default().with_resolution(32, 32).with_bucket_size(8).with_threads(2);

    let cancel = AtomicBool::new(true);
    let result = render_with_cancel(&scene, &config, &cancel);
    assert!(matches!(result, Err(RenderError::Cancelled)));

    let cancel = AtomicBool::new(false);
    assert!(render_with_cancel(&scene, &config, &cancel).is_ok());
}

#[test]
fn test_render_from_scene_file() {
    let json = r#"{
        "camera": { "eye": [0, 0, 4], "target": [0, 0, 0], "up": [0, 1, 0] },
        "render": { "width": 12, "height": 10, "fovy": 70 },
        "root": {
            "type": "group", "name": "root",
            "lights": [ { "position": [0, 0, -1, 0] } ],
            "children": [
                { "type": "group", "name": "spin",
                  "transform": [ { "rotate": { "axis": [1, 1, 0], "degrees": 35 } } ],
                  "children": [ { "type": "leaf", "name": "crate", "instance": "box",
                                  "material": { "diffuse": [0, 0, 1] } } ] }
            ]
        }
    }"#;
    let scene = parse_scene(json, None).unwrap();
    let config = RenderConfig::default().with_hints(&scene.hints);
    assert_eq!((config.width, config.height, config.fovy_degrees), (12, 10, 70.0));

    let image = render(&scene, &config).unwrap();
    assert_eq!(image.pixels.len(), 120);
    assert!(count_lit(&image) > 0);

    // Blue diffuse under a white light: no red or green beyond the ambient term
    for p in image.pixels.iter().filter(|&&p| p != BLACK) {
        assert!(p[2] > p[0], "{p:?}");
    }
}

#[test]
fn test_render_shipped_scene() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenes/two_shapes.json");
    let scene = sgrt_core::load_scene(&path).unwrap();
    assert!(scene.textures.contains("checker"));
    assert_eq!(scene.root.leaf_count(), 3);

    let config = RenderConfig::default().with_hints(&scene.hints).with_resolution(64, 48);
    let image = render(&scene, &config).unwrap();
    assert!(count_lit(&image) > 64 * 48 / 8);
}

#[test]
fn test_tiny_sphere_still_renders() {
    // Radius 2e-5, a millimetre in front of the eye, straight down the view axis
    let root = GroupNode::new("root").with_light(Light::default()).with_child(
        GroupNode::new("speck")
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -1e-3)) * Mat4::from_scale(Vec3::splat(2e-5)))
            .with_child(LeafNode::new("dust", "sphere")),
    );
    let scene = Scene::new("tiny", root);
    let config = RenderConfig::default().with_resolution(8, 8).with_fovy(90.0);

    let image = render(&scene, &config).unwrap();
    // Pixel (4, 4) lands on row 3
    assert_ne!(image.get(4, 3), BLACK);
    assert_eq!(image.get(0, 0), BLACK);
}

#[test]
fn test_scene_file_with_stuck_camera_is_rejected() {
    let json = r#"{
        "camera": { "eye": [1, 2, 3], "target": [1, 2, 3] },
        "root": { "type": "leaf", "name": "ball", "instance": "sphere" }
    }"#;
    assert!(matches!(parse_scene(json, None), Err(sgrt_core::SceneError::InvalidCamera { .. })));
}
