//! Simple ray tracer example.
//!
//! Builds a small scene graph in code and saves it as a PNG.

use sgrt_core::{Camera, GroupNode, LeafNode, Light, Material, Scene, Texture, TextureResult, TextureStore};
use sgrt_renderer::{render, save_png, Mat4, RenderConfig, Vec3};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let scene = build_scene()?;
    println!(
        "Scene '{}': {} nodes, {} leaves, {} lights",
        scene.name,
        scene.root.node_count(),
        scene.root.leaf_count(),
        scene.root.light_count()
    );

    let config = RenderConfig::default().with_resolution(640, 480).with_fovy(60.0);

    let start = std::time::Instant::now();
    let image = render(&scene, &config)?;
    println!("Rendered {}x{} in {:?}", image.width, image.height, start.elapsed());

    let filename = "output.png";
    save_png(&image, filename)?;
    println!("Saved to {}", filename);
    Ok(())
}

fn build_scene() -> TextureResult<Scene> {
    let mut textures = TextureStore::new();
    textures.insert("stripes", stripes(8)?);

    let table = GroupNode::new("table")
        .with_transform(Mat4::from_translation(Vec3::new(0.0, -1.25, 0.0)) * Mat4::from_scale(Vec3::new(6.0, 0.5, 4.0)))
        .with_child(LeafNode::new("top", "box").with_material(Material::solid(Vec3::new(0.55, 0.4, 0.25))));

    let ball = GroupNode::new("ball_xform")
        .with_transform(Mat4::from_translation(Vec3::new(-1.2, 0.0, 0.0)))
        .with_child(
            LeafNode::new("ball", "sphere")
                .with_material(Material::solid(Vec3::new(0.9, 0.2, 0.2)).with_specular(Vec3::ONE, 48.0))
                .with_texture("stripes"),
        );

    let crate_node = GroupNode::new("crate_xform")
        .with_transform(
            Mat4::from_translation(Vec3::new(1.3, -0.25, 0.3))
                * Mat4::from_rotation_y(35f32.to_radians())
                * Mat4::from_scale(Vec3::splat(1.5)),
        )
        .with_child(LeafNode::new("crate", "box").with_material(Material::solid(Vec3::new(0.3, 0.5, 0.9))));

    let root = GroupNode::new("root")
        .with_light(Light::directional(Vec3::new(-0.4, -1.0, -0.6)))
        .with_light(
            Light::point(Vec3::new(3.0, 4.0, 4.0)).with_colors(Vec3::ZERO, Vec3::splat(0.5), Vec3::splat(0.8)),
        )
        .with_child(table)
        .with_child(ball)
        .with_child(crate_node);

    Ok(Scene::new("simple", root)
        .with_camera(Camera::look_at(Vec3::new(0.0, 1.5, 7.0), Vec3::new(0.0, -0.3, 0.0), Vec3::Y))
        .with_textures(textures))
}

/// Vertical black and white stripes.
fn stripes(count: u32) -> TextureResult<Texture> {
    let width = count * 2;
    let pixels = (0..width)
        .map(|x| if (x / 2) % 2 == 0 { [1.0; 4] } else { [0.3, 0.3, 0.3, 1.0] })
        .collect();
    Texture::new(width, 1, pixels, "<stripes>")
}
