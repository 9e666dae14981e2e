//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run -p sgrt_core --example inspect_scene -- scenes/two_shapes.json

use std::env;

use sgrt_core::{load_scene, Node};

fn print_node(node: &Node, indent: usize) {
    let pad = "  ".repeat(indent);
    match node {
        Node::Group(group) => {
            let origin = group.transform.transform_point3(sgrt_math::Vec3::ZERO);
            println!(
                "{}{} (group, origin ({:.2}, {:.2}, {:.2}), {} lights)",
                pad,
                group.name,
                origin.x,
                origin.y,
                origin.z,
                group.lights.len()
            );
            for child in &group.children {
                print_node(child, indent + 1);
            }
        }
        Node::Leaf(leaf) => {
            println!(
                "{}{} ({}, texture '{}')",
                pad,
                leaf.name,
                leaf.primitive.name(),
                leaf.texture
            );
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene-json>");
        println!("\nExample:");
        println!("  cargo run -p sgrt_core --example inspect_scene -- scenes/two_shapes.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Nodes: {}", scene.root.node_count());
            println!("Leaves: {}", scene.root.leaf_count());
            println!("Depth: {}", scene.root.depth());
            println!("Lights: {}", scene.root.light_count());
            println!("Textures: {}", scene.textures.len());
            println!("Camera: {:?}", scene.camera);

            println!("\n--- Tree ---");
            print_node(&scene.root, 0);
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
