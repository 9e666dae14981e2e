//! SGRT Core - Scene graph, textures and scene files.
//!
//! This crate provides:
//!
//! - **Scene graph types**: `Node`, `GroupNode`, `LeafNode`, `Material`, `Light`, `Camera`
//! - **Textures**: `TextureStore`, a name-to-image table with a built-in white texture
//! - **Scene files**: JSON scene descriptions loaded into a `Scene`
//!
//! # Example
//!
//! ```ignore
//! use sgrt_core::load_scene;
//!
//! let scene = load_scene("scenes/two_shapes.json")?;
//! println!("Loaded {} leaves, {} lights",
//!     scene.root.leaf_count(),
//!     scene.root.light_count());
//! ```

pub mod description;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use description::{load_scene, parse_scene, SceneDescription, SceneError, SceneResult};
pub use scene::{Camera, GroupNode, LeafNode, Light, Material, Node, Primitive, RenderHints, Scene};
pub use texture::{Texture, TextureError, TextureResult, TextureStore, DEFAULT_TEXTURE};
