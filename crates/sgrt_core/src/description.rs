//! Scene description files.
//!
//! Scenes are written as JSON. The document names a camera, optional render
//! settings, a table of textures and the node tree:
//!
//! ```json
//! {
//!   "camera": { "eye": [0, 0, 5], "target": [0, 0, 0], "up": [0, 1, 0] },
//!   "render": { "width": 400, "height": 400, "fovy": 90 },
//!   "textures": { "checker": "textures/checker.png" },
//!   "root": {
//!     "type": "group", "name": "root",
//!     "transform": [ { "translate": [0, 0, -1] }, { "scale": [2, 2, 2] } ],
//!     "lights": [ { "position": [0, 0, -1, 0] } ],
//!     "children": [
//!       { "type": "leaf", "name": "ball", "instance": "sphere", "texture": "checker" }
//!     ]
//!   }
//! }
//! ```
//!
//! Transform lists compose left to right. Texture paths are relative to the
//! scene file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sgrt_math::{Mat4, Vec3, Vec4};
use thiserror::Error;

use crate::scene::{Camera, GroupNode, LeafNode, Light, Material, Node, Primitive, RenderHints, Scene};
use crate::texture::{TextureError, TextureStore, DEFAULT_TEXTURE};

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid camera: eye {eye:?}, target {target:?}, up {up:?}")]
    InvalidCamera {
        eye: [f32; 3],
        target: [f32; 3],
        up: [f32; 3],
    },

    #[error("Texture '{name}': {source}")]
    Texture {
        name: String,
        #[source]
        source: TextureError,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Top level of a scene file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDescription,
    #[serde(default)]
    pub render: RenderDescription,
    #[serde(default)]
    pub textures: BTreeMap<String, String>,
    pub root: NodeDescription,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraDescription {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraDescription {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            eye: camera.eye.to_array(),
            target: camera.target.to_array(),
            up: camera.up.to_array(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderDescription {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fovy: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDescription {
    Group {
        name: String,
        #[serde(default)]
        transform: Vec<TransformOp>,
        #[serde(default)]
        lights: Vec<LightDescription>,
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
    Leaf {
        name: String,
        instance: String,
        #[serde(default)]
        material: MaterialDescription,
        #[serde(default = "default_texture")]
        texture: String,
    },
}

fn default_texture() -> String {
    DEFAULT_TEXTURE.to_string()
}

/// One step of a group's local transform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformOp {
    Translate([f32; 3]),
    Rotate { axis: [f32; 3], degrees: f32 },
    Scale([f32; 3]),
}

impl TransformOp {
    pub fn matrix(&self) -> Mat4 {
        match self {
            TransformOp::Translate(t) => Mat4::from_translation(Vec3::from_array(*t)),
            TransformOp::Rotate { axis, degrees } => {
                let axis = Vec3::from_array(*axis).normalize_or_zero();
                if axis == Vec3::ZERO {
                    log::warn!("Ignoring rotation about a zero-length axis");
                    return Mat4::IDENTITY;
                }
                Mat4::from_axis_angle(axis, degrees.to_radians())
            }
            TransformOp::Scale(s) => Mat4::from_scale(Vec3::from_array(*s)),
        }
    }
}

/// Compose a transform list left to right.
pub fn compose(ops: &[TransformOp]) -> Mat4 {
    ops.iter().fold(Mat4::IDENTITY, |acc, op| acc * op.matrix())
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialDescription {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        let m = Material::DEFAULT;
        Self {
            ambient: m.ambient.to_array(),
            diffuse: m.diffuse.to_array(),
            specular: m.specular.to_array(),
            shininess: m.shininess,
        }
    }
}

impl From<&MaterialDescription> for Material {
    fn from(desc: &MaterialDescription) -> Self {
        Material::new(
            Vec3::from_array(desc.ambient),
            Vec3::from_array(desc.diffuse),
            Vec3::from_array(desc.specular),
            desc.shininess,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightDescription {
    /// w = 0 for a directional light
    pub position: [f32; 4],
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub spot_direction: [f32; 3],
    pub spot_cutoff: f32,
}

impl Default for LightDescription {
    fn default() -> Self {
        let l = Light::default();
        Self {
            position: l.position.to_array(),
            ambient: l.ambient.to_array(),
            diffuse: l.diffuse.to_array(),
            specular: l.specular.to_array(),
            spot_direction: l.spot_direction.truncate().to_array(),
            spot_cutoff: l.spot_cutoff,
        }
    }
}

impl From<&LightDescription> for Light {
    fn from(desc: &LightDescription) -> Self {
        Light {
            position: Vec4::from_array(desc.position),
            ambient: Vec3::from_array(desc.ambient),
            diffuse: Vec3::from_array(desc.diffuse),
            specular: Vec3::from_array(desc.specular),
            spot_direction: Vec3::from_array(desc.spot_direction).extend(0.0),
            spot_cutoff: desc.spot_cutoff,
        }
    }
}

impl NodeDescription {
    /// Build the scene graph node for this description.
    pub fn to_node(&self) -> Node {
        match self {
            NodeDescription::Group {
                name,
                transform,
                lights,
                children,
            } => {
                let mut group = GroupNode::new(name.clone()).with_transform(compose(transform));
                for light in lights {
                    group.add_light(light.into());
                }
                for child in children {
                    group.add_child(child.to_node());
                }
                group.into()
            }
            NodeDescription::Leaf {
                name,
                instance,
                material,
                texture,
            } => {
                let primitive = Primitive::from_name(instance);
                if let Primitive::Unknown(kind) = &primitive {
                    log::warn!("Leaf '{}' uses unknown instance '{}'; it will not be drawn", name, kind);
                }
                LeafNode::new(name.clone(), primitive)
                    .with_material(material.into())
                    .with_texture(texture.clone())
                    .into()
            }
        }
    }
}

impl SceneDescription {
    /// Parse a JSON scene description.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a scene, decoding textures relative to `base_dir`.
    pub fn into_scene(self, name: impl Into<String>, base_dir: Option<&Path>) -> SceneResult<Scene> {
        let camera = Camera::look_at(
            Vec3::from_array(self.camera.eye),
            Vec3::from_array(self.camera.target),
            Vec3::from_array(self.camera.up),
        );
        if !camera.is_valid() {
            return Err(SceneError::InvalidCamera {
                eye: self.camera.eye,
                target: self.camera.target,
                up: self.camera.up,
            });
        }

        let mut textures = match base_dir {
            Some(dir) => TextureStore::with_base_dir(dir),
            None => TextureStore::new(),
        };
        for (texture_name, path) in &self.textures {
            textures
                .load(texture_name, path)
                .map_err(|source| SceneError::Texture {
                    name: texture_name.clone(),
                    source,
                })?;
        }

        let root = self.root.to_node();
        warn_missing_textures(&root, &textures);

        let mut scene = Scene::new(name, root).with_camera(camera).with_textures(textures);
        scene.hints = RenderHints {
            width: self.render.width,
            height: self.render.height,
            fovy: self.render.fovy,
        };
        Ok(scene)
    }
}

fn warn_missing_textures(node: &Node, textures: &TextureStore) {
    match node {
        Node::Group(group) => {
            for child in &group.children {
                warn_missing_textures(child, textures);
            }
        }
        Node::Leaf(leaf) => {
            if !textures.contains(&leaf.texture) {
                log::warn!(
                    "Leaf '{}' uses undeclared texture '{}'; sampling as {}",
                    leaf.name,
                    leaf.texture,
                    DEFAULT_TEXTURE
                );
            }
        }
    }
}

/// Parse a scene from a JSON string. Texture paths resolve against `base_dir`.
pub fn parse_scene(json: &str, base_dir: Option<&Path>) -> SceneResult<Scene> {
    SceneDescription::from_json(json)?.into_scene("scene", base_dir)
}

/// Load a scene file.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();

    let scene = SceneDescription::from_json(&json)?.into_scene(name, path.parent())?;

    log::info!(
        "Loaded scene '{}': {} nodes, {} leaves, {} lights, {} textures",
        scene.name,
        scene.root.node_count(),
        scene.root.leaf_count(),
        scene.root.light_count(),
        scene.textures.len()
    );

    Ok(scene)
}
