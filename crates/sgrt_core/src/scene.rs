//! Scene graph types.
//!
//! A scene is a tree of [`Node`]s. Group nodes carry a local transform,
//! children and lights; leaf nodes name a unit primitive together with the
//! material and texture it is drawn with. The tree is built once and is
//! read-only while it is being ray traced.

use sgrt_math::{Mat4, Vec3, Vec4};

use crate::texture::{TextureStore, DEFAULT_TEXTURE};

/// Phong material: ambient/diffuse/specular reflectance and a shininess exponent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    /// Light grey, no highlight.
    pub const DEFAULT: Material = Material {
        ambient: Vec3::new(0.2, 0.2, 0.2),
        diffuse: Vec3::new(0.8, 0.8, 0.8),
        specular: Vec3::ZERO,
        shininess: 1.0,
    };

    pub fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// A material whose ambient and diffuse terms share one colour.
    pub fn solid(color: Vec3) -> Self {
        Self {
            ambient: color,
            diffuse: color,
            ..Self::DEFAULT
        }
    }

    pub fn with_specular(mut self, specular: Vec3, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A light source.
///
/// `position.w == 0` makes the light directional: `position.xyz` is then the
/// direction the light travels. Otherwise it is a point light at `position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec4,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Axis of the spot cone (w = 0). Zero for an omnidirectional light.
    pub spot_direction: Vec4,
    /// Half-angle of the spot cone in degrees. 180 disables the cone.
    pub spot_cutoff: f32,
}

impl Light {
    /// Light travelling along `direction`.
    pub fn directional(direction: Vec3) -> Self {
        Self {
            position: direction.extend(0.0),
            ..Self::default()
        }
    }

    /// Light emitted from `position` in all directions.
    pub fn point(position: Vec3) -> Self {
        Self {
            position: position.extend(1.0),
            ..Self::default()
        }
    }

    pub fn with_colors(mut self, ambient: Vec3, diffuse: Vec3, specular: Vec3) -> Self {
        self.ambient = ambient;
        self.diffuse = diffuse;
        self.specular = specular;
        self
    }

    pub fn with_spot(mut self, direction: Vec3, cutoff_degrees: f32) -> Self {
        self.spot_direction = direction.extend(0.0);
        self.spot_cutoff = cutoff_degrees;
        self
    }

    pub fn is_directional(&self) -> bool {
        self.position.w == 0.0
    }

    /// True if the cone test applies to this light.
    pub fn is_spot(&self) -> bool {
        self.spot_cutoff < 180.0 && self.spot_direction.truncate().length_squared() > 0.0
    }

    /// The same light expressed through `m`.
    pub fn transformed(&self, m: &Mat4) -> Light {
        Light {
            position: *m * self.position,
            spot_direction: m.transform_vector3(self.spot_direction.truncate()).extend(0.0),
            ..*self
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec4::new(0.0, 0.0, -1.0, 0.0),
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.8),
            spot_direction: Vec4::ZERO,
            spot_cutoff: 180.0,
        }
    }
}

/// Shape drawn by a leaf node.
///
/// The sphere has radius 1 and the box spans [-0.5, 0.5] on every axis,
/// both centred at the origin of the leaf's space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    Sphere,
    Box,
    /// A name with no geometry behind it. Never intersected.
    Unknown(String),
}

impl Primitive {
    pub fn from_name(name: &str) -> Self {
        match name {
            "sphere" => Primitive::Sphere,
            "box" => Primitive::Box,
            other => Primitive::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Primitive::Sphere => "sphere",
            Primitive::Box => "box",
            Primitive::Unknown(name) => name,
        }
    }
}

impl From<&str> for Primitive {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// A renderable primitive instance.
#[derive(Clone, Debug)]
pub struct LeafNode {
    pub name: String,
    pub primitive: Primitive,
    pub material: Material,
    pub texture: String,
}

impl LeafNode {
    pub fn new(name: impl Into<String>, primitive: impl Into<Primitive>) -> Self {
        Self {
            name: name.into(),
            primitive: primitive.into(),
            material: Material::DEFAULT,
            texture: DEFAULT_TEXTURE.to_string(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = texture.into();
        self
    }
}

/// An interior node: a local transform applied to all of its children.
#[derive(Clone, Debug)]
pub struct GroupNode {
    pub name: String,
    pub transform: Mat4,
    pub children: Vec<Node>,
    /// Lights positioned in this node's space (after `transform`).
    pub lights: Vec<Light>,
}

impl GroupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            children: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn add_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }
}

/// A scene graph node.
#[derive(Clone, Debug)]
pub enum Node {
    Group(GroupNode),
    Leaf(LeafNode),
}

impl From<GroupNode> for Node {
    fn from(group: GroupNode) -> Self {
        Node::Group(group)
    }
}

impl From<LeafNode> for Node {
    fn from(leaf: LeafNode) -> Self {
        Node::Leaf(leaf)
    }
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Group(group) => &group.name,
            Node::Leaf(leaf) => &leaf.name,
        }
    }

    /// Transform this node applies on top of its parent's. Identity for leaves.
    pub fn local_transform(&self) -> Mat4 {
        match self {
            Node::Group(group) => group.transform,
            Node::Leaf(_) => Mat4::IDENTITY,
        }
    }

    /// Depth-first search by name. The first match in child order wins.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name() == name {
            return Some(self);
        }
        match self {
            Node::Group(group) => group.children.iter().find_map(|child| child.find(name)),
            Node::Leaf(_) => None,
        }
    }

    /// Mutable variant of [`Node::find`], e.g. to animate a group's transform.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name() == name {
            return Some(self);
        }
        match self {
            Node::Group(group) => group
                .children
                .iter_mut()
                .find_map(|child| child.find_mut(name)),
            Node::Leaf(_) => None,
        }
    }

    /// Total number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        match self {
            Node::Group(group) => 1 + group.children.iter().map(Node::node_count).sum::<usize>(),
            Node::Leaf(_) => 1,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Group(group) => group.children.iter().map(Node::leaf_count).sum(),
            Node::Leaf(_) => 1,
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Node::Group(group) => 1 + group.children.iter().map(Node::depth).max().unwrap_or(0),
            Node::Leaf(_) => 1,
        }
    }

    pub fn light_count(&self) -> usize {
        match self {
            Node::Group(group) => {
                group.lights.len() + group.children.iter().map(Node::light_count).sum::<usize>()
            }
            Node::Leaf(_) => 0,
        }
    }

    /// Collect every light in the subtree, expressed in the space `modelview`
    /// maps this node's parent into (view space when called on the root).
    ///
    /// Children's lights come first, then the node's own.
    pub fn lights_in_view(&self, modelview: Mat4) -> Vec<Light> {
        let mut lights = Vec::new();
        self.collect_lights(modelview, &mut lights);
        lights
    }

    fn collect_lights(&self, parent: Mat4, out: &mut Vec<Light>) {
        if let Node::Group(group) = self {
            let modelview = parent * group.transform;
            for child in &group.children {
                child.collect_lights(modelview, out);
            }
            out.extend(group.lights.iter().map(|light| light.transformed(&modelview)));
        }
    }
}

/// Viewer placement. Produces the matrix that takes world space to view space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    /// True if the camera defines a view: finite vectors, a non-zero viewing
    /// direction, and an `up` that is not parallel to it.
    pub fn is_valid(&self) -> bool {
        let forward = self.target - self.eye;
        self.eye.is_finite()
            && self.target.is_finite()
            && self.up.is_finite()
            && forward.length_squared() > 0.0
            && self.up.cross(forward).length_squared() > 0.0
    }

    /// Right-handed view matrix; the camera looks down -Z in view space.
    ///
    /// Only meaningful for a camera that [`is_valid`](Self::is_valid).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

/// Image settings a scene file may suggest. Each is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderHints {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fovy: Option<f32>,
}

/// Everything needed to ray trace one image: the node tree, the camera,
/// and the textures the leaves refer to.
#[derive(Debug)]
pub struct Scene {
    pub name: String,
    pub root: Node,
    pub camera: Camera,
    pub textures: TextureStore,
    pub hints: RenderHints,
}

impl Scene {
    pub fn new(name: impl Into<String>, root: impl Into<Node>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            camera: Camera::default(),
            textures: TextureStore::new(),
            hints: RenderHints::default(),
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_textures(mut self, textures: TextureStore) -> Self {
        self.textures = textures;
        self
    }

    /// The modelview the traversal starts from.
    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// All lights, in view space.
    pub fn lights_in_view(&self) -> Vec<Light> {
        self.root.lights_in_view(self.view_matrix())
    }
}
