//! Texture loading and lookup by name.
//!
//! Leaves refer to textures by name; the [`TextureStore`] resolves those
//! names to decoded images. The store always holds a 1x1 white texture
//! under [`DEFAULT_TEXTURE`], which is also what unknown names sample as.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sgrt_math::{Interval, Vec3};
use thiserror::Error;

/// Name of the always-present neutral texture.
pub const DEFAULT_TEXTURE: &str = "white";

/// Errors that can occur during texture loading and lookup.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("No such texture: {0}")]
    NotFound(String),

    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {path} is {width}x{height} but has {actual} pixels")]
    Size {
        path: String,
        width: u32,
        height: u32,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded texture.
///
/// Pixels are stored row-major from the top row, as RGBA floats in 0..1.
/// Values are taken from the image as-is, without colour-space conversion.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 4]>,
    /// Source file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    ///
    /// `pixels` must hold exactly `width * height` entries.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> TextureResult<Self> {
        let path = path.into();
        if pixels.len() as u64 != width as u64 * height as u64 {
            return Err(TextureError::Size {
                path,
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![[color.x, color.y, color.z, 1.0]],
            path: "<solid>".into(),
        }
    }

    /// Decode an image file.
    pub fn load(path: &Path) -> TextureResult<Self> {
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_rgba8(&img.to_rgba8(), path.to_string_lossy()))
    }

    /// Convert an 8-bit RGBA image.
    pub fn from_rgba8(img: &image::RgbaImage, path: impl Into<String>) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| {
                [
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                    p[3] as f32 / 255.0,
                ]
            })
            .collect();
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    ///
    /// Coordinates are clamped to [0, 1]; (0, 0) is the top-left pixel.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        if self.width == 0 || self.height == 0 {
            return Vec3::ONE;
        }

        let x = Interval::UNIT.clamp(u) * (self.width - 1) as f32;
        let y = Interval::UNIT.clamp(v) * (self.height - 1) as f32;

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
        top.lerp(bottom, fy)
    }

    /// RGB at integer coordinates.
    fn texel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .unwrap_or(Vec3::ZERO)
    }
}

/// Named textures.
#[derive(Debug)]
pub struct TextureStore {
    textures: HashMap<String, Texture>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureStore {
    /// Create a store holding only the default white texture.
    pub fn new() -> Self {
        let mut textures = HashMap::new();
        textures.insert(DEFAULT_TEXTURE.to_string(), Texture::solid_color(Vec3::ONE));
        Self {
            textures,
            base_dir: None,
        }
    }

    /// Create a store with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Self::new()
        }
    }

    /// Register an already decoded texture, replacing any of the same name.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) {
        self.textures.insert(name.into(), texture);
    }

    /// Decode the image at `path` and register it as `name`.
    pub fn load(&mut self, name: &str, path: impl AsRef<Path>) -> TextureResult<()> {
        let full_path = self.resolve_path(path.as_ref());
        let texture = Texture::load(&full_path)?;

        log::debug!(
            "Loaded texture '{}' from {} ({}x{})",
            name,
            full_path.display(),
            texture.width,
            texture.height
        );

        self.insert(name, texture);
        Ok(())
    }

    /// Look up a texture, failing for unknown names.
    pub fn get(&self, name: &str) -> TextureResult<&Texture> {
        self.textures
            .get(name)
            .ok_or_else(|| TextureError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// Sample the named texture. Unknown names sample as white.
    pub fn sample(&self, name: &str, u: f32, v: f32) -> Vec3 {
        match self.textures.get(name) {
            Some(texture) => texture.sample(u, v),
            None => {
                log::trace!("Texture '{}' not found, using {}", name, DEFAULT_TEXTURE);
                Vec3::ONE
            }
        }
    }

    /// Number of textures, including the default one.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: black, white / white, black
        Texture::new(
            2,
            2,
            vec![
                [0.0, 0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0, 1.0],
                [1.0, 1.0, 1.0, 1.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            "<checker>",
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);

        let sample = tex.sample(0.5, 0.5);
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_sample_corners_and_centre() {
        let tex = checker();
        assert_eq!(tex.sample(0.0, 0.0), Vec3::ZERO);
        assert_eq!(tex.sample(1.0, 0.0), Vec3::ONE);
        assert_eq!(tex.sample(0.0, 1.0), Vec3::ONE);
        assert_eq!(tex.sample(1.0, 1.0), Vec3::ZERO);
        assert!((tex.sample(0.5, 0.5) - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = checker();
        assert_eq!(tex.sample(-3.0, -0.1), tex.sample(0.0, 0.0));
        assert_eq!(tex.sample(1.5, 7.0), tex.sample(1.0, 1.0));
    }

    #[test]
    fn test_from_rgba8() {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 51, 255]));
        let tex = Texture::from_rgba8(&img, "mem");
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(tex.pixels.len(), 6);
        assert!((tex.sample(0.3, 0.9) - Vec3::new(1.0, 0.0, 0.2)).length() < 1e-6);
    }

    #[test]
    fn test_store_has_white() {
        let store = TextureStore::new();
        assert_eq!(store.len(), 1);
        assert!(store.contains(DEFAULT_TEXTURE));
        assert_eq!(store.sample(DEFAULT_TEXTURE, 0.2, 0.8), Vec3::ONE);
    }

    #[test]
    fn test_store_unknown_name() {
        let store = TextureStore::new();
        assert_eq!(store.sample("nope", 0.5, 0.5), Vec3::ONE);
        assert!(matches!(store.get("nope"), Err(TextureError::NotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_store_insert_and_get() {
        let mut store = TextureStore::new();
        store.insert("checker", checker());
        assert!(store.get("checker").is_ok());
        assert_eq!(store.sample("checker", 1.0, 0.0), Vec3::ONE);
    }

    #[test]
    fn test_store_load_missing_file() {
        let mut store = TextureStore::with_base_dir("/definitely/not/here");
        let err = store.load("brick", "brick.png").unwrap_err();
        match err {
            TextureError::Load { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here/brick.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!store.contains("brick"));
    }

    #[test]
    fn test_pixel_count_must_match_size() {
        let short = Texture::new(2, 2, vec![[1.0; 4]; 3], "<short>");
        match short {
            Err(TextureError::Size { width, height, actual, .. }) => assert_eq!((width, height, actual), (2, 2, 3)),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(Texture::new(1, 1, vec![[1.0; 4]; 2], "<long>").is_err());
        assert!(Texture::new(0, 4, vec![[1.0; 4]], "<flat>").is_err());

        let empty = Texture::new(0, 0, Vec::new(), "<empty>").unwrap();
        assert_eq!(empty.sample(0.5, 0.5), Vec3::ONE);
    }
}
