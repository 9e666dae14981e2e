//! Raster assembly.
//!
//! One view-space ray per pixel through a pinhole at the origin, no
//! multi-sampling. Pixel (i, j) counts `j` upwards from the bottom of the
//! image, so it lands on row `height - 1 - j` of the output.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use sgrt_core::{Light, RenderHints, Scene};
use sgrt_math::{Mat4, Ray, Vec3};
use thiserror::Error;

use crate::bucket::{render_buckets, DEFAULT_BUCKET_SIZE};
use crate::raycast::cast_ray_from;
use crate::shading::{shade, Color};

/// Largest image [`RenderConfig::validate`] accepts, in pixels (16384 x 16384).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Errors that can occur while rendering.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Render cancelled")]
    Cancelled,

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
    /// Edge length of a render bucket in pixels
    pub bucket_size: u32,
    /// Worker threads; 0 uses the global rayon pool
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            fovy_degrees: 120.0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: 0,
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_fovy(mut self, degrees: f32) -> Self {
        self.fovy_degrees = degrees;
        self
    }

    pub fn with_bucket_size(mut self, size: u32) -> Self {
        self.bucket_size = size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Take whatever the scene file asks for.
    pub fn with_hints(mut self, hints: &RenderHints) -> Self {
        if let Some(width) = hints.width {
            self.width = width;
        }
        if let Some(height) = hints.height {
            self.height = height;
        }
        if let Some(fovy) = hints.fovy {
            self.fovy_degrees = fovy;
        }
        self
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let pixels = self.width as u64 * self.height as u64;
        if pixels > MAX_PIXELS {
            return Err(RenderError::InvalidConfig(format!(
                "image of {}x{} exceeds the {} pixel limit",
                self.width, self.height, MAX_PIXELS
            )));
        }
        if !(self.fovy_degrees > 0.0 && self.fovy_degrees < 180.0) {
            return Err(RenderError::InvalidConfig(format!(
                "field of view must be between 0 and 180 degrees, got {}",
                self.fovy_degrees
            )));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidConfig("bucket size must be non-zero".into()));
        }
        Ok(())
    }

    /// Distance from the eye to the image plane, in pixels.
    pub fn focal_length(&self) -> f32 {
        0.5 * self.height as f32 / (0.5 * self.fovy_degrees.to_radians()).tan()
    }
}

/// Read-only state shared by every pixel of one render.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    /// World-to-view matrix the traversal starts from
    pub view: Mat4,
    /// Every light of the scene, in view space
    pub lights: Vec<Light>,
}

impl<'a> RenderContext<'a> {
    /// Check both inputs, then set up the context for rendering `scene`.
    pub fn prepare(scene: &'a Scene, config: &RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        if !scene.camera.is_valid() {
            let camera = &scene.camera;
            return Err(RenderError::InvalidConfig(format!(
                "camera has no view direction: eye {}, target {}, up {}",
                camera.eye, camera.target, camera.up
            )));
        }
        Ok(Self::new(scene))
    }

    pub fn new(scene: &'a Scene) -> Self {
        let view = scene.view_matrix();
        Self {
            scene,
            view,
            lights: scene.root.lights_in_view(view),
        }
    }
}

/// Ray through pixel (i, j), with `j` counted from the bottom.
pub fn pixel_ray(config: &RenderConfig, i: u32, j: u32) -> Ray {
    let direction = Vec3::new(
        i as f32 - config.width as f32 / 2.0,
        j as f32 - config.height as f32 / 2.0,
        -config.focal_length(),
    );
    Ray::new(Vec3::ZERO, direction)
}

/// Convert a color in [0, 1] to 8-bit channels.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = (color.clamp(Color::ZERO, Color::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Trace and shade pixel (i, j).
pub fn render_pixel(ctx: &RenderContext<'_>, config: &RenderConfig, i: u32, j: u32) -> [u8; 3] {
    let ray = pixel_ray(config, i, j);
    let hit = cast_ray_from(&ctx.scene.root, &ctx.view, &ray);
    color_to_rgb(shade(&hit, &ctx.lights, &ctx.scene.textures))
}

/// 8-bit RGB raster, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; (width as usize) * (height as usize)],
        }
    }

    /// Get the pixel at column x, row y.
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at column x, row y.
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = self.index(x, y);
        self.pixels[idx] = rgb;
    }

    /// Packed RGB bytes, row-major from the top.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render pixel by pixel on the calling thread.
pub fn render_serial(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    let ctx = RenderContext::prepare(scene, config)?;
    let mut image = ImageBuffer::new(config.width, config.height);

    for j in 0..config.height {
        for i in 0..config.width {
            image.set(i, config.height - 1 - j, render_pixel(&ctx, config, i, j));
        }
    }

    Ok(image)
}

/// Render the scene to an image buffer using all configured threads.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    render_with_cancel(scene, config, &AtomicBool::new(false))
}

/// Like [`render`], but gives up with [`RenderError::Cancelled`] once
/// `cancel` is set. Buckets already in flight finish first.
pub fn render_with_cancel(
    scene: &Scene,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    let ctx = RenderContext::prepare(scene, config)?;
    let start = Instant::now();

    let image = if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        log::info!(
            "Rendering {}x{} on {} threads",
            config.width,
            config.height,
            pool.current_num_threads()
        );
        pool.install(|| render_buckets(&ctx, config, cancel))?
    } else {
        log::info!(
            "Rendering {}x{} on {} threads",
            config.width,
            config.height,
            rayon::current_num_threads()
        );
        render_buckets(&ctx, config, cancel)?
    };

    log::info!("Render finished in {:.2?}", start.elapsed());
    Ok(image)
}
