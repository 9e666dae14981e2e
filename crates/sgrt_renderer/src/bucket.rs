//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::renderer::{render_pixel, ImageBuffer, RenderConfig, RenderContext, RenderError, RenderResult};

/// A rectangular region of the output image.
///
/// Coordinates are output rows and columns, with row 0 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// The centre of the frame finishes first, the corners last.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    if bucket_size == 0 {
        return buckets;
    }

    let mut index = 0;
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(bucket: &Bucket, ctx: &RenderContext<'_>, config: &RenderConfig) -> Vec<[u8; 3]> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for row in bucket.y..bucket.y + bucket.height {
        // Output rows run top-down, pixel rows bottom-up
        let j = config.height - 1 - row;
        for i in bucket.x..bucket.x + bucket.width {
            pixels.push(render_pixel(ctx, config, i, j));
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<[u8; 3]>,
}

impl BucketResult {
    /// Create a new bucket result.
    pub fn new(bucket: Bucket, pixels: Vec<[u8; 3]>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into place.
    pub fn write_into(&self, image: &mut ImageBuffer) {
        let mut pixels = self.pixels.iter();
        for y in self.bucket.y..self.bucket.y + self.bucket.height {
            for x in self.bucket.x..self.bucket.x + self.bucket.width {
                if let Some(&rgb) = pixels.next() {
                    image.set(x, y, rgb);
                }
            }
        }
    }
}

/// Render every bucket on the current rayon pool and assemble the image.
///
/// Each bucket checks `cancel` before it starts; if the flag is set by the
/// time all buckets are done the partial image is dropped.
pub fn render_buckets(
    ctx: &RenderContext<'_>,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    let total = buckets.len();
    let done = AtomicUsize::new(0);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }

            let pixels = render_bucket(bucket, ctx, config);
            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Bucket {} done ({}/{})", bucket.index, finished, total);

            Some(BucketResult::new(*bucket, pixels))
        })
        .collect();

    if cancel.load(Ordering::Relaxed) {
        log::info!("Render cancelled after {}/{} buckets", results.len(), total);
        return Err(RenderError::Cancelled);
    }

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        result.write_into(&mut image);
    }
    Ok(image)
}
