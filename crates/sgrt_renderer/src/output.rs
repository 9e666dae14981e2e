//! PNG export of finished renders.

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use thiserror::Error;

use crate::ImageBuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to create directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pixel buffer does not match a {width}x{height} image")]
    BufferSize { width: u32, height: u32 },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Write `image` as an 8-bit RGB PNG, creating parent directories as needed.
pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> OutputResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| OutputError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let rgb = RgbImage::from_raw(image.width, image.height, image.to_rgb_bytes()).ok_or(
        OutputError::BufferSize {
            width: image.width,
            height: image.height,
        },
    )?;
    rgb.save_with_format(path, ImageFormat::Png)?;

    log::info!("Image saved as {}", path.display());
    Ok(())
}
