//! Writing rendered buffers to image files.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use crate::sampler::ColorBuffer;
use crate::util::math::Vector3;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write image {path}: {source}")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Map a display-ready color to 8-bit channels. Values outside [0, 1] saturate.
pub fn convert_rgb(color: Vector3) -> [u8; 3] {
    let r = (color.x * 255.0) as u8;
    let g = (color.y * 255.0) as u8;
    let b = (color.z * 255.0) as u8;
    [r, g, b]
}

pub fn to_rgb_image(buffer: &ColorBuffer) -> RgbImage {
    RgbImage::from_fn(buffer.width(), buffer.height(), |x, y| {
        Rgb(convert_rgb(buffer.clamped(x, y)))
    })
}

/// Save the buffer as a PNG whatever extension `path` carries.
pub fn save_png<P: AsRef<Path>>(buffer: &ColorBuffer, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    to_rgb_image(buffer)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| OutputError::Image {
            path: path.display().to_string(),
            source,
        })?;
    tracing::info!("Image saved as {}", path.display());
    Ok(())
}
