use super::CapturedImage;
use crate::types::*;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Accept a PNG or JPEG signature image as-is
pub fn capture_upload(bytes: Vec<u8>) -> Result<CapturedImage> {
    let format = image::guess_format(&bytes)
        .map_err(|_| SignError::UnsupportedImage("unrecognised image data".to_string()))?;

    let format = match format {
        ImageFormat::Png => RasterFormat::Png,
        ImageFormat::Jpeg => RasterFormat::Jpeg,
        other => {
            return Err(SignError::UnsupportedImage(format!(
                "{:?} images are not accepted, use PNG or JPEG",
                other
            )));
        }
    };

    let (width, height) = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()?
        .into_dimensions()?;

    if width == 0 || height == 0 {
        return Err(SignError::UnsupportedImage("image has no pixels".to_string()));
    }

    Ok(CapturedImage {
        source: SignatureSource::Upload,
        image: bytes,
        format,
        width,
        height,
    })
}

/// Read an uploaded signature from disk
pub async fn load_upload(path: impl AsRef<Path>) -> Result<CapturedImage> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    capture_upload(bytes)
}
