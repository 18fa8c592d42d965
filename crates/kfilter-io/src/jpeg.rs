use std::path::Path;

use jpeg_encoder::{ColorType, Encoder};
use kfilter_image::Image;

use crate::error::{write_error, IoError};

/// Default quality used when encoding JPEG images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Highest JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Check that a JPEG quality lies in `[0, 100]`.
pub fn check_jpeg_quality(quality: u8) -> Result<u8, IoError> {
    if quality > MAX_JPEG_QUALITY {
        return Err(IoError::InvalidJpegQuality(quality));
    }
    Ok(quality)
}

/// Writes the given JPEG _(rgba8)_ data to the given file path.
///
/// JPEG has no alpha channel, so the alpha samples are discarded by the encoder.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image containing the pixel data.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
    quality: u8,
) -> Result<(), IoError> {
    write_image_jpeg_imp(file_path, image, ColorType::Rgba, quality)
}

fn write_image_jpeg_imp<const N: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, N>,
    color_type: ColorType,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let quality = check_jpeg_quality(quality)?;
    let image_size = image.size();

    let (width, height) = match (
        u16::try_from(image_size.width),
        u16::try_from(image_size.height),
    ) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(write_error(
                file_path,
                format!("{} exceeds the JPEG size limit", image_size),
            ))
        }
    };

    let encoder = Encoder::new_file(file_path, quality).map_err(|e| write_error(file_path, e))?;
    encoder
        .encode(image.as_slice(), width, height, color_type)
        .map_err(|e| write_error(file_path, e))?;

    Ok(())
}
