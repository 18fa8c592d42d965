use std::{io::Cursor, path::Path};

use image::{ColorType, DynamicImage, ImageReader};
use kfilter_image::{Image, ImageSize};

use crate::{
    error::IoError,
    jpeg::{write_image_jpeg_rgba8, DEFAULT_JPEG_QUALITY},
    png::write_image_png_rgba8,
};

/// A decoded RGB image at its native channel depth.
///
/// Alpha is dropped at decode time; grayscale sources are expanded to RGB.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedImage {
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 16-bit RGB image
    Rgb16(Image<u16, 3>),
}

impl DecodedImage {
    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            DecodedImage::Rgb8(img) => img.size(),
            DecodedImage::Rgb16(img) => img.size(),
        }
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate,
/// guessing the container from the file content.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image, 16-bit when the source stores more than 8 bits per channel.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<DecodedImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    let image = decode_image_any(&bytes)?;

    log::debug!("decoded {} from {}", image.size(), file_path.display());

    Ok(image)
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    let img = decode_dynamic(&bytes)?;
    let size = dynamic_size(&img);

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Decodes an image held in memory.
///
/// # Arguments
///
/// * `bytes` - Raw bytes of an encoded image in any supported container.
pub fn decode_image_any(bytes: &[u8]) -> Result<DecodedImage, IoError> {
    let img = decode_dynamic(bytes)?;
    let size = dynamic_size(&img);

    let image = match img.color() {
        ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16
        | ColorType::Rgb32F
        | ColorType::Rgba32F => {
            DecodedImage::Rgb16(Image::new(size, img.into_rgb16().into_raw())?)
        }
        _ => DecodedImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
    };

    Ok(image)
}

/// Writes an RGBA image choosing the encoder from the file extension.
///
/// `png` files are written losslessly, `jpg` and `jpeg` files with the given quality.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
/// * `quality` - JPEG quality, ignored for PNG. Defaults to 90.
pub fn write_image_any_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
    quality: Option<u8>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => write_image_png_rgba8(file_path, image),
        Some("jpg") | Some("jpeg") => {
            write_image_jpeg_rgba8(file_path, image, quality.unwrap_or(DEFAULT_JPEG_QUALITY))
        }
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, IoError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

fn dynamic_size(img: &DynamicImage) -> ImageSize {
    ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    }
}
