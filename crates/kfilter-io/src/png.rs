use std::{fs::File, io::BufWriter, path::Path};

use kfilter_image::{Image, ImageSize};
use png::{BitDepth, ColorType, Encoder};

use crate::error::{write_error, IoError};

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgba,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    depth: BitDepth,
    color_type: ColorType,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let file = File::create(file_path).map_err(|e| write_error(file_path, e))?;

    let mut encoder = Encoder::new(
        BufWriter::new(file),
        image_size.width as u32,
        image_size.height as u32,
    );
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder.write_header().map_err(|e| write_error(file_path, e))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| write_error(file_path, e))?;
    writer.finish().map_err(|e| write_error(file_path, e))?;

    Ok(())
}
