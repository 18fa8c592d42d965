use kfilter_image::Image;

use crate::{
    config::{check_radius, BorderMode, Technique},
    parallel::ExecutionStrategy,
};

use super::{channel::Sample, kernels::FilterKernel, spatial_filter, FilterError};

/// Blur an image using a box (mean) filter.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `dst` - The destination image with shape (H, W, 4).
/// * `radius` - Half width of the averaging window.
/// * `contrast` - Offset added to each channel after the blur.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn box_blur_rgba8<T: Sample>(
    src: &Image<T, 3>,
    dst: &mut Image<u8, 4>,
    radius: usize,
    contrast: i32,
) -> Result<(), FilterError> {
    let radius = check_radius(radius as u64)?;
    spatial_filter(
        src,
        dst,
        &FilterKernel::Box { radius },
        contrast,
        BorderMode::default(),
        ExecutionStrategy::default(),
    )
}

/// Blur an image using a gaussian filter.
///
/// The weights outside the image are dropped and the remaining ones are
/// renormalized, so borders keep their brightness.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `dst` - The destination image with shape (H, W, 4).
/// * `radius` - Half width of the kernel; sigma is derived from it.
/// * `contrast` - Offset added to each channel after the blur.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn gaussian_blur_rgba8<T: Sample>(
    src: &Image<T, 3>,
    dst: &mut Image<u8, 4>,
    radius: usize,
    contrast: i32,
) -> Result<(), FilterError> {
    let radius = check_radius(radius as u64)?;
    let kernel = FilterKernel::new(radius, Technique::Gaussian);
    spatial_filter(
        src,
        dst,
        &kernel,
        contrast,
        BorderMode::Renormalize,
        ExecutionStrategy::default(),
    )
}
