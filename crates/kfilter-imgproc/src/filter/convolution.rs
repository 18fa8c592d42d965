use kfilter_image::{Image, ImageError};
use thiserror::Error;

use crate::{
    config::{BorderMode, ConfigError, FilterConfig},
    parallel::{self, ExecutionStrategy, ParallelError},
};

use super::{
    channel::{reduce_channel, Sample},
    kernels::{FilterKernel, Kernel2d},
};

/// Value written to the alpha channel of every filtered pixel.
pub const OPAQUE: u8 = 255;

/// Errors raised while filtering an image.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The filter parameters are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The source or destination image is invalid.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The work could not be scheduled.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}

/// The sampling window of a pixel clipped to the image bounds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

impl Window {
    // PRECONDITION: the image is not empty and (col, row) lies inside it
    #[inline(always)]
    fn clipped(col: usize, row: usize, radius: usize, cols: usize, rows: usize) -> Self {
        Self {
            left: col.saturating_sub(radius),
            top: row.saturating_sub(radius),
            right: (col + radius).min(cols - 1),
            bottom: (row + radius).min(rows - 1),
        }
    }

    #[inline(always)]
    fn is_full(&self, radius: usize) -> bool {
        self.right - self.left == 2 * radius && self.bottom - self.top == 2 * radius
    }
}

// weighted sum of the samples in the window, in the 16-bit range
fn accumulate_gaussian<T: Sample>(
    src_data: &[T],
    cols: usize,
    kernel: &Kernel2d,
    window: Window,
    col: usize,
    row: usize,
    border: BorderMode,
) -> [f64; 3] {
    let radius = kernel.radius();
    let mut acc = [0.0; 3];
    let mut weight_sum = 0.0;

    for y in window.top..=window.bottom {
        let ky = y + radius - row;
        for x in window.left..=window.right {
            let kx = x + radius - col;
            let weight = kernel.get(kx, ky);
            let offset = (y * cols + x) * 3;
            for (ch, acc_ch) in acc.iter_mut().enumerate() {
                *acc_ch += src_data[offset + ch].to_wide() * weight;
            }
            weight_sum += weight;
        }
    }

    if border == BorderMode::Renormalize && !window.is_full(radius) && weight_sum > 0.0 {
        acc.iter_mut().for_each(|a| *a /= weight_sum);
    }

    acc
}

// unweighted mean of the window, seeded with the center pixel
fn accumulate_box<T: Sample>(
    src_data: &[T],
    cols: usize,
    window: Window,
    col: usize,
    row: usize,
) -> [f64; 3] {
    let center = (row * cols + col) * 3;
    let mut acc = [
        src_data[center].to_wide(),
        src_data[center + 1].to_wide(),
        src_data[center + 2].to_wide(),
    ];
    let mut count = 1usize;

    for y in window.top..=window.bottom {
        for x in window.left..=window.right {
            if x == col && y == row {
                continue;
            }
            let offset = (y * cols + x) * 3;
            for (ch, acc_ch) in acc.iter_mut().enumerate() {
                *acc_ch += src_data[offset + ch].to_wide();
            }
            count += 1;
        }
    }

    acc.map(|a| a / count as f64)
}

/// Apply a spatial filter to an RGB image.
///
/// Every destination pixel is the kernel-weighted combination of the source
/// pixels inside its window, reduced to 8 bits, offset by `contrast` and
/// clamped to `[0, 255]`. Samples outside the image do not contribute.
/// The alpha channel of the destination is always opaque.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 3).
/// * `dst` - The destination image with shape (H, W, 4).
/// * `kernel` - The gaussian or box kernel.
/// * `contrast` - Offset added to each channel after the convolution.
/// * `border` - How the gaussian weights are handled near the image border.
/// * `strategy` - How the per-pixel work is scheduled.
///
/// PRECONDITION: `src` and `dst` must have the same size.
pub fn spatial_filter<T: Sample>(
    src: &Image<T, 3>,
    dst: &mut Image<u8, 4>,
    kernel: &FilterKernel,
    contrast: i32,
    border: BorderMode,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let (cols, rows) = (src.cols(), src.rows());
    let radius = kernel.radius();
    let src_data = src.as_slice();

    parallel::par_iter_rows_indexed(dst, strategy, |col, row, dst_pixel| {
        let window = Window::clipped(col, row, radius, cols, rows);
        let acc = match kernel {
            FilterKernel::Gaussian(weights) => {
                accumulate_gaussian(src_data, cols, weights, window, col, row, border)
            }
            FilterKernel::Box { .. } => accumulate_box(src_data, cols, window, col, row),
        };
        dst_pixel[0] = reduce_channel(acc[0], contrast);
        dst_pixel[1] = reduce_channel(acc[1], contrast);
        dst_pixel[2] = reduce_channel(acc[2], contrast);
        dst_pixel[3] = OPAQUE;
    })?;

    Ok(())
}

/// Applies a configured spatial filter to whole images.
///
/// The kernel is built once from the configuration and shared read-only by
/// every pixel of every call to [`ConvolutionEngine::apply`].
///
/// # Examples
///
/// ```
/// use kfilter_image::Image;
/// use kfilter_imgproc::{filter::ConvolutionEngine, FilterConfig, Technique};
///
/// let src = Image::<u8, 3>::from_size_pixel([4, 4].into(), [255, 0, 0]).unwrap();
///
/// let config = FilterConfig::new(1, Technique::Box, 0).unwrap();
/// let dst = ConvolutionEngine::new(config).apply(&src).unwrap();
///
/// assert!(dst.as_slice().chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
/// ```
#[derive(Debug, Clone)]
pub struct ConvolutionEngine {
    config: FilterConfig,
    kernel: FilterKernel,
    strategy: ExecutionStrategy,
}

impl ConvolutionEngine {
    /// Create an engine and build its kernel.
    pub fn new(config: FilterConfig) -> Self {
        let kernel = FilterKernel::new(config.radius(), config.technique());
        Self {
            config,
            kernel,
            strategy: ExecutionStrategy::default(),
        }
    }

    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// The kernel shared by every pixel.
    pub fn kernel(&self) -> &FilterKernel {
        &self.kernel
    }

    /// The execution strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Filter `src` into a newly allocated RGBA image of the same size.
    ///
    /// Returns once every destination pixel has been written.
    pub fn apply<T: Sample>(&self, src: &Image<T, 3>) -> Result<Image<u8, 4>, FilterError> {
        let mut dst = Image::<u8, 4>::from_size_val(src.size(), 0)?;

        log::debug!(
            "filtering {} with {} kernel of width {} ({:?})",
            src.size(),
            self.config.technique(),
            self.config.kernel_width(),
            self.strategy
        );

        spatial_filter(
            src,
            &mut dst,
            &self.kernel,
            self.config.contrast(),
            self.config.border(),
            self.strategy,
        )?;

        Ok(dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Technique;

    fn impulse_3x3() -> Result<Image<u8, 3>, ImageError> {
        let mut img = Image::<u8, 3>::from_size_val([3, 3].into(), 0)?;
        img.as_slice_mut()[(3 + 1) * 3..(3 + 1) * 3 + 3].copy_from_slice(&[255, 255, 255]);
        Ok(img)
    }

    fn red_channel(img: &Image<u8, 4>) -> Vec<u8> {
        img.as_slice().chunks_exact(4).map(|px| px[0]).collect()
    }

    #[test]
    fn test_window_clipped() {
        let window = Window::clipped(0, 0, 2, 10, 10);
        assert_eq!(
            window,
            Window {
                left: 0,
                top: 0,
                right: 2,
                bottom: 2
            }
        );
        assert!(!window.is_full(2));

        let window = Window::clipped(5, 5, 2, 10, 10);
        assert!(window.is_full(2));

        let window = Window::clipped(9, 1, 3, 10, 4);
        assert_eq!(
            window,
            Window {
                left: 6,
                top: 0,
                right: 9,
                bottom: 3
            }
        );
    }

    #[test]
    fn test_gaussian_impulse_truncate() -> Result<(), FilterError> {
        let src = impulse_3x3()?;
        let config = FilterConfig::new(1, Technique::Gaussian, 0)
            .unwrap()
            .with_border(BorderMode::Truncate);
        let dst = ConvolutionEngine::new(config).apply(&src)?;

        #[rustfmt::skip]
        assert_eq!(
            red_channel(&dst),
            vec![
                19, 31, 19,
                31, 52, 31,
                19, 31, 19,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_gaussian_impulse_renormalize() -> Result<(), FilterError> {
        let src = impulse_3x3()?;
        let config = FilterConfig::new(1, Technique::Gaussian, 0).unwrap();
        let dst = ConvolutionEngine::new(config).apply(&src)?;

        #[rustfmt::skip]
        assert_eq!(
            red_channel(&dst),
            vec![
                36, 43, 36,
                43, 52, 43,
                36, 43, 36,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_box_ramp() -> Result<(), FilterError> {
        // red channel holds 0, 10, 20, 30 along a single row
        let src = Image::<u8, 3>::new(
            [4, 1].into(),
            vec![0, 0, 0, 10, 0, 0, 20, 0, 0, 30, 0, 0],
        )?;
        let config = FilterConfig::new(1, Technique::Box, 0).unwrap();
        let dst = ConvolutionEngine::new(config).apply(&src)?;

        // (0 + 10) / 2, (0 + 10 + 20) / 3, (10 + 20 + 30) / 3, (20 + 30) / 2
        assert_eq!(red_channel(&dst), vec![5, 10, 20, 25]);
        Ok(())
    }

    #[test]
    fn test_contrast_offset() -> Result<(), FilterError> {
        let src = Image::<u8, 3>::from_size_pixel([2, 2].into(), [100, 250, 5])?;
        let config = FilterConfig::new(0, Technique::Gaussian, 10).unwrap();
        let dst = ConvolutionEngine::new(config).apply(&src)?;
        assert_eq!(dst.pixel(1, 1)?, &[110, 255, 15, 255]);

        let config = FilterConfig::new(0, Technique::Gaussian, -10).unwrap();
        let dst = ConvolutionEngine::new(config).apply(&src)?;
        assert_eq!(dst.pixel(0, 0)?, &[90, 240, 0, 255]);
        Ok(())
    }

    #[test]
    fn test_u16_source() -> Result<(), FilterError> {
        let src = Image::<u16, 3>::from_size_pixel([3, 2].into(), [65535, 32768, 0])?;
        let config = FilterConfig::new(1, Technique::Gaussian, 0).unwrap();
        let dst = ConvolutionEngine::new(config).apply(&src)?;
        assert!(dst
            .as_slice()
            .chunks_exact(4)
            .all(|px| px == [255, 128, 0, 255]));
        Ok(())
    }

    #[test]
    fn test_u16_exact_level_interior() -> Result<(), FilterError> {
        // a full window must keep 768 on level 3
        let src = Image::<u16, 3>::from_size_pixel([3, 3].into(), [768, 1536, 11520])?;
        let config = FilterConfig::new(1, Technique::Gaussian, 0)
            .unwrap()
            .with_border(BorderMode::Truncate);
        let dst = ConvolutionEngine::new(config).apply(&src)?;
        assert_eq!(dst.pixel(1, 1)?, &[3, 6, 45, 255]);

        let src = Image::<u16, 3>::from_size_pixel([7, 7].into(), [3072, 6144, 11520])?;
        let config = FilterConfig::new(3, Technique::Gaussian, 0).unwrap();
        let dst = ConvolutionEngine::new(config).apply(&src)?;
        assert!(dst
            .as_slice()
            .chunks_exact(4)
            .all(|px| px == [12, 24, 45, 255]));
        Ok(())
    }

    #[test]
    fn test_radius_too_large() {
        let res = FilterConfig::new(i64::MAX, Technique::Gaussian, 0).map_err(FilterError::from);
        assert_eq!(
            res,
            Err(FilterError::Config(ConfigError::RadiusTooLarge(
                i64::MAX as u64
            )))
        );
    }

    #[test]
    fn test_size_mismatch() -> Result<(), FilterError> {
        let src = Image::<u8, 3>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 4>::from_size_val([2, 3].into(), 0)?;
        let res = spatial_filter(
            &src,
            &mut dst,
            &FilterKernel::Box { radius: 1 },
            0,
            BorderMode::Renormalize,
            ExecutionStrategy::Serial,
        );
        assert_eq!(
            res,
            Err(FilterError::Image(ImageError::InvalidImageSize(3, 3, 2, 3)))
        );
        Ok(())
    }

    #[test]
    fn test_empty_image() -> Result<(), FilterError> {
        let src = Image::<u8, 3>::from_size_val([0, 0].into(), 0)?;
        let dst = ConvolutionEngine::new(FilterConfig::default()).apply(&src)?;
        assert_eq!(dst.size(), src.size());
        assert!(dst.as_slice().is_empty());
        Ok(())
    }
}
