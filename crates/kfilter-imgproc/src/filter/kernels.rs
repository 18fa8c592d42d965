use std::f64::consts::PI;

use crate::config::Technique;

/// A square matrix of convolution weights.
///
/// The side length is `2 * radius + 1` and the weights are stored row-major,
/// indexed by the kernel column `kx` and row `ky`.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2d {
    radius: usize,
    data: Vec<f64>,
}

impl Kernel2d {
    /// Radius of the kernel, excluding the center.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the kernel.
    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Weight at kernel column `kx` and row `ky`.
    ///
    /// PRECONDITION: `kx` and `ky` are smaller than [`Kernel2d::side`].
    #[inline(always)]
    pub fn get(&self, kx: usize, ky: usize) -> f64 {
        self.data[ky * self.side() + kx]
    }

    /// The weights as a flat row-major slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Sum of all the weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// The kernel used by a filter pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKernel {
    /// Precomputed normalized gaussian weights.
    Gaussian(Kernel2d),
    /// Uniform weights over the window; never materialized.
    Box {
        /// Radius of the averaging window.
        radius: usize,
    },
}

impl FilterKernel {
    /// Build the kernel for a given radius and technique.
    ///
    /// PRECONDITION: `radius` is at most [`crate::config::MAX_RADIUS`], as checked by
    /// [`crate::FilterConfig::new`].
    pub fn new(radius: usize, technique: Technique) -> Self {
        match technique {
            Technique::Gaussian => FilterKernel::Gaussian(gaussian_kernel_2d(radius)),
            Technique::Box => FilterKernel::Box { radius },
        }
    }

    /// Radius of the sampling window.
    pub fn radius(&self) -> usize {
        match self {
            FilterKernel::Gaussian(kernel) => kernel.radius(),
            FilterKernel::Box { radius } => *radius,
        }
    }
}

/// Standard deviation of the gaussian kernel for a radius.
///
/// The radius is halved with integer division and floored at 1.
pub fn gaussian_sigma(radius: usize) -> f64 {
    ((radius / 2) as f64).max(1.0)
}

/// Create a normalized 2D gaussian kernel.
///
/// # Arguments
///
/// * `radius` - Half width of the kernel. The kernel has side `2 * radius + 1`.
///
/// # Returns
///
/// A symmetric kernel whose weights add up to one.
///
/// PRECONDITION: `radius` is at most [`crate::config::MAX_RADIUS`].
///
/// # Examples
///
/// ```
/// use kfilter_imgproc::filter::kernels::gaussian_kernel_2d;
///
/// let kernel = gaussian_kernel_2d(0);
/// assert_eq!(kernel.as_slice(), &[1.0]);
///
/// let kernel = gaussian_kernel_2d(2);
/// assert_eq!(kernel.side(), 5);
/// assert!((kernel.sum() - 1.0).abs() < 1e-9);
/// ```
pub fn gaussian_kernel_2d(radius: usize) -> Kernel2d {
    let side = 2 * radius + 1;
    let sigma = gaussian_sigma(radius);
    let two_sigma_sq = 2.0 * sigma * sigma;
    let norm = PI * two_sigma_sq;
    let r = radius as i64;

    let mut data = vec![0.0; side * side];
    let mut sum = 0.0;

    // compute the kernel
    for dy in -r..=r {
        for dx in -r..=r {
            let value = (-((dx * dx + dy * dy) as f64) / two_sigma_sq).exp() / norm;
            data[(dy + r) as usize * side + (dx + r) as usize] = value;
            sum += value;
        }
    }

    // normalize the kernel
    data.iter_mut().for_each(|k| *k /= sum);

    log::debug!(
        "gaussian kernel: radius {} sigma {} side {}",
        radius,
        sigma,
        side
    );

    Kernel2d { radius, data }
}
