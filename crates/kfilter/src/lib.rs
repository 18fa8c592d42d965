//! Spatial image filtering: gaussian and box convolution with contrast adjustment.
//!
//! ```no_run
//! use kfilter::{
//!     imgproc::{filter::ConvolutionEngine, FilterConfig, Technique},
//!     io::functional as F,
//! };
//!
//! let config = FilterConfig::new(2, Technique::Gaussian, 0).unwrap();
//! let src = F::read_image_any_rgb8("input.jpg").unwrap();
//! let dst = ConvolutionEngine::new(config).apply(&src).unwrap();
//! F::write_image_any_rgba8("output.png", &dst, None).unwrap();
//! ```

#[doc(inline)]
pub use kfilter_image as image;

#[doc(inline)]
pub use kfilter_imgproc as imgproc;

#[doc(inline)]
pub use kfilter_io as io;
