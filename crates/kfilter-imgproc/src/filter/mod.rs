//! Filter operations
//!
//! This module provides the spatial filters: kernel generation, the windowed
//! convolution engine and the reduction of accumulated channels to 8 bits.

/// Filter kernels
pub mod kernels;

/// Channel precision and clamping utilities
mod channel;
pub use channel::*;

/// Windowed convolution
mod convolution;
pub use convolution::*;

/// Filter operations
mod ops;
pub use ops::*;
