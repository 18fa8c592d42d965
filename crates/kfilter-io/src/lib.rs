#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Decode and write failures are reported as distinct [`error::IoError`] variants.
pub mod error;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image_any`] for automatic format detection.
pub mod functional;

/// JPEG image encoding.
pub mod jpeg;

/// PNG image encoding.
pub mod png;

pub use crate::error::IoError;
