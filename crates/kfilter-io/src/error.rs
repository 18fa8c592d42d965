use std::path::{Path, PathBuf};

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(PathBuf),

    /// Error to open or read the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    DecodeError(#[from] image::ImageError),

    /// The JPEG quality is above 100.
    #[error("JPEG quality must be within [0, 100], got {0}")]
    InvalidJpegQuality(u8),

    /// Error to encode or write the image.
    #[error("Failed to write the image to {0}. {1}")]
    WriteError(PathBuf, String),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] kfilter_image::ImageError),
}

pub(crate) fn write_error(file_path: &Path, e: impl std::fmt::Display) -> IoError {
    IoError::WriteError(file_path.to_path_buf(), e.to_string())
}
