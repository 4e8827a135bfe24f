use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {0}: {1}")]
    Decode(String, String),

    #[error("Failed to encode {0}: {1}")]
    Encode(String, String),

    #[error("Invalid image dimensions: {0}x{1}. Both sides must be positive and fit a power of two")]
    InvalidDimensions(u32, u32),

    #[error("Invalid size ceiling: {0}. Must be a power of two")]
    InvalidCeiling(u32),

    #[error("Invalid max-size exponent: {0}. Must be between 0 and {1}")]
    InvalidExponent(u32, u32),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Image not tracked: {0}")]
    ImageNotFound(String),

    #[error("Duplicate archive entry: {0}")]
    DuplicateEntry(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("A batch run is already in progress")]
    BatchInProgress,

    #[error("Conversion task failed: {0}")]
    TaskFailed(String),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No image files found in input path: {0}")]
    NoImageFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, PackError>;
