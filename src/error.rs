//! Error types for the media dater

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for media dater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the media dater
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read metadata (exiftool) from {path}: {message}")]
    MetadataRead { path: PathBuf, message: String },

    #[error("Failed to set metadata dates on {path}: {message}")]
    MetadataWrite { path: PathBuf, message: String },

    #[error("Failed to move {path} to {dest}: {message}")]
    Relocate {
        path: PathBuf,
        dest: PathBuf,
        message: String,
    },

    #[error("ExifTool not found. Please install ExifTool and ensure it is in PATH")]
    ExifToolNotFound,

    #[error("No media files found in {0}")]
    NoMediaFiles(PathBuf),
}
