// Error handling for the result codec and loaders

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResultsError>;

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid magic: expected {expected:#010x}, got {got:#010x}")]
    InvalidMagic { expected: u32, got: u32 },

    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u32),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    #[error("Invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("Invalid UTF-8 string")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Refusing to overwrite existing file {0}")]
    FileExists(PathBuf),

    #[error("No target directory or file name set")]
    MissingLocation,

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}
