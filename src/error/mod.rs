use crate::storage::StorageError;
use thiserror::Error;

pub type EditorResult<T> = std::result::Result<T, EditorError>;
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Recoverable outcomes of editing operations. The caller decides how to surface them.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("file is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },
    #[error("unsupported image format")]
    UnsupportedFormat,
    #[error("failed to decode image: {message}")]
    DecodeError { message: String },
    #[error("no image loaded")]
    NoImageLoaded,
    #[error("invalid value for filter channel {channel}")]
    InvalidFilterValue { channel: &'static str },
    #[error("unknown filter preset: {name}")]
    UnknownPreset { name: String },
    #[error("surface is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    SurfaceSizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    #[error("failed to encode export: {0}")]
    EncodeError(#[source] image::ImageError),
    #[error("{feature} is not implemented")]
    NotImplemented { feature: &'static str },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
