use image::{ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;

use crate::error::{EditorError, EditorResult};

/// Formats accepted on image ingress.
pub const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: RgbaImage,
    pub format: ImageFormat,
}

/// Bytes accepted for decoding, tagged with the load generation that requested them.
#[derive(Debug)]
pub struct PendingLoad {
    generation: u64,
    bytes: Vec<u8>,
}

impl PendingLoad {
    pub(crate) fn new(generation: u64, bytes: Vec<u8>) -> Self {
        Self { generation, bytes }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Decodes the bytes. Pure, so it can run away from the editing thread.
    pub fn decode(self) -> DecodedLoad {
        DecodedLoad {
            generation: self.generation,
            result: decode_image(&self.bytes),
        }
    }
}

#[derive(Debug)]
pub struct DecodedLoad {
    pub(crate) generation: u64,
    pub(crate) result: EditorResult<DecodedImage>,
}

impl DecodedLoad {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed { width: u32, height: u32 },
    /// A newer load began before this one completed; the result was discarded.
    Stale,
}

pub fn check_upload_size(size: u64, limit: u64) -> EditorResult<()> {
    if size > limit {
        return Err(EditorError::FileTooLarge { size, limit });
    }
    Ok(())
}

pub fn detect_format(bytes: &[u8]) -> EditorResult<ImageFormat> {
    let format = image::guess_format(bytes).map_err(|_| EditorError::UnsupportedFormat)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(EditorError::UnsupportedFormat);
    }
    Ok(format)
}

pub fn decode_image(bytes: &[u8]) -> EditorResult<DecodedImage> {
    let format = detect_format(bytes)?;
    let image = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|err| EditorError::DecodeError {
            message: err.to_string(),
        })?
        .to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(EditorError::DecodeError {
            message: "image has no pixels".to_string(),
        });
    }
    Ok(DecodedImage { image, format })
}
