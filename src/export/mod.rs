//! Flattening of the base image, filter and drawing layer into one raster.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::editor::Document;
use crate::error::{EditorError, EditorResult};
use crate::filter::{self, FilterSettings};

pub const EXPORT_FORMAT: ImageFormat = ImageFormat::Png;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl ExportedImage {
    pub fn file_extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("png")
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Flattens `document` and encodes the result as PNG.
pub fn flatten(
    document: Option<&Document>,
    settings: &FilterSettings,
) -> EditorResult<ExportedImage> {
    let document = document.ok_or(EditorError::NoImageLoaded)?;
    let composed = compose(document, settings)?;
    let (width, height) = composed.dimensions();
    let bytes = encode(&composed, EXPORT_FORMAT)?;
    tracing::info!(width, height, bytes = bytes.len(), "flattened export encoded");
    Ok(ExportedImage {
        bytes,
        width,
        height,
        format: EXPORT_FORMAT,
    })
}

/// Builds the flattened raster at the base image's natural resolution.
///
/// Only the base layer is filtered. Its alpha is then cut by the surface's
/// base mask, and ink is composited on top unfiltered.
pub fn compose(document: &Document, settings: &FilterSettings) -> EditorResult<RgbaImage> {
    let base = document.base();
    let surface = document.surface();
    surface.ensure_matches(base)?;

    let mut composed = filter::render(settings).apply(base);
    for ((pixel, mask), ink) in composed
        .pixels_mut()
        .zip(surface.base_mask().pixels())
        .zip(surface.ink().pixels())
    {
        pixel.0[3] = scale_alpha(pixel.0[3], mask.0[0]);
        *pixel = source_over(*ink, *pixel);
    }
    Ok(composed)
}

fn encode(image: &RgbaImage, format: ImageFormat) -> EditorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(EditorError::EncodeError)?;
    Ok(bytes)
}

fn scale_alpha(alpha: u8, coverage: u8) -> u8 {
    ((u16::from(alpha) * u16::from(coverage) + 127) / 255) as u8
}

fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match (src.0[3], dst.0[3]) {
        (0, _) => dst,
        (255, _) => src,
        (src_a, dst_a) => {
            let sa = f32::from(src_a) / 255.0;
            let da = f32::from(dst_a) / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let blend = |s: u8, d: u8| {
                let value = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
                value.round().clamp(0.0, 255.0) as u8
            };
            Rgba([
                blend(src.0[0], dst.0[0]),
                blend(src.0[1], dst.0[1]),
                blend(src.0[2], dst.0[2]),
                (out_a * 255.0).round() as u8,
            ])
        }
    }
}
