use image::{ImageFormat, RgbaImage};

use super::surface::DrawingSurface;
use crate::geometry::ImageBounds;

/// A decoded base image together with the drawing surface created for it.
///
/// The pair is built and replaced as a unit, so the surface always matches
/// the base image's natural resolution.
#[derive(Debug, Clone)]
pub struct Document {
    base: RgbaImage,
    format: ImageFormat,
    surface: DrawingSurface,
    generation: u64,
}

impl Document {
    pub fn new(base: RgbaImage, format: ImageFormat, generation: u64) -> Self {
        let surface = DrawingSurface::for_base(&base);
        Self {
            base,
            format,
            surface,
            generation,
        }
    }

    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// Load generation that produced this document.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> ImageBounds {
        ImageBounds::new(self.base.width(), self.base.height())
    }

    pub(crate) fn parts_mut(&mut self) -> (&RgbaImage, &mut DrawingSurface) {
        (&self.base, &mut self.surface)
    }
}
