use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::error::{EditorError, EditorResult};
use crate::geometry::{Color, ImageBounds};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The drawing layer at the natural resolution of the loaded image.
///
/// `ink` holds pen annotations. `base_mask` holds how much of the base layer
/// remains visible at each pixel: seeding copies it from the base image and the
/// eraser cuts it away together with any ink.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSurface {
    ink: RgbaImage,
    base_mask: GrayImage,
}

impl DrawingSurface {
    pub fn create(width: u32, height: u32) -> Self {
        Self {
            ink: RgbaImage::from_pixel(width, height, TRANSPARENT),
            base_mask: GrayImage::new(width, height),
        }
    }

    /// Creates a surface sized to `base` and seeds it in one step.
    pub fn for_base(base: &RgbaImage) -> Self {
        let mut surface = Self::create(base.width(), base.height());
        surface.copy_base_alpha(base);
        surface
    }

    pub fn bounds(&self) -> ImageBounds {
        ImageBounds::new(self.ink.width(), self.ink.height())
    }

    pub fn ink(&self) -> &RgbaImage {
        &self.ink
    }

    pub fn base_mask(&self) -> &GrayImage {
        &self.base_mask
    }

    pub fn seed(&mut self, base: &RgbaImage) -> EditorResult<()> {
        self.ensure_matches(base)?;
        self.copy_base_alpha(base);
        Ok(())
    }

    /// Discards every stroke and restores the seeded state.
    pub fn clear(&mut self, base: &RgbaImage) -> EditorResult<()> {
        self.ensure_matches(base)?;
        for pixel in self.ink.pixels_mut() {
            *pixel = TRANSPARENT;
        }
        self.copy_base_alpha(base);
        Ok(())
    }

    pub(crate) fn ensure_matches(&self, base: &RgbaImage) -> EditorResult<()> {
        let ImageBounds { width, height } = self.bounds();
        if base.dimensions() == (width, height) {
            return Ok(());
        }
        Err(EditorError::SurfaceSizeMismatch {
            expected_width: base.width(),
            expected_height: base.height(),
            actual_width: width,
            actual_height: height,
        })
    }

    fn copy_base_alpha(&mut self, base: &RgbaImage) {
        for (mask, pixel) in self.base_mask.pixels_mut().zip(base.pixels()) {
            *mask = Luma([pixel.0[3]]);
        }
    }

    pub(crate) fn paint_pixel(&mut self, x: u32, y: u32, color: Color) {
        let (r, g, b) = color.rgb();
        self.ink.put_pixel(x, y, Rgba([r, g, b, 255]));
    }

    pub(crate) fn erase_pixel(&mut self, x: u32, y: u32) {
        self.ink.put_pixel(x, y, TRANSPARENT);
        self.base_mask.put_pixel(x, y, Luma([0]));
    }
}
