//! Non-destructive tonal adjustments applied at display and export time.

mod expression;
mod preset;

pub use expression::{render, FilterExpression, FilterStep};
pub use preset::FilterPreset;

use crate::error::{EditorError, EditorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterChannel {
    Brightness,
    Contrast,
    Saturate,
    Blur,
    Grayscale,
}

impl FilterChannel {
    pub const ALL: [Self; 5] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturate,
        Self::Blur,
        Self::Grayscale,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturate => "saturate",
            Self::Blur => "blur",
            Self::Grayscale => "grayscale",
        }
    }

    /// Inclusive `(min, max)` range accepted for this channel.
    pub const fn range(self) -> (f32, f32) {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturate => (0.0, 200.0),
            Self::Blur => (0.0, 10.0),
            Self::Grayscale => (0.0, 100.0),
        }
    }

    pub const fn step(self) -> f32 {
        match self {
            Self::Blur => 0.5,
            _ => 1.0,
        }
    }

    pub const fn default_value(self) -> f32 {
        match self {
            Self::Brightness | Self::Contrast | Self::Saturate => 100.0,
            Self::Blur | Self::Grayscale => 0.0,
        }
    }

    /// Snaps `value` to the channel step and clamps it into range.
    ///
    /// Infinities clamp to the nearest bound; NaN has no nearest bound and is rejected.
    pub fn normalize(self, value: f32) -> EditorResult<f32> {
        if value.is_nan() {
            return Err(EditorError::InvalidFilterValue {
                channel: self.name(),
            });
        }
        let (min, max) = self.range();
        let clamped = value.clamp(min, max);
        let step = self.step();
        Ok(((clamped / step).round() * step).clamp(min, max))
    }
}

/// A complete set of filter values. Every edit yields a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    brightness: f32,
    contrast: f32,
    saturate: f32,
    blur: f32,
    grayscale: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self::ORIGINAL
    }
}

impl FilterSettings {
    pub const ORIGINAL: Self = Self::from_parts(100.0, 100.0, 100.0, 0.0, 0.0);

    /// Builds settings from trusted in-range constants.
    pub(crate) const fn from_parts(
        brightness: f32,
        contrast: f32,
        saturate: f32,
        blur: f32,
        grayscale: f32,
    ) -> Self {
        Self {
            brightness,
            contrast,
            saturate,
            blur,
            grayscale,
        }
    }

    /// Builds settings from arbitrary input, normalizing every channel.
    pub fn new(
        brightness: f32,
        contrast: f32,
        saturate: f32,
        blur: f32,
        grayscale: f32,
    ) -> EditorResult<Self> {
        Ok(Self {
            brightness: FilterChannel::Brightness.normalize(brightness)?,
            contrast: FilterChannel::Contrast.normalize(contrast)?,
            saturate: FilterChannel::Saturate.normalize(saturate)?,
            blur: FilterChannel::Blur.normalize(blur)?,
            grayscale: FilterChannel::Grayscale.normalize(grayscale)?,
        })
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    pub const fn contrast(&self) -> f32 {
        self.contrast
    }

    pub const fn saturate(&self) -> f32 {
        self.saturate
    }

    pub const fn blur(&self) -> f32 {
        self.blur
    }

    pub const fn grayscale(&self) -> f32 {
        self.grayscale
    }

    pub const fn get(&self, channel: FilterChannel) -> f32 {
        match channel {
            FilterChannel::Brightness => self.brightness,
            FilterChannel::Contrast => self.contrast,
            FilterChannel::Saturate => self.saturate,
            FilterChannel::Blur => self.blur,
            FilterChannel::Grayscale => self.grayscale,
        }
    }

    /// Returns a copy with one channel replaced by the normalized `value`.
    pub fn with(self, channel: FilterChannel, value: f32) -> EditorResult<Self> {
        let value = channel.normalize(value)?;
        let mut next = self;
        match channel {
            FilterChannel::Brightness => next.brightness = value,
            FilterChannel::Contrast => next.contrast = value,
            FilterChannel::Saturate => next.saturate = value,
            FilterChannel::Blur => next.blur = value,
            FilterChannel::Grayscale => next.grayscale = value,
        }
        Ok(next)
    }

    pub fn is_original(&self) -> bool {
        *self == Self::ORIGINAL
    }
}
