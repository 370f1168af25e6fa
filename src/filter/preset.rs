use std::str::FromStr;

use super::FilterSettings;
use crate::error::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPreset {
    Original,
    Vintage,
    Vivid,
    Bw,
    Soft,
    Enhance,
}

impl FilterPreset {
    pub const ALL: [Self; 6] = [
        Self::Original,
        Self::Vintage,
        Self::Vivid,
        Self::Bw,
        Self::Soft,
        Self::Enhance,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Vintage => "vintage",
            Self::Vivid => "vivid",
            Self::Bw => "bw",
            Self::Soft => "soft",
            Self::Enhance => "enhance",
        }
    }

    pub const fn settings(self) -> FilterSettings {
        match self {
            Self::Original => FilterSettings::ORIGINAL,
            Self::Vintage => FilterSettings::from_parts(110.0, 90.0, 80.0, 0.0, 20.0),
            Self::Vivid => FilterSettings::from_parts(105.0, 120.0, 130.0, 0.0, 0.0),
            Self::Bw => FilterSettings::from_parts(100.0, 110.0, 0.0, 0.0, 100.0),
            Self::Soft => FilterSettings::from_parts(105.0, 90.0, 95.0, 1.0, 0.0),
            Self::Enhance => FilterSettings::from_parts(110.0, 115.0, 110.0, 0.0, 0.0),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("reset") {
            return Some(Self::Original);
        }
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name))
    }
}

impl FromStr for FilterPreset {
    type Err = EditorError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::from_name(name).ok_or_else(|| EditorError::UnknownPreset {
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
