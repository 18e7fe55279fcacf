use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CROP_SIZE, DEFAULT_DISPLAY_BUDGET, DEFAULT_MIN_SELECTION_SIZE, DEFAULT_OUTLINE_COLOR,
    DEFAULT_OUTLINE_WIDTH, DEFAULT_PREVIEW_DISPLAY_SIZE, DEFAULT_SELECTION_SIZE,
    DEFAULT_SIZE_SLIDER_MAX, DEFAULT_SIZE_SLIDER_STEP,
};
use crate::error::{CropscopeError, Result};

/// How the `crop_size` field of a crop request is filled.
///
/// The deployed front-end always sent 256 regardless of the chosen size,
/// so `Fixed` reproduces that while `MatchSelection` sends the live size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropSizePolicy {
    Fixed(u32),
    MatchSelection,
}

impl Default for CropSizePolicy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_CROP_SIZE)
    }
}

impl CropSizePolicy {
    /// Value to send for a selection of side `size`.
    pub fn resolve(&self, size: u32) -> u32 {
        match self {
            Self::Fixed(v) => *v,
            Self::MatchSelection => size,
        }
    }
}

impl fmt::Display for CropSizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => write!(f, "Fixed ({v})"),
            Self::MatchSelection => write!(f, "Match selection"),
        }
    }
}

/// Bounds and step of the size slider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderConfig {
    pub step: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_SIZE_SLIDER_STEP,
            min: 0,
            max: DEFAULT_SIZE_SLIDER_MAX,
        }
    }
}

/// Configuration for one Selector instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Fraction of the available vertical space used by the overview.
    #[serde(default = "default_display_budget")]
    pub display_budget: f64,
    /// Side of a seeded or reset selection, in source pixels.
    #[serde(default = "default_selection_size")]
    pub default_size: u32,
    #[serde(default = "default_min_size")]
    pub min_size: u32,
    #[serde(default)]
    pub size_slider: SliderConfig,
    /// Edge of the on-screen preview box, in display pixels.
    #[serde(default = "default_preview_display_size")]
    pub preview_display_size: u32,
    #[serde(default = "default_outline_color")]
    pub outline_color: [u8; 4],
    #[serde(default = "default_outline_width")]
    pub outline_width: u32,
    #[serde(default)]
    pub crop_size: CropSizePolicy,
}

fn default_display_budget() -> f64 {
    DEFAULT_DISPLAY_BUDGET
}
fn default_selection_size() -> u32 {
    DEFAULT_SELECTION_SIZE
}
fn default_min_size() -> u32 {
    DEFAULT_MIN_SELECTION_SIZE
}
fn default_preview_display_size() -> u32 {
    DEFAULT_PREVIEW_DISPLAY_SIZE
}
fn default_outline_color() -> [u8; 4] {
    DEFAULT_OUTLINE_COLOR
}
fn default_outline_width() -> u32 {
    DEFAULT_OUTLINE_WIDTH
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            display_budget: DEFAULT_DISPLAY_BUDGET,
            default_size: DEFAULT_SELECTION_SIZE,
            min_size: DEFAULT_MIN_SELECTION_SIZE,
            size_slider: SliderConfig::default(),
            preview_display_size: DEFAULT_PREVIEW_DISPLAY_SIZE,
            outline_color: DEFAULT_OUTLINE_COLOR,
            outline_width: DEFAULT_OUTLINE_WIDTH,
            crop_size: CropSizePolicy::default(),
        }
    }
}

impl SelectorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SelectorConfig =
            toml::from_str(text).map_err(|e| CropscopeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CropscopeError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.display_budget > 0.0 && self.display_budget <= 1.0) {
            return Err(CropscopeError::Config(format!(
                "display_budget must be in (0, 1], got {}",
                self.display_budget
            )));
        }
        if self.size_slider.step == 0 {
            return Err(CropscopeError::Config(
                "size_slider.step must be > 0".into(),
            ));
        }
        if self.size_slider.min > self.size_slider.max {
            return Err(CropscopeError::Config(format!(
                "size_slider.min ({}) exceeds size_slider.max ({})",
                self.size_slider.min, self.size_slider.max
            )));
        }
        if self.preview_display_size == 0 {
            return Err(CropscopeError::Config(
                "preview_display_size must be > 0".into(),
            ));
        }
        Ok(())
    }
}
