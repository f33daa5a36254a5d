//! Card configuration.
//!
//! A card can be described in TOML: the starting value of every styling
//! attribute plus the swipe tuning. Everything is optional; missing keys
//! fall back to the attribute defaults.
//!
//! ```toml
//! horizontal_alignment = "fill"
//! height_request = 120
//! outer_fill_color = "#202020"
//! inner_fill_color = "#ffffffff"
//! outer_padding = 4
//! inner_padding = { top = 8, left = 12, bottom = 8, right = 12 }
//! has_shadow = true
//! swipe_to_clear_enabled = true
//!
//! [swipe]
//! threshold_ratio = 0.8
//! ```
//!
//! Content is not configurable; it is a live node supplied at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::store::AttrValue;
use crate::error::{CardError, Result};
use crate::state::swipe::DEFAULT_THRESHOLD_RATIO;
use crate::types::{EdgeInsets, HorizontalAlignment, Rgba, HEIGHT_UNCONSTRAINED};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub horizontal_alignment: HorizontalAlignment,
    pub height_request: f64,
    pub outer_fill_color: Rgba,
    pub inner_fill_color: Rgba,
    pub outer_padding: EdgeInsets,
    pub inner_padding: EdgeInsets,
    pub has_shadow: bool,
    pub swipe_to_clear_enabled: bool,
    pub swipe: SwipeConfig,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            horizontal_alignment: HorizontalAlignment::Start,
            height_request: HEIGHT_UNCONSTRAINED,
            outer_fill_color: Rgba::TRANSPARENT,
            inner_fill_color: Rgba::TRANSPARENT,
            outer_padding: EdgeInsets::ZERO,
            inner_padding: EdgeInsets::ZERO,
            has_shadow: false,
            swipe_to_clear_enabled: false,
            swipe: SwipeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Fraction of the content width used as the clear threshold, in (0, 1].
    pub threshold_ratio: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

impl SwipeConfig {
    pub fn validate(&self) -> Result<()> {
        let ratio = self.threshold_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(CardError::InvalidConfig(format!(
                "swipe.threshold_ratio must be in (0, 1], got {ratio}"
            )));
        }
        Ok(())
    }
}

impl CardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded card config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.swipe.validate()
    }

    /// Attribute values this config describes, in store order.
    ///
    /// Swipe enablement comes last so it attaches to whatever content the
    /// other values left in place.
    pub fn attribute_values(&self) -> Vec<AttrValue> {
        vec![
            AttrValue::HorizontalAlignment(self.horizontal_alignment),
            AttrValue::HeightRequest(self.height_request),
            AttrValue::OuterFillColor(self.outer_fill_color),
            AttrValue::InnerFillColor(self.inner_fill_color),
            AttrValue::OuterPadding(self.outer_padding),
            AttrValue::InnerPadding(self.inner_padding),
            AttrValue::HasShadow(self.has_shadow),
            AttrValue::SwipeToClearEnabled(self.swipe_to_clear_enabled),
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================
