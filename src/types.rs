//! Core types for spark-card.
//!
//! These are the values that flow through the property store into the frames:
//! colors, edge insets, alignment, and the attribute keys themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardError;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
/// Serialized as a hex string (`#RRGGBBAA`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Check if color is fully transparent.
    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse a hex color: `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, CardError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || CardError::InvalidColor(hex.to_string());

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        match digits.len() {
            3 => {
                // Short form: each digit is doubled (#f80 -> #ff8800)
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

// =============================================================================
// Edge Insets
// =============================================================================

/// Padding offsets for the four edges of a frame.
///
/// Values are passed to the frame backend uninterpreted, so nothing here
/// rejects negative numbers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "EdgeInsetsRepr")]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self { top, left, bottom, right }
    }

    /// Same offset on all four edges.
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// `horizontal` for left/right, `vertical` for top/bottom.
    pub const fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }
}

/// Config accepts `padding = 8` as well as `padding = { top = 8, ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum EdgeInsetsRepr {
    Uniform(f64),
    Edges {
        #[serde(default)]
        top: f64,
        #[serde(default)]
        left: f64,
        #[serde(default)]
        bottom: f64,
        #[serde(default)]
        right: f64,
    },
}

impl From<EdgeInsetsRepr> for EdgeInsets {
    fn from(repr: EdgeInsetsRepr) -> Self {
        match repr {
            EdgeInsetsRepr::Uniform(v) => Self::uniform(v),
            EdgeInsetsRepr::Edges { top, left, bottom, right } => {
                Self::new(top, left, bottom, right)
            }
        }
    }
}

// =============================================================================
// Horizontal Alignment
// =============================================================================

/// How the inner frame sizes itself horizontally inside the outer frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    #[default]
    Start,
    Center,
    End,
    Fill,
}

impl FromStr for HorizontalAlignment {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "center" => Ok(Self::Center),
            "end" => Ok(Self::End),
            "fill" => Ok(Self::Fill),
            _ => Err(CardError::InvalidConfig(format!("unknown alignment: {s}"))),
        }
    }
}

// =============================================================================
// Height
// =============================================================================

/// Height request meaning "no constraint, let the host decide".
pub const HEIGHT_UNCONSTRAINED: f64 = -1.0;

// =============================================================================
// Attribute Keys
// =============================================================================

/// The nine attributes a card exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrKind {
    Content,
    HorizontalAlignment,
    HeightRequest,
    OuterFillColor,
    InnerFillColor,
    OuterPadding,
    InnerPadding,
    HasShadow,
    SwipeToClearEnabled,
}

impl AttrKind {
    /// All attributes, in declaration order.
    pub const ALL: [AttrKind; 9] = [
        AttrKind::Content,
        AttrKind::HorizontalAlignment,
        AttrKind::HeightRequest,
        AttrKind::OuterFillColor,
        AttrKind::InnerFillColor,
        AttrKind::OuterPadding,
        AttrKind::InnerPadding,
        AttrKind::HasShadow,
        AttrKind::SwipeToClearEnabled,
    ];

    /// Stable snake_case name, as used in config files and logs.
    pub const fn name(self) -> &'static str {
        match self {
            AttrKind::Content => "content",
            AttrKind::HorizontalAlignment => "horizontal_alignment",
            AttrKind::HeightRequest => "height_request",
            AttrKind::OuterFillColor => "outer_fill_color",
            AttrKind::InnerFillColor => "inner_fill_color",
            AttrKind::OuterPadding => "outer_padding",
            AttrKind::InnerPadding => "inner_padding",
            AttrKind::HasShadow => "has_shadow",
            AttrKind::SwipeToClearEnabled => "swipe_to_clear_enabled",
        }
    }

    /// The single-bit flag for this attribute.
    pub const fn flag(self) -> AttrFlags {
        match self {
            AttrKind::Content => AttrFlags::CONTENT,
            AttrKind::HorizontalAlignment => AttrFlags::HORIZONTAL_ALIGNMENT,
            AttrKind::HeightRequest => AttrFlags::HEIGHT_REQUEST,
            AttrKind::OuterFillColor => AttrFlags::OUTER_FILL_COLOR,
            AttrKind::InnerFillColor => AttrFlags::INNER_FILL_COLOR,
            AttrKind::OuterPadding => AttrFlags::OUTER_PADDING,
            AttrKind::InnerPadding => AttrFlags::INNER_PADDING,
            AttrKind::HasShadow => AttrFlags::HAS_SHADOW,
            AttrKind::SwipeToClearEnabled => AttrFlags::SWIPE_TO_CLEAR_ENABLED,
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttrKind {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttrKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CardError::UnknownAttribute(s.to_string()))
    }
}

bitflags::bitflags! {
    /// A set of attributes, for subscribing observers to a subset.
    ///
    /// Combine with bitwise OR: `AttrFlags::OUTER_FILL_COLOR | AttrFlags::INNER_FILL_COLOR`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u16 {
        const CONTENT = 1 << 0;
        const HORIZONTAL_ALIGNMENT = 1 << 1;
        const HEIGHT_REQUEST = 1 << 2;
        const OUTER_FILL_COLOR = 1 << 3;
        const INNER_FILL_COLOR = 1 << 4;
        const OUTER_PADDING = 1 << 5;
        const INNER_PADDING = 1 << 6;
        const HAS_SHADOW = 1 << 7;
        const SWIPE_TO_CLEAR_ENABLED = 1 << 8;

        const COLORS = Self::OUTER_FILL_COLOR.bits() | Self::INNER_FILL_COLOR.bits();
        const PADDING = Self::OUTER_PADDING.bits() | Self::INNER_PADDING.bits();
    }
}

impl AttrFlags {
    pub fn contains_kind(&self, kind: AttrKind) -> bool {
        self.contains(kind.flag())
    }
}

// =============================================================================
// Tests
// =============================================================================
