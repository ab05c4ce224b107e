//! Color value types.
//!
//! WordprocessingML colors are either explicit RRGGBB hex values or theme
//! color references with optional tint/shade adjustments. Both forms are
//! immutable value objects copied by value.

use serde::{Deserialize, Serialize};

/// A resolved or referenced color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorDefinition {
    /// Explicit color as a six-digit lowercase hex string without `#`.
    Hex(String),
    /// Reference to a theme color slot, resolved at render time.
    Theme {
        name: String,
        /// Tint percentage in 0..=255 OOXML byte form, if present.
        tint: Option<u8>,
        /// Shade percentage in 0..=255 OOXML byte form, if present.
        shade: Option<u8>,
    },
    /// `w:val="auto"` — renderer decides.
    Auto,
}

impl ColorDefinition {
    /// Build a hex color from raw RGB components.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Hex(format!("{r:02x}{g:02x}{b:02x}"))
    }

    /// Parse a `w:color`-style attribute value (`"FF0000"`, `"auto"`).
    ///
    /// Returns `None` for values that are neither `auto` nor six hex digits.
    pub fn parse_attr(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("auto") {
            return Some(Self::Auto);
        }
        let value = value.strip_prefix('#').unwrap_or(value);
        if value.len() == 6 && value.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self::Hex(value.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The hex form, if this is an explicit color.
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Self::Hex(hex) => Some(hex),
            _ => None,
        }
    }
}
