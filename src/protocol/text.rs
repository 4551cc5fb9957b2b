//! # ESC/POS Text Styling Commands
//!
//! This module implements the text formatting commands used by text jobs.
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Alignment | ESC a n | Left / center / right justification |
//! | Size | GS ! n | Character width/height multiplier |
//! | Bold | ESC E n | **Emphasized** text |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```
//!
//! The printer has no per-job formatting scope: every setting stays active
//! until changed or until `ESC @`. Jobs that change formatting must finish
//! with [`reset_formatting`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::commands::{ESC, GS};
use crate::error::BlueposError;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

impl FromStr for Alignment {
    type Err = BlueposError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(BlueposError::InvalidRequest(format!(
                "unknown alignment '{}' (expected left, center or right)",
                other
            ))),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        })
    }
}

/// # Set Text Alignment (ESC a n)
///
/// Sets the justification for subsequent lines, barcodes and QR codes.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC a n |
/// | Hex     | 1B 61 n |
/// | Decimal | 27 97 n |
///
/// ## Parameters
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// ## Example
///
/// ```
/// use bluepos::protocol::text::{align, Alignment};
///
/// let center = align(Alignment::Center);
/// assert_eq!(center, vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// Convenience function for left alignment
#[inline]
pub fn align_left() -> Vec<u8> {
    align(Alignment::Left)
}

/// Convenience function for center alignment
#[inline]
pub fn align_center() -> Vec<u8> {
    align(Alignment::Center)
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Character size options
///
/// `small` is accepted as a request value and prints at normal size; the
/// printers this targets have no smaller font on the size command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    #[default]
    #[serde(alias = "small")]
    Normal,
    Large,
}

impl FromStr for FontSize {
    type Err = BlueposError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "normal" => Ok(Self::Normal),
            "large" => Ok(Self::Large),
            other => Err(BlueposError::InvalidRequest(format!(
                "unknown font size '{}' (expected small, normal or large)",
                other
            ))),
        }
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Large => "large",
        })
    }
}

/// # Select Character Size (GS ! n)
///
/// Sets horizontal and vertical character expansion.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS ! n |
/// | Hex     | 1D 21 n |
/// | Decimal | 29 33 n |
///
/// ## Parameters
///
/// The high nibble of `n` is the width multiplier minus one, the low nibble
/// the height multiplier minus one:
///
/// | Size | n | Multiplier |
/// |------|---|------------|
/// | Normal | 0x00 | 1×1 |
/// | Large | 0x11 | 2×2 |
///
/// ## Example
///
/// ```
/// use bluepos::protocol::text::{size, FontSize};
///
/// assert_eq!(size(FontSize::Large), vec![0x1D, 0x21, 0x11]);
/// ```
pub fn size(font_size: FontSize) -> Vec<u8> {
    let n = match font_size {
        FontSize::Normal => 0x00,
        FontSize::Large => 0x11,
    };
    vec![GS, b'!', n]
}

/// Reset to normal size (1x1)
#[inline]
pub fn size_normal() -> Vec<u8> {
    size(FontSize::Normal)
}

// ============================================================================
// TEXT EMPHASIS (BOLD)
// ============================================================================

/// # Enable Bold/Emphasis (ESC E 1)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC E 1 |
/// | Hex     | 1B 45 01 |
/// | Decimal | 27 69 1 |
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 1]
}

/// # Disable Bold/Emphasis (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0]
}

// ============================================================================
// FORMATTING RESET
// ============================================================================

/// # Restore Default Formatting
///
/// Bold off, normal size, left alignment, in that order.
///
/// ## Example
///
/// ```
/// use bluepos::protocol::text::reset_formatting;
///
/// assert_eq!(
///     reset_formatting(),
///     vec![0x1B, 0x45, 0x00, 0x1D, 0x21, 0x00, 0x1B, 0x61, 0x00]
/// );
/// ```
pub fn reset_formatting() -> Vec<u8> {
    let mut cmd = bold_off();
    cmd.extend(size_normal());
    cmd.extend(align_left());
    cmd
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_size() {
        assert_eq!(size(FontSize::Normal), vec![0x1D, 0x21, 0x00]);
        assert_eq!(size(FontSize::Large), vec![0x1D, 0x21, 0x11]);
        assert_eq!(size_normal(), size(FontSize::Normal));
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold_on(), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold_off(), vec![0x1B, 0x45, 0x00]);
    }

    #[test]
    fn test_reset_order() {
        let reset = reset_formatting();
        assert_eq!(&reset[0..3], bold_off().as_slice());
        assert_eq!(&reset[3..6], size_normal().as_slice());
        assert_eq!(&reset[6..9], align_left().as_slice());
    }

    #[test]
    fn test_parse_alignment() {
        assert_eq!("left".parse::<Alignment>().unwrap(), Alignment::Left);
        assert_eq!("CENTER".parse::<Alignment>().unwrap(), Alignment::Center);
        assert_eq!(" right ".parse::<Alignment>().unwrap(), Alignment::Right);
        assert!(matches!(
            "justify".parse::<Alignment>(),
            Err(BlueposError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_parse_font_size() {
        assert_eq!("small".parse::<FontSize>().unwrap(), FontSize::Normal);
        assert_eq!("normal".parse::<FontSize>().unwrap(), FontSize::Normal);
        assert_eq!("Large".parse::<FontSize>().unwrap(), FontSize::Large);
        assert!("huge".parse::<FontSize>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let a: Alignment = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(a, Alignment::Center);
        let s: FontSize = serde_json::from_str("\"small\"").unwrap();
        assert_eq!(s, FontSize::Normal);
        assert_eq!(serde_json::to_string(&FontSize::Large).unwrap(), "\"large\"");
    }
}
