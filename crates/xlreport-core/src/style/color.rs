//! Color representation

use std::fmt;

/// Color as it appears in a style record
///
/// Only [`Color::Rgb`] and [`Color::Argb`] carry a literal value. Theme and
/// indexed colors are kept so a loaded file can be written back, but they
/// have no RGB form of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color with tint stored as a percentage
    Theme { index: u8, tint: i8 },

    /// Indexed color (legacy palette)
    Indexed(u8),
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    /// Create from a hex string (e.g., "#FF0000", "FF0000" or "80FF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            6 => Some(Color::Rgb {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// 8-digit upper-case ARGB hex for literal colors, `None` otherwise
    ///
    /// ```
    /// use xlreport_core::Color;
    ///
    /// assert_eq!(Color::rgb(255, 0, 0).argb_hex().as_deref(), Some("FFFF0000"));
    /// assert_eq!(Color::Theme { index: 4, tint: 0 }.argb_hex(), None);
    /// ```
    pub fn argb_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } => Some(format!("FF{r:02X}{g:02X}{b:02X}")),
            Color::Argb { a, r, g, b } => Some(format!("{a:02X}{r:02X}{g:02X}{b:02X}")),
            _ => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Rgb { r, g, b } => write!(f, "#{r:02X}{g:02X}{b:02X}"),
            Color::Argb { a, r, g, b } => write!(f, "#{a:02X}{r:02X}{g:02X}{b:02X}"),
            Color::Theme { index, tint } => write!(f, "theme({index}, {tint}%)"),
            Color::Indexed(i) => write!(f, "indexed({i})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(
            Color::from_hex("80FFFFFF"),
            Some(Color::argb(128, 255, 255, 255))
        );
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Color::from_hex("red"), None);
        assert_eq!(Color::from_hex("FF00"), None);
        assert_eq!(Color::from_hex("+F0000"), None);
        assert_eq!(Color::from_hex("ÄÄÄ"), None);
    }

    #[test]
    fn test_argb_hex() {
        assert_eq!(Color::rgb(0x63, 0x8E, 0xC6).argb_hex().unwrap(), "FF638EC6");
        assert_eq!(Color::argb(0x80, 1, 2, 3).argb_hex().unwrap(), "80010203");
        assert_eq!(Color::Auto.argb_hex(), None);
        assert_eq!(Color::Indexed(8).argb_hex(), None);
    }
}
