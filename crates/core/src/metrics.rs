//! Text measurement.
//!
//! All sizing decisions go through a [`WidthOracle`]. The style is part of
//! every measurement request, so callers never depend on whatever font a
//! drawing surface happened to have selected last.

use crate::{Error, Result};

/// Millimetres per typographic point.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// Font families available on every backend (PDF base-14 families).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// Proportional sans-serif.
    #[default]
    Helvetica,
    /// Monospaced.
    Courier,
}

impl FontFamily {
    /// Parse a family name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "helvetica" | "sans" => Some(Self::Helvetica),
            "courier" | "mono" => Some(Self::Courier),
            _ => None,
        }
    }
}

/// Weight and slant of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }
}

/// Everything that influences the rendered width of a string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub style: FontStyle,
    /// Size in points.
    pub size: f64,
}

impl FontSpec {
    pub fn new(family: FontFamily, style: FontStyle, size: f64) -> Self {
        Self {
            family,
            style,
            size,
        }
    }

    /// Same family and style at another size.
    pub fn with_size(self, size: f64) -> Self {
        Self { size, ..self }
    }
}

/// Measures rendered text width in millimetres.
///
/// Implementations must be side-effect free: measuring the same text with
/// the same font always yields the same width.
pub trait WidthOracle {
    fn measure(&self, text: &str, font: FontSpec) -> Result<f64>;
}

impl<T: WidthOracle + ?Sized> WidthOracle for &T {
    fn measure(&self, text: &str, font: FontSpec) -> Result<f64> {
        (**self).measure(text, font)
    }
}

/// Advance widths (1/1000 em) for Helvetica and Helvetica-Oblique, ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    278, 278, 584, 584, 584, 556, 1015, // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    278, 278, 278, 469, 556, 333, // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n - z
    334, 260, 334, 584, // { - ~
];

/// Advance widths (1/1000 em) for Helvetica-Bold and Helvetica-BoldOblique, ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0 - 9
    333, 333, 584, 584, 584, 611, 975, // : - @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N - Z
    333, 278, 333, 584, 556, 333, // [ - `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a - m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n - z
    389, 280, 389, 584, // { - ~
];

const COURIER_WIDTH: u16 = 600;

/// Width used for Latin-1 letters above ASCII; the base-14 tables are not
/// reproduced past the printable ASCII range.
const LATIN1_FALLBACK_WIDTH: u16 = 556;

/// Width oracle backed by the PDF base-14 font metrics.
///
/// Only characters the base-14 fonts can encode are measurable: printable
/// ASCII and the printable Latin-1 supplement. Anything else is an error,
/// since a PDF backend could not draw it either.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMetrics;

impl BuiltinMetrics {
    pub fn new() -> Self {
        Self
    }

    fn glyph_width(family: FontFamily, style: FontStyle, c: char) -> Option<u16> {
        let code = c as u32;
        let printable_ascii = (32..=126).contains(&code);
        let printable_latin1 = (160..=255).contains(&code);
        if !printable_ascii && !printable_latin1 {
            return None;
        }

        if family == FontFamily::Courier {
            return Some(COURIER_WIDTH);
        }

        if printable_latin1 {
            return Some(LATIN1_FALLBACK_WIDTH);
        }

        let table = if style.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        Some(table[(code - 32) as usize])
    }
}

impl WidthOracle for BuiltinMetrics {
    fn measure(&self, text: &str, font: FontSpec) -> Result<f64> {
        let mut units: u32 = 0;
        for c in text.chars() {
            let width = Self::glyph_width(font.family, font.style, c).ok_or_else(|| {
                Error::UnmeasurableText(format!(
                    "character {:?} (U+{:04X}) in {:?} has no base-14 glyph",
                    c, c as u32, text
                ))
            })?;
            units += u32::from(width);
        }

        Ok(f64::from(units) / 1000.0 * font.size * PT_TO_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica(style: FontStyle, size: f64) -> FontSpec {
        FontSpec::new(FontFamily::Helvetica, style, size)
    }

    #[test]
    fn test_empty_text_has_zero_width() {
        let width = BuiltinMetrics.measure("", helvetica(FontStyle::Bold, 40.0)).unwrap();
        assert_eq!(width, 0.0);
    }

    #[test]
    fn test_capital_m_width() {
        // 833/1000 em at 72pt is 833/1000 inch.
        let width = BuiltinMetrics
            .measure("M", helvetica(FontStyle::Normal, 72.0))
            .unwrap();
        assert!((width - 0.833 * 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Something Wonderful Tonight";
        let regular = BuiltinMetrics.measure(text, helvetica(FontStyle::Normal, 30.0)).unwrap();
        let bold = BuiltinMetrics.measure(text, helvetica(FontStyle::Bold, 30.0)).unwrap();
        assert!(bold > regular);
    }

    #[test]
    fn test_italic_matches_regular_widths() {
        let text = "Intermission";
        let regular = BuiltinMetrics.measure(text, helvetica(FontStyle::Normal, 20.0)).unwrap();
        let italic = BuiltinMetrics.measure(text, helvetica(FontStyle::Italic, 20.0)).unwrap();
        assert_eq!(regular, italic);
    }

    #[test]
    fn test_width_scales_with_size() {
        let small = BuiltinMetrics.measure("Song 1", helvetica(FontStyle::Bold, 20.0)).unwrap();
        let large = BuiltinMetrics.measure("Song 1", helvetica(FontStyle::Bold, 40.0)).unwrap();
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn test_courier_is_monospaced() {
        let font = FontSpec::new(FontFamily::Courier, FontStyle::Normal, 10.0);
        let narrow = BuiltinMetrics.measure("iiii", font).unwrap();
        let wide = BuiltinMetrics.measure("WWWW", font).unwrap();
        assert_eq!(narrow, wide);
    }

    #[test]
    fn test_measurement_is_idempotent() {
        let font = helvetica(FontStyle::Bold, 42.0);
        let first = BuiltinMetrics.measure("Hey Jude", font).unwrap();
        let second = BuiltinMetrics.measure("Hey Jude", font).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unencodable_text_is_an_error() {
        let result = BuiltinMetrics.measure("Tokyo \u{6771}\u{4eac}", helvetica(FontStyle::Normal, 12.0));
        assert!(matches!(result, Err(Error::UnmeasurableText(_))));

        let result = BuiltinMetrics.measure("tab\there", helvetica(FontStyle::Normal, 12.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_font_family_from_name() {
        assert_eq!(FontFamily::from_name("Helvetica"), Some(FontFamily::Helvetica));
        assert_eq!(FontFamily::from_name("COURIER"), Some(FontFamily::Courier));
        assert_eq!(FontFamily::from_name("Comic Sans"), None);
    }
}
