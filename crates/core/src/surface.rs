//! The drawing surface a setlist is rendered onto.
//!
//! Coordinates are millimetres from the top-left corner of the current page,
//! with `y` growing downwards. Text is positioned by its baseline.

use std::path::Path;

use crate::metrics::{FontFamily, FontStyle, WidthOracle};
use crate::Result;

/// A paginated document that can measure, draw and save text.
///
/// Measurement comes from the [`WidthOracle`] supertrait and never depends
/// on the font currently selected for drawing.
pub trait DrawingSurface: WidthOracle {
    /// Select the font used by subsequent [`DrawingSurface::draw_text`] calls.
    fn set_font(&mut self, family: FontFamily, style: FontStyle);

    /// Select the size (pt) used by subsequent text.
    fn set_font_size(&mut self, size: f64);

    /// Draw `text` with its baseline starting at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;

    /// Draw a thin straight line.
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()>;

    /// Start a new page; later drawing goes there.
    fn new_page(&mut self) -> Result<()>;

    /// Extension of the files this surface writes, without the dot.
    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    /// Write the finished document to `path`.
    fn save_as(self, path: &Path) -> Result<()>
    where
        Self: Sized;
}
