//! Deterministic oracle and surface doubles for unit tests.

use std::fmt::Write as _;
use std::path::Path;

use crate::metrics::{BuiltinMetrics, FontFamily, FontSpec, FontStyle, WidthOracle};
use crate::surface::DrawingSurface;
use crate::Result;

/// Every character is `char_width` mm wide at 10pt, scaling with size.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthOracle {
    char_width: f64,
}

impl FixedWidthOracle {
    pub fn new(char_width: f64) -> Self {
        Self { char_width }
    }
}

impl WidthOracle for FixedWidthOracle {
    fn measure(&self, text: &str, font: FontSpec) -> Result<f64> {
        Ok(text.chars().count() as f64 * self.char_width * font.size / 10.0)
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        page: usize,
    },
    Line {
        y1: f64,
        y2: f64,
        page: usize,
    },
    NewPage,
}

/// Records drawing calls; measures with the base-14 metrics.
#[derive(Debug)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    font: FontSpec,
    page: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font: FontSpec::new(FontFamily::Helvetica, FontStyle::Normal, 12.0),
            page: 1,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page
    }

    /// Text ops as (text, font, page).
    pub fn texts(&self) -> Vec<(&str, FontSpec, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text {
                    text, font, page, ..
                } => Some((text.as_str(), *font, *page)),
                _ => None,
            })
            .collect()
    }

    /// Index of the first `NewPage` op, if any.
    pub fn first_page_break(&self) -> Option<usize> {
        self.ops.iter().position(|op| *op == DrawOp::NewPage)
    }
}

impl WidthOracle for RecordingSurface {
    fn measure(&self, text: &str, font: FontSpec) -> Result<f64> {
        BuiltinMetrics.measure(text, font)
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_font(&mut self, family: FontFamily, style: FontStyle) {
        self.font.family = family;
        self.font.style = style;
    }

    fn set_font_size(&mut self, size: f64) {
        self.font.size = size;
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: self.font,
            page: self.page,
        });
        Ok(())
    }

    fn draw_line(&mut self, _x1: f64, y1: f64, _x2: f64, y2: f64) -> Result<()> {
        self.ops.push(DrawOp::Line {
            y1,
            y2,
            page: self.page,
        });
        Ok(())
    }

    fn new_page(&mut self) -> Result<()> {
        self.page += 1;
        self.ops.push(DrawOp::NewPage);
        Ok(())
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn save_as(self, path: &Path) -> Result<()> {
        let mut dump = String::new();
        for (text, font, page) in self.texts() {
            let _ = writeln!(dump, "{page}\t{:.1}\t{text}", font.size);
        }
        std::fs::write(path, dump)?;
        Ok(())
    }
}
