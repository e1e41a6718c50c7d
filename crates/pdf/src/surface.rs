//! [`DrawingSurface`] implementation on top of printpdf.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use setlist_core::{
    BuiltinMetrics, DrawingSurface, Error, FontFamily, FontSpec, FontStyle, LayoutConfig, Result,
    WidthOracle,
};

const LAYER_NAME: &str = "Layer 1";
const RULE_THICKNESS: f32 = 0.3;

/// A printpdf document being drawn page by page.
///
/// Callers use top-left millimetre coordinates; the PDF origin is the
/// bottom-left corner, so every `y` is flipped against the page height.
pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: HashMap<(FontFamily, FontStyle), IndirectFontRef>,
    metrics: BuiltinMetrics,
    page_width: f64,
    page_height: f64,
    family: FontFamily,
    style: FontStyle,
    size: f64,
    pages: usize,
}

impl PdfSurface {
    /// Start a document whose pages follow `config`'s page size.
    pub fn new(title: &str, config: &LayoutConfig) -> Self {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(config.page_width as f32),
            Mm(config.page_height as f32),
            LAYER_NAME,
        );
        let layer = doc.get_page(page).get_layer(layer);

        Self {
            doc,
            layer,
            fonts: HashMap::new(),
            metrics: BuiltinMetrics::new(),
            page_width: config.page_width,
            page_height: config.page_height,
            family: config.font_family,
            style: FontStyle::Normal,
            size: config.header_font_size,
            pages: 1,
        }
    }

    /// Pages created so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    fn font(&mut self) -> Result<IndirectFontRef> {
        let key = (self.family, self.style);
        if let Some(font) = self.fonts.get(&key) {
            return Ok(font.clone());
        }

        let font = self
            .doc
            .add_builtin_font(builtin_font(self.family, self.style))
            .map_err(|e| Error::RenderError(format!("failed to load font: {}", e)))?;
        self.fonts.insert(key, font.clone());
        Ok(font)
    }

    fn flip(&self, y: f64) -> Mm {
        Mm((self.page_height - y) as f32)
    }
}

/// Base-14 font for a family and style.
fn builtin_font(family: FontFamily, style: FontStyle) -> BuiltinFont {
    match (family, style) {
        (FontFamily::Helvetica, FontStyle::Normal) => BuiltinFont::Helvetica,
        (FontFamily::Helvetica, FontStyle::Bold) => BuiltinFont::HelveticaBold,
        (FontFamily::Helvetica, FontStyle::Italic) => BuiltinFont::HelveticaOblique,
        (FontFamily::Helvetica, FontStyle::BoldItalic) => BuiltinFont::HelveticaBoldOblique,
        (FontFamily::Courier, FontStyle::Normal) => BuiltinFont::Courier,
        (FontFamily::Courier, FontStyle::Bold) => BuiltinFont::CourierBold,
        (FontFamily::Courier, FontStyle::Italic) => BuiltinFont::CourierOblique,
        (FontFamily::Courier, FontStyle::BoldItalic) => BuiltinFont::CourierBoldOblique,
    }
}

impl WidthOracle for PdfSurface {
    fn measure(&self, text: &str, font: FontSpec) -> Result<f64> {
        self.metrics.measure(text, font)
    }
}

impl DrawingSurface for PdfSurface {
    fn set_font(&mut self, family: FontFamily, style: FontStyle) {
        self.family = family;
        self.style = style;
    }

    fn set_font_size(&mut self, size: f64) {
        self.size = size;
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        // Built-in fonts use WinAnsi; anything we cannot measure would not
        // render either.
        self.measure(text, FontSpec::new(self.family, self.style, self.size))?;

        let font = self.font()?;
        self.layer
            .use_text(text, self.size as f32, Mm(x as f32), self.flip(y), &font);
        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let line = Line {
            points: vec![
                (Point::new(Mm(x1 as f32), self.flip(y1)), false),
                (Point::new(Mm(x2 as f32), self.flip(y2)), false),
            ],
            is_closed: false,
        };
        self.layer
            .set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        self.layer.set_outline_thickness(RULE_THICKNESS);
        self.layer.add_line(line);
        Ok(())
    }

    fn new_page(&mut self) -> Result<()> {
        let (page, layer) = self.doc.add_page(
            Mm(self.page_width as f32),
            Mm(self.page_height as f32),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        log::debug!("started page {}", self.pages);
        Ok(())
    }

    fn save_as(self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| Error::RenderError(format!("failed to write PDF: {}", e)))?;
        log::debug!("wrote {} page(s) to {}", self.pages, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use setlist_core::{export_setlist, ExportOptions, Setlist, SetlistEntry};

    #[test]
    fn test_builtin_font_mapping() {
        assert!(matches!(
            builtin_font(FontFamily::Helvetica, FontStyle::Bold),
            BuiltinFont::HelveticaBold
        ));
        assert!(matches!(
            builtin_font(FontFamily::Helvetica, FontStyle::Italic),
            BuiltinFont::HelveticaOblique
        ));
        assert!(matches!(
            builtin_font(FontFamily::Courier, FontStyle::Normal),
            BuiltinFont::Courier
        ));
    }

    #[test]
    fn test_measures_like_builtin_metrics() {
        let surface = PdfSurface::new("test", &LayoutConfig::default());
        let font = FontSpec::new(FontFamily::Helvetica, FontStyle::Bold, 42.0);
        assert_eq!(
            surface.measure("Hey Jude", font).unwrap(),
            BuiltinMetrics::new().measure("Hey Jude", font).unwrap()
        );
    }

    #[test]
    fn test_new_page_counts() {
        let mut surface = PdfSurface::new("test", &LayoutConfig::default());
        assert_eq!(surface.page_count(), 1);
        surface.new_page().unwrap();
        surface.new_page().unwrap();
        assert_eq!(surface.page_count(), 3);
    }

    #[test]
    fn test_rejects_unencodable_text() {
        let mut surface = PdfSurface::new("test", &LayoutConfig::default());
        let result = surface.draw_text("雨", 10.0, 10.0);
        assert!(matches!(result, Err(Error::UnmeasurableText(_))));
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let config = LayoutConfig::default();
        let options = ExportOptions::new(dir.path(), "10/18/2026").with_config(config.clone());
        let setlist: Setlist = (1..=12)
            .map(|n| SetlistEntry::song(format!("Song Number {n}")))
            .collect();

        let report = export_setlist(PdfSurface::new("Setlist", &config), &setlist, None, &options)
            .unwrap()
            .unwrap();

        assert_eq!(report.path, dir.path().join("setlist-10-18-2026.pdf"));
        let bytes = std::fs::read(&report.path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(report.summary.stage_pages >= 2);
    }
}
