//! Layout and fitting configuration.
//!
//! Every tuning constant used by the font-size search, the shortener and the
//! page composer lives here so it can be recalibrated without touching the
//! algorithms. The defaults reproduce an A4 page with an 8 mm margin.

use crate::metrics::FontFamily;
use crate::{Error, Result};

/// Page geometry, fitting constants and table layout for one export.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Page width in mm.
    pub page_width: f64,
    /// Page height in mm.
    pub page_height: f64,
    /// Margin applied on all four sides, in mm.
    pub margin: f64,

    /// Height kept free at the top of a single-page stage view (header).
    pub single_page_reserve: f64,
    /// Fraction of the column width a phrase may use before shortening starts.
    pub shorten_trigger_ratio: f64,

    /// Break size as a fraction of the song size during the search.
    pub break_size_ratio: f64,
    /// Smallest break size the search derives.
    pub search_break_min: f64,
    /// Line advance per entry, as a multiple of the font size.
    pub stack_line_factor: f64,
    /// Extra gap above every break except a leading one, as a multiple of its size.
    pub break_gap_factor: f64,
    /// Line advance used when the stage view spans several pages.
    pub multi_page_line_factor: f64,
    /// Extra space below every entry when the stage view spans several pages, in mm.
    pub multi_page_entry_gap: f64,

    /// Largest song size tried by the search.
    pub search_max: f64,
    /// Smallest song size tried by the search.
    pub search_min: f64,
    /// Step between search candidates.
    pub search_step: f64,
    /// Lower bound for the song size in single-page mode.
    pub song_floor: f64,
    /// Lower bound for the break size in single-page mode.
    pub break_floor: f64,

    /// Fixed song size when the stage view is paginated.
    pub multi_page_song_size: f64,
    /// Fixed break size when the stage view is paginated.
    pub multi_page_break_size: f64,
    /// Setlists with more songs than this are laid out over several pages.
    pub single_page_song_limit: usize,

    /// Left indent of break markers in the stage view, in mm.
    pub break_indent: f64,
    /// Font family used for everything on the page.
    pub font_family: FontFamily,
    /// Size of the small header lines (date, summary).
    pub header_font_size: f64,
    /// Size of the organizer heading.
    pub heading_font_size: f64,

    /// Body size of the organizer table.
    pub organizer_font_size: f64,
    /// Size of song notes in the organizer table.
    pub notes_font_size: f64,
    /// Line advance in the organizer table, as a multiple of the font size.
    pub organizer_line_factor: f64,
    /// Width of the time-range column.
    pub time_column_width: f64,
    /// Width of the vibe column.
    pub vibe_column_width: f64,
    /// Width of the duration column.
    pub duration_column_width: f64,
    /// Horizontal padding inside each table cell.
    pub cell_padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 8.0,
            single_page_reserve: 20.0,
            shorten_trigger_ratio: 0.9,
            break_size_ratio: 0.6,
            search_break_min: 16.0,
            stack_line_factor: 1.05,
            break_gap_factor: 0.15,
            multi_page_line_factor: 1.15,
            multi_page_entry_gap: 10.0,
            search_max: 60.0,
            search_min: 24.0,
            search_step: 2.0,
            song_floor: 24.0,
            break_floor: 14.0,
            multi_page_song_size: 42.0,
            multi_page_break_size: 28.0,
            single_page_song_limit: 9,
            break_indent: 10.0,
            font_family: FontFamily::Helvetica,
            header_font_size: 12.0,
            heading_font_size: 16.0,
            organizer_font_size: 11.0,
            notes_font_size: 9.0,
            organizer_line_factor: 1.35,
            time_column_width: 32.0,
            vibe_column_width: 34.0,
            duration_column_width: 20.0,
            cell_padding: 1.5,
        }
    }
}

impl LayoutConfig {
    /// Create a configuration with the default A4 layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different page size (mm).
    pub fn with_page_size(mut self, width: f64, height: f64) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Use a different margin (mm).
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Use a different font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Change the width fraction at which shortening kicks in.
    pub fn with_shorten_trigger_ratio(mut self, ratio: f64) -> Self {
        self.shorten_trigger_ratio = ratio;
        self
    }

    /// Change how many songs still get the single-page treatment.
    pub fn with_single_page_song_limit(mut self, limit: usize) -> Self {
        self.single_page_song_limit = limit;
        self
    }

    /// Left edge of the content area.
    pub fn content_left(&self) -> f64 {
        self.margin
    }

    /// Top edge of the content area.
    pub fn content_top(&self) -> f64 {
        self.margin
    }

    /// Bottom edge of the content area.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.margin
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Height between the top and bottom margins.
    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Height available to stacked entries in single-page mode.
    pub fn usable_stage_height(&self) -> f64 {
        self.content_height() - self.single_page_reserve
    }

    /// Width left for the title column of the organizer table.
    pub fn title_column_width(&self) -> f64 {
        self.content_width()
            - self.time_column_width
            - self.vibe_column_width
            - self.duration_column_width
    }

    /// Check that the values describe a usable layout.
    pub fn validate(&self) -> Result<()> {
        if self.content_width() <= 0.0 || self.usable_stage_height() <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "margins of {} mm leave no room on a {}x{} mm page",
                self.margin, self.page_width, self.page_height
            )));
        }
        if self.search_step <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "search step must be positive, got {}",
                self.search_step
            )));
        }
        if self.search_min > self.search_max {
            return Err(Error::InvalidConfig(format!(
                "search range {}..{} is empty",
                self.search_min, self.search_max
            )));
        }
        if !(self.shorten_trigger_ratio > 0.0 && self.shorten_trigger_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "shorten trigger ratio must be in (0, 1], got {}",
                self.shorten_trigger_ratio
            )));
        }
        if self.title_column_width() <= 2.0 * self.cell_padding {
            return Err(Error::InvalidConfig(
                "organizer columns leave no room for titles".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = LayoutConfig::default();
        assert_eq!(config.content_width(), 194.0);
        assert_eq!(config.content_height(), 281.0);
        assert_eq!(config.usable_stage_height(), 261.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_title_column_takes_remaining_width() {
        let config = LayoutConfig::default();
        assert_eq!(config.title_column_width(), 194.0 - 32.0 - 34.0 - 20.0);
    }

    #[test]
    fn test_validate_rejects_oversized_margin() {
        let config = LayoutConfig::new().with_margin(120.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_trigger_ratio() {
        let config = LayoutConfig::new().with_shorten_trigger_ratio(1.5);
        assert!(config.validate().is_err());

        let config = LayoutConfig::new().with_shorten_trigger_ratio(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_search_range() {
        let mut config = LayoutConfig::default();
        config.search_min = 70.0;
        assert!(config.validate().is_err());
    }
}
