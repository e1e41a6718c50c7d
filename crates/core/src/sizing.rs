//! Font-size search for the stage view.
//!
//! Short setlists get the largest uniform size that still stacks onto one
//! page. Long setlists use fixed sizes and let pagination absorb the rest.

use crate::config::LayoutConfig;
use crate::metrics::PT_TO_MM;
use crate::types::{Setlist, SetlistEntry};

/// How the stage view is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Everything fits on one page; no page breaks.
    SinglePage,
    /// Too many songs for one page; fixed sizes, paginated.
    MultiPage,
    /// Few enough songs for one page, but even the smallest candidate is
    /// too tall. Sizes sit at their floors and the stage view paginates.
    Overflowing,
}

/// Font sizes (pt) for the stage view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizePlan {
    pub song_font_size: f64,
    pub break_font_size: f64,
    pub mode: LayoutMode,
}

impl FontSizePlan {
    /// Size used for `entry`.
    pub fn size_for(&self, entry: &SetlistEntry) -> f64 {
        match entry {
            SetlistEntry::Song { .. } => self.song_font_size,
            SetlistEntry::Break { .. } => self.break_font_size,
        }
    }

    /// Whether the stage view may insert page breaks.
    pub fn paginates(&self) -> bool {
        self.mode != LayoutMode::SinglePage
    }
}

/// Song sizes tried by the search, largest first.
pub fn candidate_sizes(config: &LayoutConfig) -> Vec<f64> {
    if config.search_step <= 0.0 || config.search_min > config.search_max {
        return Vec::new();
    }

    let steps = ((config.search_max - config.search_min) / config.search_step).floor() as usize;
    (0..=steps)
        .map(|i| config.search_max - i as f64 * config.search_step)
        .collect()
}

/// Break size derived from a song size during the search.
pub fn derived_break_size(song_size: f64, config: &LayoutConfig) -> f64 {
    (song_size * config.break_size_ratio).max(config.search_break_min)
}

/// Estimated stacked height (mm) of the whole setlist at the given sizes.
///
/// Every entry advances by its size times the stacking factor; every break
/// that is not the very first entry also gets a gap above it.
pub fn estimate_stack_height(
    setlist: &Setlist,
    song_size: f64,
    break_size: f64,
    config: &LayoutConfig,
) -> f64 {
    setlist
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            SetlistEntry::Song { .. } => song_size * PT_TO_MM * config.stack_line_factor,
            SetlistEntry::Break { .. } => {
                let gap = if index > 0 {
                    break_size * PT_TO_MM * config.break_gap_factor
                } else {
                    0.0
                };
                break_size * PT_TO_MM * config.stack_line_factor + gap
            }
        })
        .sum()
}

/// Pick the stage-view font sizes for `setlist`.
pub fn plan_font_sizes(setlist: &Setlist, config: &LayoutConfig) -> FontSizePlan {
    let song_count = setlist.song_count();

    if song_count > config.single_page_song_limit {
        log::info!(
            "{} songs exceed the single-page limit of {}, using fixed sizes",
            song_count,
            config.single_page_song_limit
        );
        return FontSizePlan {
            song_font_size: config.multi_page_song_size,
            break_font_size: config.multi_page_break_size.min(config.multi_page_song_size),
            mode: LayoutMode::MultiPage,
        };
    }

    let usable = config.usable_stage_height();
    for size in candidate_sizes(config) {
        let break_size = derived_break_size(size, config);
        let height = estimate_stack_height(setlist, size, break_size, config);
        if height <= usable {
            let song_font_size = size.max(config.song_floor);
            let plan = FontSizePlan {
                song_font_size,
                break_font_size: break_size.max(config.break_floor).min(song_font_size),
                mode: LayoutMode::SinglePage,
            };
            log::info!(
                "single-page stage view at {}pt songs / {}pt breaks ({:.1} of {:.1}mm)",
                plan.song_font_size,
                plan.break_font_size,
                height,
                usable
            );
            return plan;
        }
    }

    log::warn!(
        "setlist of {} entries does not fit one page even at {}pt, paginating",
        setlist.len(),
        config.search_min
    );
    FontSizePlan {
        song_font_size: config.song_floor,
        break_font_size: config.break_floor.min(config.song_floor),
        mode: LayoutMode::Overflowing,
    }
}
