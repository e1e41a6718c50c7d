//! Page composition: the stage view followed by the organizer table.
//!
//! The stage view prints one large line per entry. The organizer table
//! always paginates and repeats its header row on every page.

use crate::config::LayoutConfig;
use crate::metrics::{FontSpec, FontStyle, WidthOracle, PT_TO_MM};
use crate::schedule::{format_clock, format_duration, Schedule, ScheduledEntry};
use crate::shorten::{LogTrace, ProgressiveShortener, Shortened, ShorteningTrace};
use crate::sizing::FontSizePlan;
use crate::surface::DrawingSurface;
use crate::types::{Setlist, SongCatalog};
use crate::Result;

/// Portion of the font size that hangs below the baseline.
const DESCENT_RATIO: f64 = 0.22;

/// Space between the organizer summary and the table, in mm.
const TABLE_TOP_GAP: f64 = 4.0;

/// A stage-view entry with its final text and font.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedEntry {
    pub is_break: bool,
    pub text: Shortened,
    pub font: FontSpec,
    /// Left indent in mm.
    pub indent: f64,
}

/// Shorten every stage-view entry for the sizes in `plan`.
///
/// Songs are bold and shortened to the content width; breaks are italic,
/// indented, and only transliterated.
pub fn fit_stage_entries(
    setlist: &Setlist,
    plan: &FontSizePlan,
    config: &LayoutConfig,
    oracle: &dyn WidthOracle,
    trace: &dyn ShorteningTrace,
) -> Result<Vec<FittedEntry>> {
    let shortener = ProgressiveShortener::new(oracle)
        .with_trace(trace)
        .with_trigger_ratio(config.shorten_trigger_ratio);

    setlist
        .entries()
        .iter()
        .map(|entry| {
            let is_break = entry.is_break();
            let (style, indent) = if is_break {
                (FontStyle::Italic, config.break_indent)
            } else {
                (FontStyle::Bold, 0.0)
            };
            let font = FontSpec::new(config.font_family, style, plan.size_for(entry));
            let max_width = config.content_width() - indent;
            let text = shortener.shorten(entry.text(), max_width, font, !is_break)?;

            Ok(FittedEntry {
                is_break,
                text,
                font,
                indent,
            })
        })
        .collect()
}

/// Greedy word wrap against `max_width` mm. Words wider than a whole line
/// are broken between characters.
pub fn wrap_text(
    oracle: &dyn WidthOracle,
    text: &str,
    font: FontSpec,
    max_width: f64,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if oracle.measure(&candidate, font)? <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if oracle.measure(word, font)? <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = break_word(oracle, word, font, max_width)?;
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

fn break_word(
    oracle: &dyn WidthOracle,
    word: &str,
    font: FontSpec,
    max_width: f64,
) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for c in word.chars() {
        piece.push(c);
        if piece.chars().count() > 1 && oracle.measure(&piece, font)? > max_width {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(c);
        }
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    Ok(pieces)
}

/// What a composition produced.
#[derive(Debug, Clone)]
pub struct CompositionSummary {
    pub stage_pages: usize,
    pub organizer_pages: usize,
    /// Stage-view entries as drawn.
    pub entries: Vec<FittedEntry>,
}

impl CompositionSummary {
    pub fn total_pages(&self) -> usize {
        self.stage_pages + self.organizer_pages
    }

    /// Entries whose displayed text differs from the original.
    pub fn shortened(&self) -> impl Iterator<Item = &FittedEntry> {
        self.entries.iter().filter(|e| e.text.was_shortened())
    }
}

/// A laid-out organizer row.
struct TableRow {
    time: String,
    title_lines: Vec<String>,
    note_lines: Vec<String>,
    vibe_lines: Vec<String>,
    duration: String,
    is_break: bool,
    height: f64,
}

/// Draws the stage view and the organizer table onto a surface.
pub struct PageComposer<'a> {
    config: &'a LayoutConfig,
    trace: &'a dyn ShorteningTrace,
    date_label: Option<String>,
}

impl<'a> PageComposer<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            trace: &LogTrace,
            date_label: None,
        }
    }

    /// Report shortening decisions to `trace`.
    pub fn with_trace(mut self, trace: &'a dyn ShorteningTrace) -> Self {
        self.trace = trace;
        self
    }

    /// Show `label` (an already formatted date) in the page headings.
    pub fn with_date_label(mut self, label: impl Into<String>) -> Self {
        self.date_label = Some(label.into());
        self
    }

    /// Draw both views. The surface must be positioned on a fresh first page.
    pub fn compose<S: DrawingSurface>(
        &self,
        surface: &mut S,
        setlist: &Setlist,
        catalog: Option<&SongCatalog>,
        plan: &FontSizePlan,
    ) -> Result<CompositionSummary> {
        let entries = fit_stage_entries(setlist, plan, self.config, &*surface, self.trace)?;
        let stage_pages = self.draw_stage_view(surface, &entries, plan)?;

        let schedule = Schedule::build(setlist, catalog);
        let organizer_pages = self.draw_organizer(surface, &schedule)?;

        log::info!(
            "composed {} stage page(s) and {} organizer page(s)",
            stage_pages,
            organizer_pages
        );

        Ok(CompositionSummary {
            stage_pages,
            organizer_pages,
            entries,
        })
    }

    fn draw_stage_view<S: DrawingSurface>(
        &self,
        surface: &mut S,
        entries: &[FittedEntry],
        plan: &FontSizePlan,
    ) -> Result<usize> {
        let config = self.config;
        let paginates = plan.paginates();
        let (line_factor, entry_gap) = if paginates {
            (config.multi_page_line_factor, config.multi_page_entry_gap)
        } else {
            (config.stack_line_factor, 0.0)
        };

        if let Some(label) = &self.date_label {
            self.draw_stage_header(surface, label)?;
        }

        let mut pages = 1;
        let mut cursor = config.content_top() + config.single_page_reserve;
        let mut on_page = 0;

        for (index, entry) in entries.iter().enumerate() {
            let size_mm = entry.font.size * PT_TO_MM;
            let line = size_mm * line_factor;
            let mut gap = if entry.is_break && index > 0 {
                size_mm * config.break_gap_factor
            } else {
                0.0
            };

            if paginates && on_page > 0 && cursor + gap + line > config.content_bottom() {
                surface.new_page()?;
                pages += 1;
                cursor = config.content_top();
                on_page = 0;
                gap = 0.0;
            }

            let baseline = cursor + gap + line - size_mm * DESCENT_RATIO;
            surface.set_font(entry.font.family, entry.font.style);
            surface.set_font_size(entry.font.size);
            surface.draw_text(
                &entry.text.display,
                config.content_left() + entry.indent,
                baseline,
            )?;

            cursor += gap + line + entry_gap;
            on_page += 1;
        }

        Ok(pages)
    }

    fn draw_stage_header<S: DrawingSurface>(&self, surface: &mut S, label: &str) -> Result<()> {
        let config = self.config;
        let size_mm = config.header_font_size * PT_TO_MM;
        let baseline = config.content_top() + size_mm;

        surface.set_font(config.font_family, FontStyle::Normal);
        surface.set_font_size(config.header_font_size);
        surface.draw_text(&format!("Setlist - {}", label), config.content_left(), baseline)?;

        let rule = baseline + size_mm * 0.6;
        surface.draw_line(
            config.content_left(),
            rule,
            config.content_left() + config.content_width(),
            rule,
        )
    }

    fn draw_organizer<S: DrawingSurface>(&self, surface: &mut S, schedule: &Schedule) -> Result<usize> {
        let config = self.config;
        surface.new_page()?;
        let mut pages = 1;

        let mut cursor = config.content_top() + config.heading_font_size * PT_TO_MM;
        let heading = match &self.date_label {
            Some(label) => format!("Organizer - {}", label),
            None => "Organizer".to_string(),
        };
        surface.set_font(config.font_family, FontStyle::Bold);
        surface.set_font_size(config.heading_font_size);
        surface.draw_text(&heading, config.content_left(), cursor)?;

        cursor += config.header_font_size * PT_TO_MM * 1.6;
        let summary = format!(
            "{} songs, {} entries, total running time {}",
            schedule.song_count(),
            schedule.entries().len(),
            format_clock(schedule.total_minutes())
        );
        surface.set_font(config.font_family, FontStyle::Normal);
        surface.set_font_size(config.header_font_size);
        surface.draw_text(&summary, config.content_left(), cursor)?;

        cursor += TABLE_TOP_GAP;
        cursor = self.draw_table_header(surface, cursor)?;
        let mut rows_on_page = 0;

        for entry in schedule.entries() {
            let row = self.layout_row(&*surface, entry)?;

            if rows_on_page > 0 && cursor + row.height > config.content_bottom() {
                surface.new_page()?;
                pages += 1;
                cursor = self.draw_table_header(surface, config.content_top())?;
                rows_on_page = 0;
            }

            self.draw_row(surface, &row, cursor)?;
            cursor += row.height;
            rows_on_page += 1;
        }

        Ok(pages)
    }

    fn column_lefts(&self) -> [f64; 4] {
        let config = self.config;
        let time = config.content_left();
        let title = time + config.time_column_width;
        let vibe = title + config.title_column_width();
        let duration = vibe + config.vibe_column_width;
        [time, title, vibe, duration]
    }

    fn body_line_height(&self) -> f64 {
        self.config.organizer_font_size * PT_TO_MM * self.config.organizer_line_factor
    }

    fn notes_line_height(&self) -> f64 {
        self.config.notes_font_size * PT_TO_MM * self.config.organizer_line_factor
    }

    /// Baseline of line `index` in a block starting at `top`.
    fn baseline(&self, top: f64, line_height: f64, size: f64, index: usize) -> f64 {
        top + self.config.cell_padding + line_height * index as f64 + size * PT_TO_MM * (1.0 - DESCENT_RATIO)
    }

    /// Draw the column headings at `top` and return the y below them.
    fn draw_table_header<S: DrawingSurface>(&self, surface: &mut S, top: f64) -> Result<f64> {
        let config = self.config;
        let [time, title, vibe, duration] = self.column_lefts();
        let y = self.baseline(top, self.body_line_height(), config.organizer_font_size, 0);

        surface.set_font(config.font_family, FontStyle::Bold);
        surface.set_font_size(config.organizer_font_size);
        for (label, x) in [("Time", time), ("Title", title), ("Vibe", vibe), ("Duration", duration)] {
            surface.draw_text(label, x + config.cell_padding, y)?;
        }

        let bottom = top + self.body_line_height() + 2.0 * config.cell_padding;
        surface.draw_line(
            config.content_left(),
            bottom,
            config.content_left() + config.content_width(),
            bottom,
        )?;
        Ok(bottom)
    }

    fn layout_row(&self, oracle: &dyn WidthOracle, entry: &ScheduledEntry) -> Result<TableRow> {
        let config = self.config;
        let title_style = if entry.is_break {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        };
        let body = FontSpec::new(config.font_family, title_style, config.organizer_font_size);
        let notes = FontSpec::new(config.font_family, FontStyle::Italic, config.notes_font_size);
        let plain = FontSpec::new(config.font_family, FontStyle::Normal, config.organizer_font_size);
        let inner = |width: f64| width - 2.0 * config.cell_padding;

        let title_lines = wrap_text(oracle, &entry.title, body, inner(config.title_column_width()))?;
        let note_lines = match &entry.notes {
            Some(text) => wrap_text(oracle, text, notes, inner(config.title_column_width()))?,
            None => Vec::new(),
        };
        let vibe_lines = wrap_text(oracle, &entry.vibe, plain, inner(config.vibe_column_width))?;

        let title_block = title_lines.len().max(1) as f64 * self.body_line_height()
            + note_lines.len() as f64 * self.notes_line_height();
        let vibe_block = vibe_lines.len().max(1) as f64 * self.body_line_height();
        let height = title_block.max(vibe_block) + 2.0 * config.cell_padding;

        Ok(TableRow {
            time: entry.time_range(),
            title_lines,
            note_lines,
            vibe_lines,
            duration: format_duration(entry.duration_minutes),
            is_break: entry.is_break,
            height,
        })
    }

    fn draw_row<S: DrawingSurface>(&self, surface: &mut S, row: &TableRow, top: f64) -> Result<()> {
        let config = self.config;
        let [time, title, vibe, duration] = self.column_lefts();
        let pad = config.cell_padding;
        let body = self.body_line_height();
        let size = config.organizer_font_size;

        surface.set_font(config.font_family, FontStyle::Normal);
        surface.set_font_size(size);
        surface.draw_text(&row.time, time + pad, self.baseline(top, body, size, 0))?;
        surface.draw_text(&row.duration, duration + pad, self.baseline(top, body, size, 0))?;
        for (i, line) in row.vibe_lines.iter().enumerate() {
            surface.draw_text(line, vibe + pad, self.baseline(top, body, size, i))?;
        }

        let title_style = if row.is_break {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        };
        surface.set_font(config.font_family, title_style);
        for (i, line) in row.title_lines.iter().enumerate() {
            surface.draw_text(line, title + pad, self.baseline(top, body, size, i))?;
        }

        if !row.note_lines.is_empty() {
            let notes_top = top + row.title_lines.len() as f64 * body;
            surface.set_font(config.font_family, FontStyle::Italic);
            surface.set_font_size(config.notes_font_size);
            for (i, line) in row.note_lines.iter().enumerate() {
                let y = self.baseline(notes_top, self.notes_line_height(), config.notes_font_size, i);
                surface.draw_text(line, title + pad, y)?;
            }
        }

        let bottom = top + row.height;
        surface.draw_line(
            config.content_left(),
            bottom,
            config.content_left() + config.content_width(),
            bottom,
        )
    }
}
