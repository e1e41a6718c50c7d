//! One-shot export: plan, compose and save a setlist document.

use std::path::{Path, PathBuf};

use crate::compose::{CompositionSummary, PageComposer};
use crate::config::LayoutConfig;
use crate::sizing::{plan_font_sizes, FontSizePlan};
use crate::surface::DrawingSurface;
use crate::types::{Setlist, SongCatalog};
use crate::Result;

/// Where and how to write an export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// Already formatted date, e.g. "10/18/2026".
    pub date_label: String,
    pub config: LayoutConfig,
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>, date_label: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            date_label: date_label.into(),
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Full path of the file this export writes.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(setlist_filename(&self.date_label, extension))
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub plan: FontSizePlan,
    pub summary: CompositionSummary,
}

/// File name for a setlist dated `date_label`. Slashes become dashes.
pub fn setlist_filename(date_label: &str, extension: &str) -> String {
    let label: String = date_label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect();
    format!("setlist-{}.{}", label, extension)
}

/// Render `setlist` onto `surface` and save it under `options.output_dir`.
///
/// An empty setlist is a no-op and yields `Ok(None)`; nothing is written.
pub fn export_setlist<S: DrawingSurface>(
    mut surface: S,
    setlist: &Setlist,
    catalog: Option<&SongCatalog>,
    options: &ExportOptions,
) -> Result<Option<ExportReport>> {
    if setlist.is_empty() {
        log::warn!("setlist is empty, nothing to export");
        return Ok(None);
    }

    options.config.validate()?;
    let plan = plan_font_sizes(setlist, &options.config);
    let summary = PageComposer::new(&options.config)
        .with_date_label(options.date_label.as_str())
        .compose(&mut surface, setlist, catalog, &plan)?;

    let path = options.output_path(surface.file_extension());
    ensure_dir(&options.output_dir)?;
    surface.save_as(&path)?;
    log::info!(
        "exported {} entries over {} page(s) to {}",
        setlist.len(),
        summary.total_pages(),
        path.display()
    );

    Ok(Some(ExportReport {
        path,
        plan,
        summary,
    }))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
