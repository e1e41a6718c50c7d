//! Setlist fitting and layout: transliteration, width measurement,
//! progressive shortening, font-size search and page composition for a
//! large-print stage view plus an organizer table.

pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod schedule;
pub mod shorten;
pub mod sizing;
pub mod surface;
pub mod transliterate;
pub mod types;

#[cfg(test)]
mod testing;

pub use compose::{CompositionSummary, FittedEntry, PageComposer};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use export::{export_setlist, setlist_filename, ExportOptions, ExportReport};
pub use metrics::{BuiltinMetrics, FontFamily, FontSpec, FontStyle, WidthOracle, PT_TO_MM};
pub use schedule::{Schedule, ScheduledEntry};
pub use shorten::{
    LogTrace, ProgressiveShortener, RecordingTrace, Shortened, ShorteningStage, ShorteningTrace,
    StageEvent,
};
pub use sizing::{plan_font_sizes, FontSizePlan, LayoutMode};
pub use surface::DrawingSurface;
pub use transliterate::transliterate;
pub use types::{Setlist, SetlistEntry, SongCatalog, SongMetadata};
