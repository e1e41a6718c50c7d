//! Running order with resolved durations, vibes and start/end times.
//!
//! The catalog is passed in explicitly and matched by the raw setlist title.
//! Everything that ends up on the page is transliterated here.

use crate::transliterate::transliterate;
use crate::types::{
    SetlistEntry, Setlist, SongCatalog, BREAK_MINUTES, DEFAULT_SONG_MINUTES, DEFAULT_VIBE,
};

/// Text shown in the vibe column for breaks.
const BREAK_VIBE: &str = "Break";

/// One row of the organizer view.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEntry {
    pub is_break: bool,
    /// Transliterated title or break label.
    pub title: String,
    /// Transliterated notes, songs only.
    pub notes: Option<String>,
    /// Transliterated vibe.
    pub vibe: String,
    pub duration_minutes: f64,
    /// Minutes since the start of the show.
    pub start_minutes: f64,
    pub end_minutes: f64,
}

impl ScheduledEntry {
    /// "0:00 - 0:03" style range.
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            format_clock(self.start_minutes),
            format_clock(self.end_minutes)
        )
    }
}

/// The whole running order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    entries: Vec<ScheduledEntry>,
}

impl Schedule {
    /// Resolve every entry against `catalog` and accumulate the clock.
    pub fn build(setlist: &Setlist, catalog: Option<&SongCatalog>) -> Self {
        let mut clock = 0.0;
        let mut entries = Vec::with_capacity(setlist.len());

        for entry in setlist.entries() {
            let duration = resolve_duration(entry, catalog);
            let (notes, vibe) = match entry {
                SetlistEntry::Song { notes, .. } => (
                    notes
                        .as_deref()
                        .filter(|n| !n.trim().is_empty())
                        .map(transliterate),
                    transliterate(resolve_vibe(entry, catalog)),
                ),
                SetlistEntry::Break { .. } => (None, BREAK_VIBE.to_string()),
            };

            entries.push(ScheduledEntry {
                is_break: entry.is_break(),
                title: transliterate(entry.text()),
                notes,
                vibe,
                duration_minutes: duration,
                start_minutes: clock,
                end_minutes: clock + duration,
            });
            clock += duration;
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduledEntry] {
        &self.entries
    }

    /// Length of the whole show in minutes.
    pub fn total_minutes(&self) -> f64 {
        self.entries.last().map(|e| e.end_minutes).unwrap_or(0.0)
    }

    pub fn song_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_break).count()
    }
}

fn valid_minutes(minutes: Option<f64>) -> Option<f64> {
    minutes.filter(|m| m.is_finite() && *m >= 0.0)
}

/// Duration of `entry`: breaks are fixed; songs prefer the catalog, then
/// their own duration, then the default.
pub fn resolve_duration(entry: &SetlistEntry, catalog: Option<&SongCatalog>) -> f64 {
    match entry {
        SetlistEntry::Break { .. } => BREAK_MINUTES,
        SetlistEntry::Song {
            title,
            duration_minutes,
            ..
        } => valid_minutes(catalog.and_then(|c| c.lookup(title)).and_then(|m| m.duration))
            .or_else(|| valid_minutes(*duration_minutes))
            .unwrap_or(DEFAULT_SONG_MINUTES),
    }
}

/// Vibe of a song from the catalog, or the default.
pub fn resolve_vibe<'a>(entry: &SetlistEntry, catalog: Option<&'a SongCatalog>) -> &'a str {
    match entry {
        SetlistEntry::Song { title, .. } => catalog
            .and_then(|c| c.lookup(title))
            .map(|m| m.vibe_or_default())
            .unwrap_or(DEFAULT_VIBE),
        SetlistEntry::Break { .. } => BREAK_VIBE,
    }
}

/// Format minutes since show start as `h:mm`, rounded to the minute.
pub fn format_clock(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Format a duration as "3 min" or "3.5 min".
pub fn format_duration(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{} min", minutes as u64)
    } else {
        format!("{:.1} min", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SongMetadata;

    #[test]
    fn test_clock_accumulates_in_order() {
        let setlist = Setlist::new()
            .with_entry(SetlistEntry::song("Opener"))
            .with_entry(SetlistEntry::break_marker("Tuning"))
            .with_entry(SetlistEntry::song("Closer"));
        let catalog = SongCatalog::new(vec![SongMetadata::new("Closer").with_duration(5.0)]);

        let schedule = Schedule::build(&setlist, Some(&catalog));
        let times: Vec<(f64, f64)> = schedule
            .entries()
            .iter()
            .map(|e| (e.start_minutes, e.end_minutes))
            .collect();

        assert_eq!(times, vec![(0.0, 3.0), (3.0, 4.0), (4.0, 9.0)]);
        assert_eq!(schedule.total_minutes(), 9.0);
        assert_eq!(schedule.song_count(), 2);
    }

    #[test]
    fn test_missing_catalog_entry_uses_defaults() {
        let entry = SetlistEntry::song("Unknown Song");
        let catalog = SongCatalog::new(vec![SongMetadata::new("Other").with_vibe("Ballad")]);

        assert_eq!(resolve_duration(&entry, Some(&catalog)), DEFAULT_SONG_MINUTES);
        assert_eq!(resolve_vibe(&entry, Some(&catalog)), DEFAULT_VIBE);
        assert_eq!(resolve_duration(&entry, None), DEFAULT_SONG_MINUTES);
    }

    #[test]
    fn test_entry_duration_used_without_catalog_match() {
        let entry = SetlistEntry::Song {
            title: "Long Jam".to_string(),
            duration_minutes: Some(12.0),
            notes: None,
        };
        assert_eq!(resolve_duration(&entry, None), 12.0);

        let catalog = SongCatalog::new(vec![SongMetadata::new("Long Jam").with_duration(9.0)]);
        assert_eq!(resolve_duration(&entry, Some(&catalog)), 9.0);
    }

    #[test]
    fn test_invalid_durations_are_ignored() {
        let entry = SetlistEntry::Song {
            title: "Broken".to_string(),
            duration_minutes: Some(-4.0),
            notes: None,
        };
        assert_eq!(resolve_duration(&entry, None), DEFAULT_SONG_MINUTES);
    }

    #[test]
    fn test_breaks_last_one_minute() {
        let entry = SetlistEntry::break_marker("Intermission");
        let catalog = SongCatalog::new(vec![SongMetadata::new("Intermission").with_duration(15.0)]);
        assert_eq!(resolve_duration(&entry, Some(&catalog)), BREAK_MINUTES);
    }

    #[test]
    fn test_lookup_uses_raw_title_but_display_is_transliterated() {
        let setlist = Setlist::new().with_entry(SetlistEntry::song("Café Society"));
        let catalog = SongCatalog::new(vec![SongMetadata::new("Café Society")
            .with_vibe("Jazzy Señor")
            .with_duration(4.0)]);

        let schedule = Schedule::build(&setlist, Some(&catalog));
        let entry = &schedule.entries()[0];
        assert_eq!(entry.title, "Cafe Society");
        assert_eq!(entry.vibe, "Jazzy Senor");
        assert_eq!(entry.duration_minutes, 4.0);

        // A transliterated catalog name no longer matches the accented title.
        let ascii_catalog = SongCatalog::new(vec![SongMetadata::new("Cafe Society").with_duration(4.0)]);
        let schedule = Schedule::build(&setlist, Some(&ascii_catalog));
        assert_eq!(schedule.entries()[0].duration_minutes, DEFAULT_SONG_MINUTES);
    }

    #[test]
    fn test_notes_are_kept_for_songs() {
        let setlist = Setlist::new().with_entry(SetlistEntry::Song {
            title: "Hey Jude".to_string(),
            duration_minutes: None,
            notes: Some("Key of F – capo 1".to_string()),
        });
        let schedule = Schedule::build(&setlist, None);
        assert_eq!(schedule.entries()[0].notes.as_deref(), Some("Key of F - capo 1"));
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(3.0), "0:03");
        assert_eq!(format_clock(75.0), "1:15");
        assert_eq!(format_clock(125.4), "2:05");
    }

    #[test]
    fn test_time_range_and_duration() {
        let setlist = Setlist::new().with_entry(SetlistEntry::song("Opener"));
        let schedule = Schedule::build(&setlist, None);
        assert_eq!(schedule.entries()[0].time_range(), "0:00 - 0:03");
        assert_eq!(format_duration(3.0), "3 min");
        assert_eq!(format_duration(3.5), "3.5 min");
    }

    #[test]
    fn test_empty_setlist() {
        let schedule = Schedule::build(&Setlist::new(), None);
        assert!(schedule.entries().is_empty());
        assert_eq!(schedule.total_minutes(), 0.0);
    }
}
