//! Domain types for setlists and the song catalog.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Duration assumed for a song that neither the entry nor the catalog times.
pub const DEFAULT_SONG_MINUTES: f64 = 3.0;

/// Every break lasts exactly this long.
pub const BREAK_MINUTES: f64 = 1.0;

/// Vibe shown for songs without a catalog entry.
pub const DEFAULT_VIBE: &str = "Standard";

/// One item of a setlist, in performance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SetlistEntry {
    /// A song. Only songs are ever shortened on the stage view.
    Song {
        title: String,
        #[serde(
            default,
            rename = "durationMinutes",
            alias = "duration",
            skip_serializing_if = "Option::is_none"
        )]
        duration_minutes: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    /// A non-song item such as an intermission announcement.
    Break { label: String },
}

impl SetlistEntry {
    /// Create a song entry without duration or notes.
    pub fn song(title: impl Into<String>) -> Self {
        Self::Song {
            title: title.into(),
            duration_minutes: None,
            notes: None,
        }
    }

    /// Create a break entry.
    pub fn break_marker(label: impl Into<String>) -> Self {
        Self::Break {
            label: label.into(),
        }
    }

    pub fn is_song(&self) -> bool {
        matches!(self, Self::Song { .. })
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break { .. })
    }

    /// The raw text shown for this entry (title or label).
    pub fn text(&self) -> &str {
        match self {
            Self::Song { title, .. } => title,
            Self::Break { label } => label,
        }
    }
}

/// An ordered setlist. Order determines start and end times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Setlist {
    entries: Vec<SetlistEntry>,
}

impl Setlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Append an entry.
    pub fn push(&mut self, entry: SetlistEntry) {
        self.entries.push(entry);
    }

    /// Builder-style [`Setlist::push`].
    pub fn with_entry(mut self, entry: SetlistEntry) -> Self {
        self.push(entry);
        self
    }

    pub fn entries(&self) -> &[SetlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of song entries (breaks excluded).
    pub fn song_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_song()).count()
    }
}

impl FromIterator<SetlistEntry> for Setlist {
    fn from_iter<I: IntoIterator<Item = SetlistEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Catalog metadata for one song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongMetadata {
    /// Song name, compared verbatim against setlist titles.
    pub name: String,

    /// Duration in minutes.
    #[serde(default, alias = "durationMinutes", skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Free-form mood or type ("Ballad", "Upbeat", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
}

impl SongMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: None,
            vibe: None,
        }
    }

    pub fn with_duration(mut self, minutes: f64) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_vibe(mut self, vibe: impl Into<String>) -> Self {
        self.vibe = Some(vibe.into());
        self
    }

    /// The vibe, or [`DEFAULT_VIBE`] when the catalog leaves it blank.
    pub fn vibe_or_default(&self) -> &str {
        match self.vibe.as_deref() {
            Some(vibe) if !vibe.trim().is_empty() => vibe,
            _ => DEFAULT_VIBE,
        }
    }
}

/// The external song catalog, owned by the caller and passed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongCatalog {
    songs: Vec<SongMetadata>,
}

impl SongCatalog {
    pub fn new(songs: Vec<SongMetadata>) -> Self {
        Self { songs }
    }

    /// Parse a JSON array of `{name, duration, vibe}` objects.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a song by exact, case-sensitive name.
    ///
    /// The raw setlist title is the key; no transliteration is applied to
    /// either side.
    pub fn lookup(&self, title: &str) -> Option<&SongMetadata> {
        self.songs.iter().find(|song| song.name == title)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
