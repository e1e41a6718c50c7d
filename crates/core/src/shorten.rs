//! Progressive shortening of titles that overflow their column.
//!
//! Stages run from gentle to aggressive and the first one whose result fits
//! wins:
//!
//! 1. vowel removal inside long words ("Wonderful" -> "Wndrfl")
//! 2. morpheme substitution ("without" -> "w/o")
//! 3. morpheme substitution followed by vowel removal
//! 4. shape-preserving truncation against a character budget
//!
//! Stages 1-3 each start from the transliterated original and are checked
//! with the width oracle. Stage 4 allocates characters instead of measuring
//! and is always accepted.

use regex::{Captures, Regex};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::metrics::{FontSpec, WidthOracle};
use crate::transliterate::transliterate;
use crate::Result;

/// Fraction of the width budget an unchanged phrase may use.
pub const DEFAULT_TRIGGER_RATIO: f64 = 0.9;

/// Words of this many characters or fewer keep their vowels.
const MIN_VOWEL_STRIP_LEN: usize = 3;

/// Smallest per-word allowance during aggressive truncation.
const MIN_WORD_ALLOWANCE: usize = 2;

/// Whole-word abbreviations, matched case-insensitively.
const MORPHEMES: &[(&str, &str)] = &[
    ("and", "&"),
    ("with", "w/"),
    ("without", "w/o"),
    ("because", "bc"),
    ("you", "u"),
    ("your", "ur"),
    ("are", "r"),
    ("for", "4"),
    ("to", "2"),
    ("too", "2"),
    ("before", "b4"),
    ("tonight", "2nite"),
    ("tomorrow", "2moro"),
    ("forever", "4ever"),
    ("night", "nite"),
    ("through", "thru"),
    ("though", "tho"),
    ("love", "luv"),
    ("little", "lil"),
    ("something", "smth"),
    ("nothing", "nthg"),
    ("everything", "evthg"),
    ("featuring", "ft."),
    ("version", "ver."),
    ("medley", "mdly"),
    ("acoustic", "acst"),
];

static MORPHEME_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| MORPHEMES.iter().copied().collect());

/// One alternation over every dictionary word, longest first.
static MORPHEME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let mut words: Vec<&str> = MORPHEMES.iter().map(|(word, _)| *word).collect();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
});

/// The transformation that produced a displayed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShorteningStage {
    Identity,
    VowelRemoval,
    MorphemeSubstitution,
    VowelRemovalAfterMorpheme,
    AggressiveTruncation,
}

impl ShorteningStage {
    /// All stages in the order they are tried.
    pub const ORDER: [ShorteningStage; 5] = [
        Self::Identity,
        Self::VowelRemoval,
        Self::MorphemeSubstitution,
        Self::VowelRemovalAfterMorpheme,
        Self::AggressiveTruncation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::VowelRemoval => "vowel-removal",
            Self::MorphemeSubstitution => "morpheme-substitution",
            Self::VowelRemovalAfterMorpheme => "vowel-removal-after-morpheme",
            Self::AggressiveTruncation => "aggressive-truncation",
        }
    }
}

impl fmt::Display for ShorteningStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of shortening: the original is kept next to what gets drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortened {
    /// Transliterated input.
    pub original: String,
    /// Text to draw.
    pub display: String,
    /// Stage that produced `display`.
    pub stage: ShorteningStage,
}

impl Shortened {
    fn unchanged(original: String) -> Self {
        Self {
            display: original.clone(),
            original,
            stage: ShorteningStage::Identity,
        }
    }

    pub fn was_shortened(&self) -> bool {
        self.stage != ShorteningStage::Identity
    }
}

/// A single stage evaluation, reported to the [`ShorteningTrace`].
#[derive(Debug, Clone, PartialEq)]
pub struct StageEvent {
    pub stage: ShorteningStage,
    pub candidate: String,
    /// Measured width, `None` when the stage does not measure.
    pub width: Option<f64>,
    /// Width the candidate had to stay within.
    pub budget: f64,
    pub accepted: bool,
}

/// Receives one event per evaluated stage.
pub trait ShorteningTrace {
    fn stage_evaluated(&self, event: &StageEvent);
}

/// Forwards stage events to `log::debug!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl ShorteningTrace for LogTrace {
    fn stage_evaluated(&self, event: &StageEvent) {
        match event.width {
            Some(width) => log::debug!(
                "shorten [{}] {:?}: {:.1}mm of {:.1}mm, {}",
                event.stage,
                event.candidate,
                width,
                event.budget,
                if event.accepted { "accepted" } else { "rejected" }
            ),
            None => log::debug!(
                "shorten [{}] {:?}: unmeasured, {}",
                event.stage,
                event.candidate,
                if event.accepted { "accepted" } else { "rejected" }
            ),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    events: RefCell<Vec<StageEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far, oldest first.
    pub fn events(&self) -> Vec<StageEvent> {
        self.events.borrow().clone()
    }

    /// Stage of the most recently accepted event.
    pub fn selected_stage(&self) -> Option<ShorteningStage> {
        self.events
            .borrow()
            .iter()
            .rev()
            .find(|e| e.accepted)
            .map(|e| e.stage)
    }

    /// Stages evaluated so far, in order.
    pub fn stages(&self) -> Vec<ShorteningStage> {
        self.events.borrow().iter().map(|e| e.stage).collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl ShorteningTrace for RecordingTrace {
    fn stage_evaluated(&self, event: &StageEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Fits phrases into a width budget by trying increasingly lossy stages.
pub struct ProgressiveShortener<'a> {
    oracle: &'a dyn WidthOracle,
    trace: &'a dyn ShorteningTrace,
    trigger_ratio: f64,
}

impl<'a> ProgressiveShortener<'a> {
    /// Create a shortener that logs its decisions.
    pub fn new(oracle: &'a dyn WidthOracle) -> Self {
        Self {
            oracle,
            trace: &LogTrace,
            trigger_ratio: DEFAULT_TRIGGER_RATIO,
        }
    }

    /// Report stage decisions to `trace` instead of the log.
    pub fn with_trace(mut self, trace: &'a dyn ShorteningTrace) -> Self {
        self.trace = trace;
        self
    }

    /// Change the fraction of the budget an unchanged phrase may use.
    pub fn with_trigger_ratio(mut self, ratio: f64) -> Self {
        self.trigger_ratio = ratio;
        self
    }

    /// Shorten `phrase` until it fits `max_width` mm at `font`.
    ///
    /// Non-shortenable phrases (break labels) only get transliterated.
    pub fn shorten(
        &self,
        phrase: &str,
        max_width: f64,
        font: FontSpec,
        shortenable: bool,
    ) -> Result<Shortened> {
        let original = transliterate(phrase);

        if !shortenable || original.trim().is_empty() {
            self.report(ShorteningStage::Identity, &original, None, max_width, true);
            return Ok(Shortened::unchanged(original));
        }

        let threshold = max_width * self.trigger_ratio;
        let width = self.oracle.measure(&original, font)?;
        let fits = width <= threshold;
        self.report(ShorteningStage::Identity, &original, Some(width), threshold, fits);
        if fits {
            return Ok(Shortened::unchanged(original));
        }

        let substituted = substitute_morphemes(&original);
        let candidates = [
            (ShorteningStage::VowelRemoval, remove_vowels(&original)),
            (ShorteningStage::MorphemeSubstitution, substituted.clone()),
            (
                ShorteningStage::VowelRemovalAfterMorpheme,
                remove_vowels(&substituted),
            ),
        ];

        for (stage, candidate) in candidates {
            let width = self.oracle.measure(&candidate, font)?;
            let fits = width <= max_width;
            self.report(stage, &candidate, Some(width), max_width, fits);
            if fits {
                return Ok(Shortened {
                    original,
                    display: candidate,
                    stage,
                });
            }
        }

        let em = self.oracle.measure("M", font)?;
        let budget = if em > 0.0 {
            (max_width / em).floor().max(0.0) as usize
        } else {
            usize::MAX
        };
        let truncated = truncate_to_budget(&original, budget);
        self.report(
            ShorteningStage::AggressiveTruncation,
            &truncated,
            None,
            max_width,
            true,
        );

        Ok(Shortened {
            original,
            display: truncated,
            stage: ShorteningStage::AggressiveTruncation,
        })
    }

    fn report(
        &self,
        stage: ShorteningStage,
        candidate: &str,
        width: Option<f64>,
        budget: f64,
        accepted: bool,
    ) {
        self.trace.stage_evaluated(&StageEvent {
            stage,
            candidate: candidate.to_string(),
            width,
            budget,
            accepted,
        });
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Strip vowels from the interior of every word longer than three characters.
///
/// First and last characters always survive. When a word's interior is
/// nothing but vowels, its first interior character is kept.
pub fn remove_vowels(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(remove_word_vowels)
        .collect::<Vec<_>>()
        .join(" ")
}

fn remove_word_vowels(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= MIN_VOWEL_STRIP_LEN {
        return word.to_string();
    }

    let (first, last) = (chars[0], chars[chars.len() - 1]);
    let interior = &chars[1..chars.len() - 1];
    let mut kept: String = interior.iter().filter(|c| !is_vowel(**c)).collect();
    if kept.is_empty() && interior.len() > 1 {
        kept.push(interior[0]);
    }

    let mut out = String::with_capacity(word.len());
    out.push(first);
    out.push_str(&kept);
    out.push(last);
    out
}

/// Replace dictionary words with their abbreviations.
pub fn substitute_morphemes(phrase: &str) -> String {
    MORPHEME_REGEX
        .replace_all(phrase, |caps: &Captures| {
            let word = caps[0].to_lowercase();
            MORPHEME_TABLE
                .get(word.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Shorten a word to `allowance` characters, keeping its first and last.
pub fn truncate_word(word: &str, allowance: usize) -> String {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= allowance {
        return word.to_string();
    }

    let first = chars[0];
    let last = chars[chars.len() - 1];
    match allowance {
        0 | 1 => first.to_string(),
        2 => [first, last].iter().collect(),
        _ => {
            let mut out: String = chars[..allowance - 1].iter().collect();
            out.push(last);
            out
        }
    }
}

/// Spread `char_budget` characters (spaces included) over the words of
/// `phrase`, truncating each one with [`truncate_word`].
///
/// Each word may use its fair share of what is left, but never less than
/// two characters. Once the budget is spent the remaining words are
/// dropped. The first word is always kept, reduced to its initial when
/// there is no budget at all.
pub fn truncate_to_budget(phrase: &str, char_budget: usize) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let mut remaining = char_budget;
    let mut kept = Vec::with_capacity(words.len());

    for (i, word) in words.iter().enumerate() {
        if remaining == 0 && i > 0 {
            break;
        }

        let allowance = if remaining == 0 {
            1
        } else {
            (remaining / (words.len() - i)).max(MIN_WORD_ALLOWANCE)
        };
        let truncated = truncate_word(word, allowance);
        remaining = remaining.saturating_sub(truncated.chars().count() + 1);
        kept.push(truncated);
    }

    kept.join(" ")
}
