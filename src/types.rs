use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TierType {
    IntervalTier,
    TextTier,
}

impl TierType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IntervalTier => "IntervalTier",
            Self::TextTier => "TextTier",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "IntervalTier" => Some(Self::IntervalTier),
            "TextTier" => Some(Self::TextTier),
            _ => None,
        }
    }
}

impl fmt::Display for TierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labeled span `[xmin, xmax)` in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval {
    pub xmin: f64,
    pub xmax: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub time: f64,
    pub mark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    pub name: String,
    pub tier_type: TierType,
    pub xmin: f64,
    pub xmax: f64,
    /// Entry count as declared in the file; `None` for chronological files.
    pub size: Option<usize>,
    /// Populated for interval tiers, in source order.
    pub intervals: Vec<Interval>,
    /// Populated for point tiers, in source order.
    pub points: Vec<Point>,
}

impl Tier {
    pub fn entry_count(&self) -> usize {
        match self.tier_type {
            TierType::IntervalTier => self.intervals.len(),
            TierType::TextTier => self.points.len(),
        }
    }

    /// Total duration of interval entries carrying speech. Labels that are
    /// blank or start with `.` count as non-speech; point tiers have none.
    pub fn speech_duration(&self) -> f64 {
        self.intervals
            .iter()
            .filter(|interval| {
                let text = interval.text.trim();
                !text.is_empty() && !text.starts_with('.')
            })
            .map(|interval| interval.xmax - interval.xmin)
            .sum()
    }

    pub(crate) fn summary(&self, grid_duration: f64) -> TierSummary<'_> {
        TierSummary {
            tier: self,
            grid_duration,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.summary(self.xmax - self.xmin), f)
    }
}

/// `<Class "name" (xmin, xmax) pct%>` with speech time relative to a grid.
pub(crate) struct TierSummary<'a> {
    tier: &'a Tier,
    grid_duration: f64,
}

impl fmt::Display for TierSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = if self.grid_duration > 0.0 {
            100.0 * self.tier.speech_duration() / self.grid_duration
        } else {
            0.0
        };
        write!(
            f,
            "<{} \"{}\" ({:.2}, {:.2}) {:.2}%>",
            self.tier.tier_type, self.tier.name, self.tier.xmin, self.tier.xmax, pct
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Long `ooTextFile` with `key = value` lines.
    OoText,
    /// Short `ooTextFile` with bare values, one per line.
    ShortOoText,
    Chronological,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OoText => "ooTextFile",
            Self::ShortOoText => "short ooTextFile",
            Self::Chronological => "chronological",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGrid {
    pub dialect: Dialect,
    pub xmin: f64,
    pub xmax: f64,
    pub tiers: Vec<Tier>,
}

impl TextGrid {
    pub fn duration(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn size(&self) -> usize {
        self.tiers.len()
    }

    pub fn tier_by_name(&self, name: &str) -> Option<&Tier> {
        self.tiers
            .iter()
            .find(|tier| tier.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tier> {
        self.tiers.iter()
    }
}

impl<'a> IntoIterator for &'a TextGrid {
    type Item = &'a Tier;
    type IntoIter = std::slice::Iter<'a, Tier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tiers.iter()
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TextGrid ({}) ({:.2}, {:.2}) {} tier(s)",
            self.dialect,
            self.xmin,
            self.xmax,
            self.tiers.len()
        )?;
        for tier in &self.tiers {
            write!(f, "\n  {}", tier.summary(self.duration()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Sentence span between two silence markers.
    Sound,
    Word,
    Phoneme,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sound => "sound",
            Self::Word => "word",
            Self::Phoneme => "phoneme",
        }
    }
}

/// One row of the aligned event table. Fields that do not apply to a row's
/// granularity are `None` (a sentence row has no word, a word row has no
/// phoneme).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub start: f64,
    pub stop: f64,
    pub duration: f64,
    pub kind: EventKind,
    pub word: Option<String>,
    pub word_id: Option<usize>,
    /// 1-based rank of the word within its sentence.
    pub word_index: Option<usize>,
    pub phoneme: Option<String>,
    pub phoneme_id: Option<usize>,
    /// 1-based rank of the phoneme within its word.
    pub phoneme_index: Option<usize>,
    pub sequence_id: usize,
    pub word_sequence: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct EventTable {
    events: Vec<Event>,
}

impl EventTable {
    pub const COLUMNS: [&'static str; 12] = [
        "start",
        "stop",
        "duration",
        "kind",
        "word",
        "word_id",
        "word_index",
        "phoneme",
        "phoneme_id",
        "phoneme_index",
        "sequence_id",
        "word_sequence",
    ];

    pub(crate) fn from_sorted(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |event| event.kind == kind)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl<'a> IntoIterator for &'a EventTable {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(xmin: f64, xmax: f64, text: &str) -> Interval {
        Interval {
            xmin,
            xmax,
            text: text.to_string(),
        }
    }

    #[test]
    fn speech_duration_skips_blank_and_dot_labels() {
        let tier = Tier {
            name: "words".to_string(),
            tier_type: TierType::IntervalTier,
            xmin: 0.0,
            xmax: 4.0,
            size: Some(4),
            intervals: vec![
                interval(0.0, 1.0, ""),
                interval(1.0, 2.0, "hello"),
                interval(2.0, 2.5, ".breath"),
                interval(2.5, 4.0, " world "),
            ],
            points: Vec::new(),
        };
        assert!((tier.speech_duration() - 2.5).abs() < 1e-9);
        assert_eq!(tier.to_string(), "<IntervalTier \"words\" (0.00, 4.00) 62.50%>");
    }

    #[test]
    fn tier_type_from_class_is_exact() {
        assert_eq!(TierType::from_class("IntervalTier"), Some(TierType::IntervalTier));
        assert_eq!(TierType::from_class("TextTier"), Some(TierType::TextTier));
        assert_eq!(TierType::from_class("intervaltier"), None);
    }

    #[test]
    fn tier_lookup_ignores_ascii_case() {
        let grid = TextGrid {
            dialect: Dialect::OoText,
            xmin: 0.0,
            xmax: 1.0,
            tiers: vec![Tier {
                name: "Words".to_string(),
                tier_type: TierType::IntervalTier,
                xmin: 0.0,
                xmax: 1.0,
                size: Some(0),
                intervals: Vec::new(),
                points: Vec::new(),
            }],
        };
        assert!(grid.tier_by_name("words").is_some());
        assert!(grid.tier_by_name("phones").is_none());
        assert_eq!((&grid).into_iter().count(), 1);
    }
}
