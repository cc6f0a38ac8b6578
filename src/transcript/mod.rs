use std::collections::HashMap;

use crate::config::TierRoles;
use crate::error::AlignmentError;
use crate::types::{Event, EventKind, EventTable, Interval, TextGrid, Tier, TierType};

pub mod join;
pub mod labels;
pub mod sentences;

pub use labels::{normalize_label, StopLabels};
pub use sentences::{infer_sentences, SentenceSpan};

/// Word that survived stop-label filtering, borrowing its source interval.
#[derive(Debug, Clone, Copy)]
struct AlignedWord<'a> {
    interval: &'a Interval,
    word_id: usize,
    sequence_id: usize,
    word_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct AlignedPhoneme<'a> {
    interval: &'a Interval,
    phoneme_id: usize,
    /// Position in the surviving-word list, which equals the word's id.
    word: usize,
    phoneme_index: usize,
}

/// Picks the phoneme and word tiers of `grid` according to `roles`.
pub fn select_tiers<'g>(
    grid: &'g TextGrid,
    roles: &TierRoles,
) -> Result<(&'g Tier, &'g Tier), AlignmentError> {
    let (phonemes, words) = match roles {
        TierRoles::ByPosition { phonemes, words } => {
            let phoneme_tier = tier_at(grid, *phonemes, "phoneme")?;
            let word_tier = tier_at(grid, *words, "word")?;
            check_role_hint(*phonemes, phoneme_tier, TierRole::Phoneme)?;
            check_role_hint(*words, word_tier, TierRole::Word)?;
            (phoneme_tier, word_tier)
        }
        TierRoles::ByName { phonemes, words } => (
            tier_named(grid, phonemes, "phoneme")?,
            tier_named(grid, words, "word")?,
        ),
    };
    require_intervals(phonemes, "phoneme")?;
    require_intervals(words, "word")?;
    Ok((phonemes, words))
}

fn tier_at<'g>(grid: &'g TextGrid, index: usize, role: &'static str) -> Result<&'g Tier, AlignmentError> {
    grid.tiers.get(index).ok_or_else(|| {
        AlignmentError::missing_tier(
            role,
            format!("grid has {} tier(s), no tier at position {index}", grid.tiers.len()),
        )
    })
}

fn tier_named<'g>(grid: &'g TextGrid, name: &str, role: &'static str) -> Result<&'g Tier, AlignmentError> {
    grid.tier_by_name(name)
        .ok_or_else(|| AlignmentError::missing_tier(role, format!("no tier named '{name}'")))
}

fn require_intervals(tier: &Tier, role: &'static str) -> Result<(), AlignmentError> {
    match tier.tier_type {
        TierType::IntervalTier => Ok(()),
        TierType::TextTier => Err(AlignmentError::NotIntervalTier {
            role,
            name: tier.name.clone(),
            class: tier.tier_type.as_str(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierRole {
    Phoneme,
    Word,
}

impl TierRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::Phoneme => "phoneme",
            Self::Word => "word",
        }
    }

    /// Role suggested by a tier name such as `phones` or `spk1 - words`.
    fn from_name(name: &str) -> Option<Self> {
        let last = name
            .rsplit(|c: char| !c.is_ascii_alphanumeric())
            .find(|part| !part.is_empty())?
            .to_ascii_lowercase();
        match last.as_str() {
            "phone" | "phones" | "phoneme" | "phonemes" => Some(Self::Phoneme),
            "word" | "words" => Some(Self::Word),
            _ => None,
        }
    }
}

fn check_role_hint(index: usize, tier: &Tier, expected: TierRole) -> Result<(), AlignmentError> {
    match TierRole::from_name(&tier.name) {
        Some(found) if found != expected => Err(AlignmentError::TierRoleMismatch {
            index,
            name: tier.name.clone(),
            role: expected.as_str(),
            found: found.as_str(),
        }),
        _ => Ok(()),
    }
}

/// Fuses a phoneme tier and a word tier into one event table.
///
/// Words attach to the sentence with the greatest start at or before their
/// own start; phonemes attach to words the same way. Sentences whose span
/// holds no word are left out of the table, keeping their sequence id unused.
pub fn align_transcript(
    phonemes: &Tier,
    words: &Tier,
    sentences: &[SentenceSpan],
    is_stop_label: impl Fn(&str) -> bool,
) -> Result<EventTable, AlignmentError> {
    require_sorted(words)?;
    require_sorted(phonemes)?;
    if let Some(index) = join::first_unsorted(sentences.iter().map(|s| s.start)) {
        return Err(AlignmentError::UnsortedTier {
            tier: words.name.clone(),
            index,
        });
    }

    let kept_words = words
        .intervals
        .iter()
        .filter(|word| !is_stop_label(&word.text))
        .collect::<Vec<_>>();
    let sentence_starts = sentences.iter().map(|s| s.start).collect::<Vec<_>>();
    let word_starts = kept_words.iter().map(|w| w.xmin).collect::<Vec<_>>();
    let word_sentences = join::backward_nearest(&sentence_starts, &word_starts)
        .into_iter()
        .zip(&kept_words)
        .map(|(sentence, word)| {
            sentence
                .map(|i| sentences[i].sequence_id)
                .ok_or_else(|| AlignmentError::unmatched("word", &word.text, word.xmin, "sentence"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let word_indices = join::rank_within_groups(&word_sentences, &word_starts);
    let aligned_words = kept_words
        .iter()
        .enumerate()
        .map(|(word_id, &interval)| AlignedWord {
            interval,
            word_id,
            sequence_id: word_sentences[word_id],
            word_index: word_indices[word_id],
        })
        .collect::<Vec<_>>();

    let kept_phonemes = phonemes
        .intervals
        .iter()
        .filter(|phoneme| !is_stop_label(&phoneme.text))
        .collect::<Vec<_>>();
    let phoneme_starts = kept_phonemes.iter().map(|p| p.xmin).collect::<Vec<_>>();
    let phoneme_words = join::backward_nearest(&word_starts, &phoneme_starts)
        .into_iter()
        .zip(&kept_phonemes)
        .map(|(word, phoneme)| {
            word.ok_or_else(|| {
                AlignmentError::unmatched("phoneme", &phoneme.text, phoneme.xmin, "word")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let phoneme_indices = join::rank_within_groups(&phoneme_words, &phoneme_starts);
    let aligned_phonemes = kept_phonemes
        .iter()
        .enumerate()
        .map(|(phoneme_id, &interval)| AlignedPhoneme {
            interval,
            phoneme_id,
            word: phoneme_words[phoneme_id],
            phoneme_index: phoneme_indices[phoneme_id],
        })
        .collect::<Vec<_>>();

    let word_sequences = sentence_texts(&aligned_words);
    let events = build_events(sentences, &aligned_words, &aligned_phonemes, &word_sequences);
    if !events.iter().any(|event| event.kind == EventKind::Sound) {
        return Err(AlignmentError::NoSentences {
            tier: words.name.clone(),
        });
    }

    tracing::debug!(
        sentences = word_sequences.len(),
        words = aligned_words.len(),
        phonemes = aligned_phonemes.len(),
        rows = events.len(),
        "transcript: aligned tiers"
    );
    Ok(EventTable::from_sorted(events))
}

fn require_sorted(tier: &Tier) -> Result<(), AlignmentError> {
    match join::first_unsorted(tier.intervals.iter().map(|i| i.xmin)) {
        Some(index) => Err(AlignmentError::UnsortedTier {
            tier: tier.name.clone(),
            index,
        }),
        None => Ok(()),
    }
}

/// Words of each sentence in `word_index` order, joined by single spaces.
fn sentence_texts(words: &[AlignedWord<'_>]) -> HashMap<usize, String> {
    let mut members: HashMap<usize, Vec<&AlignedWord<'_>>> = HashMap::new();
    for word in words {
        members.entry(word.sequence_id).or_default().push(word);
    }
    members
        .into_iter()
        .map(|(sequence_id, mut members)| {
            members.sort_by_key(|word| word.word_index);
            let text = members
                .iter()
                .map(|word| word.interval.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            (sequence_id, text)
        })
        .collect()
}

fn build_events(
    sentences: &[SentenceSpan],
    words: &[AlignedWord<'_>],
    phonemes: &[AlignedPhoneme<'_>],
    word_sequences: &HashMap<usize, String>,
) -> Vec<Event> {
    let mut events = Vec::with_capacity(sentences.len() + words.len() + phonemes.len());

    for sentence in sentences {
        let Some(text) = word_sequences.get(&sentence.sequence_id) else {
            continue;
        };
        events.push(Event {
            start: sentence.start,
            stop: sentence.stop,
            duration: sentence.stop - sentence.start,
            kind: EventKind::Sound,
            word: None,
            word_id: None,
            word_index: None,
            phoneme: None,
            phoneme_id: None,
            phoneme_index: None,
            sequence_id: sentence.sequence_id,
            word_sequence: text.clone(),
        });
    }

    for word in words {
        events.push(Event {
            start: word.interval.xmin,
            stop: word.interval.xmax,
            duration: word.interval.xmax - word.interval.xmin,
            kind: EventKind::Word,
            word: Some(word.interval.text.clone()),
            word_id: Some(word.word_id),
            word_index: Some(word.word_index),
            phoneme: None,
            phoneme_id: None,
            phoneme_index: None,
            sequence_id: word.sequence_id,
            word_sequence: word_sequences
                .get(&word.sequence_id)
                .cloned()
                .unwrap_or_default(),
        });
    }

    for phoneme in phonemes {
        let word = &words[phoneme.word];
        events.push(Event {
            start: phoneme.interval.xmin,
            stop: phoneme.interval.xmax,
            duration: phoneme.interval.xmax - phoneme.interval.xmin,
            kind: EventKind::Phoneme,
            word: Some(word.interval.text.clone()),
            word_id: Some(word.word_id),
            word_index: Some(word.word_index),
            phoneme: Some(phoneme.interval.text.clone()),
            phoneme_id: Some(phoneme.phoneme_id),
            phoneme_index: Some(phoneme.phoneme_index),
            sequence_id: word.sequence_id,
            word_sequence: word_sequences
                .get(&word.sequence_id)
                .cloned()
                .unwrap_or_default(),
        });
    }

    // Stable: at equal starts, sentence rows precede word rows precede phonemes.
    events.sort_by(|a, b| a.start.total_cmp(&b.start));
    events
}
