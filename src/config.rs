use std::path::Path;

use serde::Deserialize;

use crate::error::PipelineError;

/// Which tiers of a TextGrid hold phonemes and words.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierRoles {
    /// Zero-based tier positions. Alignment refuses to run when the tier
    /// names clearly contradict the positions (e.g. tier 0 named "words").
    ByPosition { phonemes: usize, words: usize },
    /// Tier names, compared ASCII-case-insensitively.
    ByName { phonemes: String, words: String },
}

impl Default for TierRoles {
    fn default() -> Self {
        Self::ByPosition {
            phonemes: 0,
            words: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Exact word-tier label separating sentences.
    pub silence_marker: String,
    /// Labels dropped from word and phoneme tiers after brace stripping and
    /// ASCII lowercasing.
    pub stop_labels: Vec<String>,
    pub tier_roles: TierRoles,
}

impl TranscriptConfig {
    pub const DEFAULT_SILENCE_MARKER: &'static str = "sp";
    pub const DEFAULT_STOP_LABELS: [&'static str; 8] =
        ["sentence_start", "sentence_end", "br", "lg", "ls", "ns", "sp", ""];

    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io("read transcript config", path, e))?;
        serde_json::from_str(&data)
            .map_err(|e| PipelineError::json("parse transcript config", path, e))
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            silence_marker: Self::DEFAULT_SILENCE_MARKER.to_string(),
            stop_labels: Self::DEFAULT_STOP_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            tier_roles: TierRoles::default(),
        }
    }
}
