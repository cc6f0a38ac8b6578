use crate::error::AlignmentError;
use crate::transcript::SentenceSpan;
use crate::types::Tier;

/// Splits a word tier into sentence spans.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, words: &Tier) -> Result<Vec<SentenceSpan>, AlignmentError>;
}

/// Decides which labels are dropped from word and phoneme tiers.
pub trait LabelFilter: Send + Sync {
    fn is_stop_label(&self, label: &str) -> bool;
}
