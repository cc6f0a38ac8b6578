use std::path::Path;

use crate::config::TierRoles;
use crate::error::{AlignmentError, PipelineError, TextGridError};
use crate::grid::parse_textgrid;
use crate::pipeline::traits::{LabelFilter, SentenceSegmenter};
use crate::transcript::{align_transcript, select_tiers};
use crate::types::{EventTable, TextGrid};

/// Parses TextGrids and turns their phoneme and word tiers into event tables.
pub struct EventPipeline {
    tier_roles: TierRoles,
    segmenter: Box<dyn SentenceSegmenter>,
    label_filter: Box<dyn LabelFilter>,
}

pub(crate) struct EventPipelineParts {
    pub tier_roles: TierRoles,
    pub segmenter: Box<dyn SentenceSegmenter>,
    pub label_filter: Box<dyn LabelFilter>,
}

impl EventPipeline {
    pub(crate) fn from_parts(parts: EventPipelineParts) -> Self {
        Self {
            tier_roles: parts.tier_roles,
            segmenter: parts.segmenter,
            label_filter: parts.label_filter,
        }
    }

    pub fn parse_and_align(&self, path: impl AsRef<Path>) -> Result<EventTable, PipelineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io("read TextGrid", path, e))?;
        self.align_text(&text).map_err(|e| e.at(path))
    }

    pub fn align_text(&self, text: &str) -> Result<EventTable, TextGridError> {
        let grid = parse_textgrid(text)?;
        Ok(self.align_grid(&grid)?)
    }

    pub fn align_grid(&self, grid: &TextGrid) -> Result<EventTable, AlignmentError> {
        let (phonemes, words) = select_tiers(grid, &self.tier_roles)?;
        let sentences = self.segmenter.segment(words)?;
        tracing::debug!(
            phoneme_tier = %phonemes.name,
            word_tier = %words.name,
            sentences = sentences.len(),
            "pipeline: segmented word tier"
        );
        align_transcript(phonemes, words, &sentences, |label| {
            self.label_filter.is_stop_label(label)
        })
    }
}
