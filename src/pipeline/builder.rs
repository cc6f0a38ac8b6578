use std::path::Path;

use crate::config::TranscriptConfig;
use crate::error::PipelineError;
use crate::pipeline::defaults::{SilenceSegmenter, StopLabelFilter};
use crate::pipeline::runtime::{EventPipeline, EventPipelineParts};
use crate::pipeline::traits::{LabelFilter, SentenceSegmenter};
use crate::transcript::StopLabels;

pub struct EventPipelineBuilder {
    config: TranscriptConfig,
    segmenter: Option<Box<dyn SentenceSegmenter>>,
    label_filter: Option<Box<dyn LabelFilter>>,
}

impl EventPipelineBuilder {
    pub fn new(config: TranscriptConfig) -> Self {
        Self {
            config,
            segmenter: None,
            label_filter: None,
        }
    }

    /// Starts from a JSON transcript config on disk.
    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        Ok(Self::new(TranscriptConfig::load(path.as_ref())?))
    }

    pub fn with_segmenter(mut self, segmenter: Box<dyn SentenceSegmenter>) -> Self {
        self.segmenter = Some(segmenter);
        self
    }

    pub fn with_label_filter(mut self, label_filter: Box<dyn LabelFilter>) -> Self {
        self.label_filter = Some(label_filter);
        self
    }

    pub fn build(self) -> EventPipeline {
        let TranscriptConfig {
            silence_marker,
            stop_labels,
            tier_roles,
        } = self.config;

        EventPipeline::from_parts(EventPipelineParts {
            tier_roles,
            segmenter: self
                .segmenter
                .unwrap_or_else(|| Box::new(SilenceSegmenter::new(silence_marker))),
            label_filter: self
                .label_filter
                .unwrap_or_else(|| Box::new(StopLabelFilter::new(StopLabels::new(&stop_labels)))),
        })
    }
}

impl Default for EventPipelineBuilder {
    fn default() -> Self {
        Self::new(TranscriptConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlignmentError;
    use crate::transcript::SentenceSpan;
    use crate::types::{EventKind, Tier};

    const GRID: &str = "File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\nxmin = 0\nxmax = 3\ntiers? <exists>\nsize = 2\nitem []:\n    item [1]:\n        class = \"IntervalTier\"\n        name = \"phones\"\n        xmin = 0\n        xmax = 3\n        intervals: size = 3\n        intervals [1]:\n            xmin = 0\n            xmax = 1\n            text = \"pause\"\n        intervals [2]:\n            xmin = 1\n            xmax = 2\n            text = \"AH\"\n        intervals [3]:\n            xmin = 2\n            xmax = 3\n            text = \"pause\"\n    item [2]:\n        class = \"IntervalTier\"\n        name = \"words\"\n        xmin = 0\n        xmax = 3\n        intervals: size = 3\n        intervals [1]:\n            xmin = 0\n            xmax = 1\n            text = \"pause\"\n        intervals [2]:\n            xmin = 1\n            xmax = 2\n            text = \"a\"\n        intervals [3]:\n            xmin = 2\n            xmax = 3\n            text = \"pause\"\n";

    struct WholeTier;

    impl SentenceSegmenter for WholeTier {
        fn segment(&self, words: &Tier) -> Result<Vec<SentenceSpan>, AlignmentError> {
            Ok(vec![SentenceSpan {
                sequence_id: 0,
                start: words.xmin,
                stop: words.xmax,
            }])
        }
    }

    #[test]
    fn builder_uses_configured_marker_and_labels() {
        let config = TranscriptConfig {
            silence_marker: "pause".to_string(),
            stop_labels: vec!["pause".to_string()],
            ..TranscriptConfig::default()
        };
        let table = EventPipelineBuilder::new(config)
            .build()
            .align_text(GRID)
            .unwrap();
        let sentence = table.of_kind(EventKind::Sound).next().unwrap();
        assert_eq!((sentence.start, sentence.stop), (1.0, 2.0));
        assert_eq!(table.of_kind(EventKind::Phoneme).count(), 1);
    }

    #[test]
    fn builder_accepts_custom_segmenter() {
        let config = TranscriptConfig {
            stop_labels: vec!["pause".to_string()],
            ..TranscriptConfig::default()
        };
        let table = EventPipelineBuilder::new(config)
            .with_segmenter(Box::new(WholeTier))
            .build()
            .align_text(GRID)
            .unwrap();
        let sentence = table.of_kind(EventKind::Sound).next().unwrap();
        assert_eq!((sentence.start, sentence.stop), (0.0, 3.0));
        assert_eq!(sentence.word_sequence, "a");
    }

    #[test]
    fn default_markers_do_not_match_custom_silence() {
        let err = EventPipelineBuilder::default()
            .build()
            .align_text(GRID)
            .unwrap_err();
        assert!(err.to_string().contains("no 'sp' silence markers"));
    }

    #[test]
    fn from_config_path_reports_missing_file() {
        let path = std::env::temp_dir().join("textgrid_events_missing_config.json");
        let _ = std::fs::remove_file(&path);
        let Err(err) = EventPipelineBuilder::from_config_path(&path) else {
            panic!("missing config should fail");
        };
        assert!(matches!(err, PipelineError::Io { .. }));
        assert_eq!(err.path(), path.as_path());
    }
}
