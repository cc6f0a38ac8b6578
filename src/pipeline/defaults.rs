use crate::error::AlignmentError;
use crate::pipeline::traits::{LabelFilter, SentenceSegmenter};
use crate::transcript::{infer_sentences, SentenceSpan, StopLabels};
use crate::types::Tier;

/// Sentences between consecutive exact-match silence markers.
pub struct SilenceSegmenter {
    marker: String,
}

impl SilenceSegmenter {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl SentenceSegmenter for SilenceSegmenter {
    fn segment(&self, words: &Tier) -> Result<Vec<SentenceSpan>, AlignmentError> {
        if !words.intervals.iter().any(|word| word.text == self.marker) {
            return Err(AlignmentError::NoSilenceMarkers {
                tier: words.name.clone(),
                marker: self.marker.clone(),
            });
        }
        Ok(infer_sentences(&words.intervals, &self.marker))
    }
}

pub struct StopLabelFilter(StopLabels);

impl StopLabelFilter {
    pub fn new(labels: StopLabels) -> Self {
        Self(labels)
    }
}

impl LabelFilter for StopLabelFilter {
    fn is_stop_label(&self, label: &str) -> bool {
        self.0.contains(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Interval, TierType};

    fn words(labels: &[&str]) -> Tier {
        Tier {
            name: "words".to_string(),
            tier_type: TierType::IntervalTier,
            xmin: 0.0,
            xmax: labels.len() as f64,
            size: Some(labels.len()),
            intervals: labels
                .iter()
                .enumerate()
                .map(|(i, text)| Interval {
                    xmin: i as f64,
                    xmax: (i + 1) as f64,
                    text: text.to_string(),
                })
                .collect(),
            points: Vec::new(),
        }
    }

    #[test]
    fn silence_segmenter_matches_infer_sentences() {
        let tier = words(&["sp", "a", "sp", "b", "sp"]);
        let spans = SilenceSegmenter::new("sp").segment(&tier).unwrap();
        assert_eq!(spans, infer_sentences(&tier.intervals, "sp"));
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn silence_segmenter_without_markers_fails() {
        let tier = words(&["a", "SP", "b"]);
        let err = SilenceSegmenter::new("sp").segment(&tier).unwrap_err();
        assert_eq!(
            err,
            AlignmentError::NoSilenceMarkers {
                tier: "words".to_string(),
                marker: "sp".to_string()
            }
        );
    }

    #[test]
    fn stop_label_filter_delegates() {
        let filter = StopLabelFilter::new(StopLabels::new(["sp", "br"]));
        assert!(filter.is_stop_label("{BR}"));
        assert!(!filter.is_stop_label("hello"));
    }
}
