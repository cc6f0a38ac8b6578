use std::collections::HashSet;

/// Label normalization used for stop-label lookups: strip surrounding braces
/// (`{SP}` → `SP`), then ASCII-lowercase.
pub fn normalize_label(label: &str) -> String {
    label
        .trim_matches(|c: char| c == '{' || c == '}')
        .to_ascii_lowercase()
}

/// Set of labels that never become words or phonemes (silences, breaths,
/// noise, sentence markers, empty intervals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopLabels {
    labels: HashSet<String>,
}

impl StopLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|label| normalize_label(label.as_ref()))
                .collect(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&normalize_label(label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranscriptConfig;

    fn defaults() -> StopLabels {
        StopLabels::new(TranscriptConfig::DEFAULT_STOP_LABELS)
    }

    #[test]
    fn normalize_strips_braces_and_lowercases() {
        assert_eq!(normalize_label("{SP}"), "sp");
        assert_eq!(normalize_label("{{LG}"), "lg");
        assert_eq!(normalize_label("Hello"), "hello");
        assert_eq!(normalize_label("a{b}c"), "a{b}c");
    }

    #[test]
    fn default_stop_labels_match_any_case_and_braces() {
        let stops = defaults();
        for label in ["sp", "SP", "{sp}", "{SP}", "Sp", "", "{}", "br", "{NS}", "sentence_start"] {
            assert!(stops.contains(label), "{label:?} should be a stop label");
        }
        for label in ["spa", "hello", " sp", "AH0"] {
            assert!(!stops.contains(label), "{label:?} should be kept");
        }
    }
}
