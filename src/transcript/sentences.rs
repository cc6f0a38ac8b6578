use crate::types::Interval;

/// Sentence span between two consecutive silence markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceSpan {
    pub sequence_id: usize,
    pub start: f64,
    pub stop: f64,
}

/// Infers sentences from silence markers: sentence *i* runs from the end of
/// marker *i* to the start of marker *i + 1*. Speech before the first marker
/// and after the last one does not form a sentence.
pub fn infer_sentences(words: &[Interval], silence_marker: &str) -> Vec<SentenceSpan> {
    let markers = words
        .iter()
        .filter(|word| word.text == silence_marker)
        .collect::<Vec<_>>();

    markers
        .windows(2)
        .enumerate()
        .map(|(sequence_id, pair)| SentenceSpan {
            sequence_id,
            start: pair[0].xmax,
            stop: pair[1].xmin,
        })
        .collect()
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
    fn spans_run_silence_to_silence() {
        let words = vec![
            interval(0.0, 1.0, "sp"),
            interval(1.0, 2.0, "hello"),
            interval(2.0, 3.0, "sp"),
            interval(3.0, 4.0, "world"),
            interval(4.0, 5.0, "sp"),
        ];
        let sentences = infer_sentences(&words, "sp");
        assert_eq!(
            sentences,
            vec![
                SentenceSpan {
                    sequence_id: 0,
                    start: 1.0,
                    stop: 2.0
                },
                SentenceSpan {
                    sequence_id: 1,
                    start: 3.0,
                    stop: 4.0
                },
            ]
        );
    }

    #[test]
    fn marker_match_is_exact() {
        let words = vec![
            interval(0.0, 1.0, "SP"),
            interval(1.0, 2.0, "hello"),
            interval(2.0, 3.0, "{sp}"),
        ];
        assert!(infer_sentences(&words, "sp").is_empty());
    }

    #[test]
    fn single_marker_opens_nothing() {
        let words = vec![interval(0.0, 1.0, "sp"), interval(1.0, 2.0, "hello")];
        assert!(infer_sentences(&words, "sp").is_empty());
    }
}
