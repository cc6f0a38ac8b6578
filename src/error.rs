use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Stage of TextGrid parsing at which a [`FormatError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStep {
    DetectDialect,
    GlobalHeader,
    SplitTiers,
    TierHeader,
    TierEntries,
}

impl ParseStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DetectDialect => "detect dialect",
            Self::GlobalHeader => "read global header",
            Self::SplitTiers => "split tiers",
            Self::TierHeader => "parse tier header",
            Self::TierEntries => "parse tier entries",
        }
    }
}

impl fmt::Display for ParseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("detect dialect: unrecognized TextGrid header '{header}'")]
    UnknownDialect { header: String },
    #[error("{step}: {what} not found")]
    MissingPattern { step: ParseStep, what: &'static str },
    #[error("{step}: invalid {field} value '{value}'")]
    InvalidNumber {
        step: ParseStep,
        field: &'static str,
        value: String,
    },
    #[error("split tiers: header declares {declared} tier(s) but {recovered} were recovered")]
    TierCountMismatch { declared: usize, recovered: usize },
    #[error("parse tier header: unknown tier class '{class}'")]
    UnknownTierClass { class: String },
    #[error("{step}: malformed quoted label in tier '{tier}' ({parsed} of {expected} entries readable)")]
    MalformedLabel {
        step: ParseStep,
        tier: String,
        parsed: usize,
        expected: usize,
    },
    #[error("parse tier entries: only {parsed} of {records} entry records in tier '{tier}' read as {class} entries")]
    EntryShapeMismatch {
        tier: String,
        class: &'static str,
        parsed: usize,
        records: usize,
    },
}

impl FormatError {
    pub fn step(&self) -> ParseStep {
        match self {
            Self::UnknownDialect { .. } => ParseStep::DetectDialect,
            Self::MissingPattern { step, .. }
            | Self::InvalidNumber { step, .. }
            | Self::MalformedLabel { step, .. } => *step,
            Self::TierCountMismatch { .. } => ParseStep::SplitTiers,
            Self::UnknownTierClass { .. } => ParseStep::TierHeader,
            Self::EntryShapeMismatch { .. } => ParseStep::TierEntries,
        }
    }

    pub(crate) fn missing(step: ParseStep, what: &'static str) -> Self {
        Self::MissingPattern { step, what }
    }

    pub(crate) fn invalid_number(step: ParseStep, field: &'static str, value: &str) -> Self {
        Self::InvalidNumber {
            step,
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    #[error("empty alignment: word tier '{tier}' contains no '{marker}' silence markers")]
    NoSilenceMarkers { tier: String, marker: String },
    #[error("empty alignment: no sentence in tier '{tier}' contains a word")]
    NoSentences { tier: String },
    #[error("{kind} '{label}' at {start}s precedes every {target} start")]
    Unmatched {
        kind: &'static str,
        label: String,
        start: f64,
        target: &'static str,
    },
    #[error("tier '{tier}' is not ordered by start time at entry {index}")]
    UnsortedTier { tier: String, index: usize },
    #[error("{role} tier not found: {message}")]
    MissingTier { role: &'static str, message: String },
    #[error("{role} tier '{name}' is a {class}, expected an interval tier")]
    NotIntervalTier {
        role: &'static str,
        name: String,
        class: &'static str,
    },
    #[error("tier {index} ('{name}') looks like the {found} tier but was expected to hold {role}")]
    TierRoleMismatch {
        index: usize,
        name: String,
        role: &'static str,
        found: &'static str,
    },
}

impl AlignmentError {
    pub(crate) fn unmatched(
        kind: &'static str,
        label: &str,
        start: f64,
        target: &'static str,
    ) -> Self {
        Self::Unmatched {
            kind,
            label: label.to_string(),
            start,
            target,
        }
    }

    pub(crate) fn missing_tier(role: &'static str, message: impl Into<String>) -> Self {
        Self::MissingTier {
            role,
            message: message.into(),
        }
    }
}

/// Error surfaced by path-based entry points; always names the offending file.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("I/O error while {context} '{}': {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error while {context} '{}': {source}", .path.display())]
    Json {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("format error in '{}': {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("alignment error in '{}': {source}", .path.display())]
    Alignment {
        path: PathBuf,
        #[source]
        source: AlignmentError,
    },
}

impl PipelineError {
    pub(crate) fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(context: &'static str, path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: &Path, source: FormatError) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn alignment(path: &Path, source: AlignmentError) -> Self {
        Self::Alignment {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Json { path, .. }
            | Self::Format { path, .. }
            | Self::Alignment { path, .. } => path,
        }
    }
}

/// Error from the in-memory entry points, before a path is attached.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextGridError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

impl TextGridError {
    pub(crate) fn at(self, path: &Path) -> PipelineError {
        match self {
            Self::Format(source) => PipelineError::format(path, source),
            Self::Alignment(source) => PipelineError::alignment(path, source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_error_reports_its_step() {
        let err = FormatError::TierCountMismatch {
            declared: 2,
            recovered: 1,
        };
        assert_eq!(err.step(), ParseStep::SplitTiers);
        assert!(err.to_string().starts_with("split tiers:"));

        let err = FormatError::invalid_number(ParseStep::TierEntries, "xmin", "abc");
        assert_eq!(err.step(), ParseStep::TierEntries);
        assert_eq!(err.to_string(), "parse tier entries: invalid xmin value 'abc'");
    }

    #[test]
    fn pipeline_error_carries_path() {
        let err = TextGridError::from(FormatError::UnknownDialect {
            header: "nope".to_string(),
        })
        .at(Path::new("corpus/a.TextGrid"));
        assert_eq!(err.path(), Path::new("corpus/a.TextGrid"));
        assert!(matches!(err, PipelineError::Format { .. }));
        assert!(err.to_string().contains("corpus/a.TextGrid"));
    }
}
