use std::sync::LazyLock;

use regex::Regex;

use crate::error::FormatError;
use crate::types::Dialect;

const OO_TEXT_HEADER: &str = r#"File type = "ooTextFile""#;
const CHRONOLOGICAL_HEADER: &str = r#""Praat chronological TextGrid text file""#;

/// Numeric literal as Praat writes it; used where a number is structural
/// (tier boundaries), not where it is captured for parsing.
const NUM: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

/// Quoted label on a single line, `""` standing for an embedded quote. The
/// closing quote must end the line, so a stray inner quote fails to match.
const LABEL: &str = r#""(?P<text>(?:[^"\n]|"")*)"[ \t]*$"#;

static OO_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*xmin = (?P<xmin>\S+)[ \t]*\n[ \t]*xmax = (?P<xmax>\S+)[ \t]*\n(?:[^\n]*\n)*?[ \t]*size = (?P<size>\S+)[ \t]*$",
    )
    .expect("valid regex")
});

static OO_TIER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*item \[\d+\]:[ \t]*$").expect("valid regex"));

static OO_TIER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*class = "(?P<class>[^"\n]*)"[ \t]*\n"#,
        r#"[ \t]*name = "(?P<name>.*)"[ \t]*\n"#,
        r"[ \t]*xmin = (?P<xmin>\S+)[ \t]*\n",
        r"[ \t]*xmax = (?P<xmax>\S+)[ \t]*\n",
        r"[ \t]*\S+: size = (?P<size>\S+)[ \t]*(?:\n|\z)",
        r"(?P<body>(?s:.*))",
    ))
    .expect("valid regex")
});

static OO_INTERVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        concat!(
            r"(?m)^[ \t]*\S+ \[\d+\]:[ \t]*\n",
            r"[ \t]*\S+ = (?P<xmin>\S+)[ \t]*\n",
            r"[ \t]*\S+ = (?P<xmax>\S+)[ \t]*\n",
            r"[ \t]*\S+ = {label}",
        ),
        label = LABEL
    ))
    .expect("valid regex")
});

static OO_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        concat!(
            r"(?m)^[ \t]*\S+ \[\d+\]:[ \t]*\n",
            r"[ \t]*\S+ = (?P<time>\S+)[ \t]*\n",
            r"[ \t]*\S+ = {label}",
        ),
        label = LABEL
    ))
    .expect("valid regex")
});

static SHORT_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<xmin>\S+)[ \t]*\n[ \t]*(?P<xmax>\S+)[ \t]*\n[^\n]*\n[ \t]*(?P<size>\S+)[ \t]*$",
    )
    .expect("valid regex")
});

// class line, name line, then xmin/xmax/size; a lone label followed by the
// next tier's class line never has numbers after its second quoted line.
static SHORT_TIER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?m)^[ \t]*"[^"\n]*"[ \t]*\n[ \t]*"[^\n]*"[ \t]*\n[ \t]*{NUM}[ \t]*\n[ \t]*{NUM}[ \t]*\n[ \t]*\d+[ \t]*$"#
    ))
    .expect("valid regex")
});

static SHORT_TIER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*"(?P<class>[^"\n]*)"[ \t]*\n"#,
        r#"[ \t]*"(?P<name>.*)"[ \t]*\n"#,
        r"[ \t]*(?P<xmin>\S+)[ \t]*\n",
        r"[ \t]*(?P<xmax>\S+)[ \t]*\n",
        r"[ \t]*(?P<size>\S+)[ \t]*(?:\n|\z)",
        r"(?P<body>(?s:.*))",
    ))
    .expect("valid regex")
});

static SHORT_INTERVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*(?P<xmin>\S+)[ \t]*\n[ \t]*(?P<xmax>\S+)[ \t]*\n[ \t]*{LABEL}"
    ))
    .expect("valid regex")
});

static SHORT_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^[ \t]*(?P<time>\S+)[ \t]*\n[ \t]*{LABEL}"))
        .expect("valid regex")
});

static CHRON_GLOBAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*(?P<xmin>\S+)[ \t]+(?P<xmax>\S+)[ \t]*![ \t]*Time domain\.?[ \t]*\n",
        r"[ \t]*(?P<size>\S+)[ \t]*![ \t]*Number of tiers\.?",
    ))
    .expect("valid regex")
});

static CHRON_TIER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*"(?P<class>[^"\n]*)"[ \t]+"(?P<name>.*)"[ \t]+\S+[ \t]+\S+[ \t]*$"#)
        .expect("valid regex")
});

static CHRON_TIER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?m)^[ \t]*"(?P<class>[^"\n]*)"[ \t]+"(?P<name>.*)"[ \t]+"#,
        r"(?P<xmin>\S+)[ \t]+(?P<xmax>\S+)[ \t]*(?:\n|\z)",
        r"(?P<body>(?s:.*))",
    ))
    .expect("valid regex")
});

/// Full chronological entry record: tier index, one or two times, label line.
pub(crate) static CHRON_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?m)^[ \t]*(?P<tier>\d+)[ \t]+{NUM}(?:[ \t]+{NUM})?[ \t]*\n[ \t]*"(?:[^"\n]|"")*"[ \t]*$"#
    ))
    .expect("valid regex")
});

/// Entry record head alone, used to detect entries whose label is unreadable.
pub(crate) static CHRON_ENTRY_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*(?P<tier>\d+)[ \t]+{NUM}(?:[ \t]+{NUM})?[ \t]*$"
    ))
    .expect("valid regex")
});

static CHRON_INTERVAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*\d+[ \t]+(?P<xmin>\S+)[ \t]+(?P<xmax>\S+)[ \t]*\n[ \t]*{LABEL}"
    ))
    .expect("valid regex")
});

static CHRON_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?m)^[ \t]*\d+[ \t]+(?P<time>\S+)[ \t]*\n[ \t]*{LABEL}"))
        .expect("valid regex")
});

/// How tier blocks are recovered from the file body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TierLayout {
    /// Each block runs from one marker match to the next, or to end of file.
    Delimited,
    /// One header line per tier; entries of all tiers interleaved in time
    /// order, each prefixed by its 1-based tier index.
    IndexedEntries,
}

/// Extraction rules for one dialect, resolved once after detection.
pub(crate) struct DialectRules {
    pub(crate) layout: TierLayout,
    /// Captures `xmin`, `xmax`, `size`.
    pub(crate) global_header: &'static LazyLock<Regex>,
    pub(crate) tier_marker: &'static LazyLock<Regex>,
    /// Captures `class`, `name`, `xmin`, `xmax`, optionally `size`, and `body`.
    pub(crate) tier_header: &'static LazyLock<Regex>,
    /// Captures `xmin`, `xmax`, `text`.
    pub(crate) interval_entry: &'static LazyLock<Regex>,
    /// Captures `time`, `text`.
    pub(crate) point_entry: &'static LazyLock<Regex>,
    pub(crate) declares_entry_count: bool,
    /// Head line of one entry record, for dialects without declared counts.
    pub(crate) record_head: Option<&'static LazyLock<Regex>>,
}

static OO_RULES: DialectRules = DialectRules {
    layout: TierLayout::Delimited,
    global_header: &OO_GLOBAL,
    tier_marker: &OO_TIER_MARKER,
    tier_header: &OO_TIER_HEADER,
    interval_entry: &OO_INTERVAL,
    point_entry: &OO_POINT,
    declares_entry_count: true,
    record_head: None,
};

static SHORT_RULES: DialectRules = DialectRules {
    layout: TierLayout::Delimited,
    global_header: &SHORT_GLOBAL,
    tier_marker: &SHORT_TIER_MARKER,
    tier_header: &SHORT_TIER_HEADER,
    interval_entry: &SHORT_INTERVAL,
    point_entry: &SHORT_POINT,
    declares_entry_count: true,
    record_head: None,
};

static CHRON_RULES: DialectRules = DialectRules {
    layout: TierLayout::IndexedEntries,
    global_header: &CHRON_GLOBAL,
    tier_marker: &CHRON_TIER_MARKER,
    tier_header: &CHRON_TIER_HEADER,
    interval_entry: &CHRON_INTERVAL,
    point_entry: &CHRON_POINT,
    declares_entry_count: false,
    record_head: Some(&CHRON_ENTRY_HEAD),
};

impl Dialect {
    pub(crate) fn rules(self) -> &'static DialectRules {
        match self {
            Self::OoText => &OO_RULES,
            Self::ShortOoText => &SHORT_RULES,
            Self::Chronological => &CHRON_RULES,
        }
    }
}

/// Identifies the dialect from the first four lines of `text`.
///
/// The first line selects the family; within the ooTextFile family the long
/// form is recognised by an `xmin` keyword on line four.
pub fn detect_dialect(text: &str) -> Result<Dialect, FormatError> {
    let mut lines = text.split('\n');
    let first = lines.next().unwrap_or_default();
    let header = first.trim_start_matches('\u{feff}').trim();
    let fourth = lines.nth(2).ok_or_else(|| FormatError::UnknownDialect {
        header: header.to_string(),
    })?;

    if header == OO_TEXT_HEADER {
        if fourth.contains("xmin") {
            Ok(Dialect::OoText)
        } else {
            Ok(Dialect::ShortOoText)
        }
    } else if header == CHRONOLOGICAL_HEADER {
        Ok(Dialect::Chronological)
    } else {
        Err(FormatError::UnknownDialect {
            header: header.to_string(),
        })
    }
}
