use std::borrow::Cow;
use std::path::Path;

use crate::error::{FormatError, ParseStep, PipelineError};
use crate::types::TextGrid;

pub mod dialect;
pub mod splitter;
pub mod tier_parser;
pub mod writer;

pub use dialect::detect_dialect;
pub use splitter::{split_tiers, GridLayout};
pub use tier_parser::parse_tier;
pub use writer::write_textgrid;

/// Parses TextGrid text in any of the three supported dialects.
pub fn parse_textgrid(text: &str) -> Result<TextGrid, FormatError> {
    let text = normalize_newlines(text);
    let layout = split_tiers(&text)?;
    let tiers = layout
        .raw_tiers
        .iter()
        .map(|raw| parse_tier(raw, layout.dialect))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TextGrid {
        dialect: layout.dialect,
        xmin: layout.xmin,
        xmax: layout.xmax,
        tiers,
    })
}

/// Reads the whole file once, then parses it.
pub fn read_textgrid(path: &Path) -> Result<TextGrid, PipelineError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::io("read TextGrid", path, e))?;
    parse_textgrid(&text).map_err(|e| PipelineError::format(path, e))
}

fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Undoes Praat's doubled-quote escaping inside a captured label.
pub(crate) fn unquote(label: &str) -> String {
    if label.contains("\"\"") {
        label.replace("\"\"", "\"")
    } else {
        label.to_string()
    }
}

pub(crate) fn parse_seconds(
    value: &str,
    step: ParseStep,
    field: &'static str,
) -> Result<f64, FormatError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite())
        .ok_or_else(|| FormatError::invalid_number(step, field, value))
}

pub(crate) fn parse_count(
    value: &str,
    step: ParseStep,
    field: &'static str,
) -> Result<usize, FormatError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| FormatError::invalid_number(step, field, value))
}
