use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{FormatError, ParseStep};
use crate::grid::dialect::{detect_dialect, TierLayout, CHRON_ENTRY, CHRON_ENTRY_HEAD};
use crate::grid::{parse_count, parse_seconds};
use crate::types::Dialect;

/// Result of dialect detection and tier splitting, before any tier is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout<'a> {
    pub dialect: Dialect,
    pub xmin: f64,
    pub xmax: f64,
    /// Tier count declared in the global header.
    pub size: usize,
    /// One raw substring per tier, in declaration order.
    pub raw_tiers: Vec<Cow<'a, str>>,
}

/// Detects the dialect of `text`, reads its global header and cuts it into
/// one raw substring per tier. `text` must use `\n` line endings.
pub fn split_tiers(text: &str) -> Result<GridLayout<'_>, FormatError> {
    let dialect = detect_dialect(text)?;
    let rules = dialect.rules();

    let header = rules
        .global_header
        .captures(text)
        .ok_or_else(|| FormatError::missing(ParseStep::GlobalHeader, "xmin/xmax/size header"))?;
    let xmin = parse_seconds(&header["xmin"], ParseStep::GlobalHeader, "xmin")?;
    let xmax = parse_seconds(&header["xmax"], ParseStep::GlobalHeader, "xmax")?;
    let size = parse_count(&header["size"], ParseStep::GlobalHeader, "size")?;

    let raw_tiers = match rules.layout {
        TierLayout::Delimited => split_delimited(text, rules.tier_marker)
            .into_iter()
            .map(Cow::Borrowed)
            .collect::<Vec<_>>(),
        TierLayout::IndexedEntries => split_indexed_entries(text, rules.tier_marker, size)?
            .into_iter()
            .map(Cow::Owned)
            .collect::<Vec<_>>(),
    };

    if raw_tiers.len() != size {
        return Err(FormatError::TierCountMismatch {
            declared: size,
            recovered: raw_tiers.len(),
        });
    }

    tracing::debug!(
        dialect = dialect.as_str(),
        xmin,
        xmax,
        tiers = size,
        "textgrid: split tiers"
    );

    Ok(GridLayout {
        dialect,
        xmin,
        xmax,
        size,
        raw_tiers,
    })
}

fn split_delimited<'a>(text: &'a str, marker: &regex::Regex) -> Vec<&'a str> {
    let starts = marker.find_iter(text).map(|m| m.start()).collect::<Vec<_>>();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            &text[start..end]
        })
        .collect()
}

/// Rebuilds chronological tiers: each header line followed by every entry
/// record whose leading index names that tier, wherever it sits in the file.
fn split_indexed_entries(
    text: &str,
    marker: &regex::Regex,
    declared: usize,
) -> Result<Vec<String>, FormatError> {
    let headers = marker.captures_iter(text).collect::<Vec<_>>();
    if headers.len() != declared {
        return Err(FormatError::TierCountMismatch {
            declared,
            recovered: headers.len(),
        });
    }

    let mut entries_by_tier: HashMap<usize, Vec<&str>> = HashMap::with_capacity(declared);
    for entry in CHRON_ENTRY.captures_iter(text) {
        let record = entry.get(0).map_or("", |m| m.as_str());
        let tier = parse_count(&entry["tier"], ParseStep::SplitTiers, "tier index")?;
        if tier == 0 || tier > declared {
            tracing::warn!(
                tier,
                declared,
                "textgrid: chronological entry names an undeclared tier; skipping"
            );
            continue;
        }
        entries_by_tier.entry(tier).or_default().push(record);
    }

    let mut heads_by_tier: HashMap<usize, usize> = HashMap::with_capacity(declared);
    for head in CHRON_ENTRY_HEAD.captures_iter(text) {
        let tier = parse_count(&head["tier"], ParseStep::SplitTiers, "tier index")?;
        *heads_by_tier.entry(tier).or_default() += 1;
    }

    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let tier = i + 1;
            let entries = entries_by_tier.remove(&tier).unwrap_or_default();
            let expected = heads_by_tier.get(&tier).copied().unwrap_or(0);
            if entries.len() != expected {
                return Err(FormatError::MalformedLabel {
                    step: ParseStep::SplitTiers,
                    tier: header["name"].to_string(),
                    parsed: entries.len(),
                    expected,
                });
            }

            let header_line = header.get(0).map_or("", |m| m.as_str());
            let mut raw = String::with_capacity(
                header_line.len() + entries.iter().map(|e| e.len() + 1).sum::<usize>(),
            );
            raw.push_str(header_line);
            for entry in entries {
                raw.push('\n');
                raw.push_str(entry);
            }
            Ok(raw)
        })
        .collect()
}
