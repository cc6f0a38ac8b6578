use crate::error::{FormatError, ParseStep};
use crate::grid::dialect::DialectRules;
use crate::grid::{parse_count, parse_seconds, unquote};
use crate::types::{Dialect, Interval, Point, Tier, TierType};

/// Parses one raw tier block, as produced by [`super::split_tiers`].
pub fn parse_tier(raw: &str, dialect: Dialect) -> Result<Tier, FormatError> {
    let rules = dialect.rules();
    let header = rules
        .tier_header
        .captures(raw)
        .ok_or_else(|| FormatError::missing(ParseStep::TierHeader, "class/name/xmin/xmax"))?;

    let class = &header["class"];
    let tier_type = TierType::from_class(class).ok_or_else(|| FormatError::UnknownTierClass {
        class: class.to_string(),
    })?;
    let name = unquote(&header["name"]);
    let xmin = parse_seconds(&header["xmin"], ParseStep::TierHeader, "tier xmin")?;
    let xmax = parse_seconds(&header["xmax"], ParseStep::TierHeader, "tier xmax")?;
    let size = match header.name("size") {
        Some(size) if rules.declares_entry_count => Some(parse_count(
            size.as_str(),
            ParseStep::TierHeader,
            "tier size",
        )?),
        _ => None,
    };
    let body = header.name("body").map_or("", |m| m.as_str());

    let mut tier = Tier {
        name,
        tier_type,
        xmin,
        xmax,
        size,
        intervals: Vec::new(),
        points: Vec::new(),
    };
    match tier_type {
        TierType::IntervalTier => tier.intervals = parse_intervals(body, rules)?,
        TierType::TextTier => tier.points = parse_points(body, rules)?,
    }

    if let Some(expected) = size {
        let parsed = tier.entry_count();
        if parsed < expected {
            return Err(FormatError::MalformedLabel {
                step: ParseStep::TierEntries,
                tier: tier.name,
                parsed,
                expected,
            });
        }
        if parsed > expected {
            tracing::warn!(
                tier = tier.name.as_str(),
                declared = expected,
                parsed,
                "textgrid: tier holds more entries than declared"
            );
        }
    }

    if let Some(head) = rules.record_head {
        let records = head.find_iter(body).count();
        let parsed = tier.entry_count();
        if parsed != records {
            return Err(FormatError::EntryShapeMismatch {
                tier: tier.name,
                class: tier.tier_type.as_str(),
                parsed,
                records,
            });
        }
    }

    tracing::debug!(
        tier = tier.name.as_str(),
        class = tier.tier_type.as_str(),
        entries = tier.entry_count(),
        "textgrid: parsed tier"
    );
    Ok(tier)
}

fn parse_intervals(body: &str, rules: &DialectRules) -> Result<Vec<Interval>, FormatError> {
    rules
        .interval_entry
        .captures_iter(body)
        .map(|entry| {
            Ok(Interval {
                xmin: parse_seconds(&entry["xmin"], ParseStep::TierEntries, "interval xmin")?,
                xmax: parse_seconds(&entry["xmax"], ParseStep::TierEntries, "interval xmax")?,
                text: unquote(&entry["text"]),
            })
        })
        .collect()
}

fn parse_points(body: &str, rules: &DialectRules) -> Result<Vec<Point>, FormatError> {
    rules
        .point_entry
        .captures_iter(body)
        .map(|entry| {
            Ok(Point {
                time: parse_seconds(&entry["time"], ParseStep::TierEntries, "point time")?,
                mark: unquote(&entry["text"]),
            })
        })
        .collect()
}
