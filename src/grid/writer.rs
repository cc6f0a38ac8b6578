use std::fmt::Write;

use crate::types::{Dialect, TextGrid, Tier, TierType};

/// Serializes `grid` in the requested dialect.
///
/// Labels are written with Praat's doubled-quote escaping. Labels spanning
/// several lines are written as-is but cannot be read back.
pub fn write_textgrid(grid: &TextGrid, dialect: Dialect) -> String {
    match dialect {
        Dialect::OoText => write_oo_text(grid),
        Dialect::ShortOoText => write_short_oo_text(grid),
        Dialect::Chronological => write_chronological(grid),
    }
}

fn write_oo_text(grid: &TextGrid) -> String {
    let mut out = String::new();
    out.push_str("File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\n");
    let _ = writeln!(out, "xmin = {}", grid.xmin);
    let _ = writeln!(out, "xmax = {}", grid.xmax);
    out.push_str("tiers? <exists>\n");
    let _ = writeln!(out, "size = {}", grid.tiers.len());
    out.push_str("item []:\n");
    for (i, tier) in grid.tiers.iter().enumerate() {
        let _ = writeln!(out, "    item [{}]:", i + 1);
        let _ = writeln!(out, "        class = \"{}\"", tier.tier_type);
        let _ = writeln!(out, "        name = \"{}\"", quote(&tier.name));
        let _ = writeln!(out, "        xmin = {}", tier.xmin);
        let _ = writeln!(out, "        xmax = {}", tier.xmax);
        match tier.tier_type {
            TierType::IntervalTier => {
                let _ = writeln!(out, "        intervals: size = {}", tier.intervals.len());
                for (j, interval) in tier.intervals.iter().enumerate() {
                    let _ = writeln!(out, "        intervals [{}]:", j + 1);
                    let _ = writeln!(out, "            xmin = {}", interval.xmin);
                    let _ = writeln!(out, "            xmax = {}", interval.xmax);
                    let _ = writeln!(out, "            text = \"{}\"", quote(&interval.text));
                }
            }
            TierType::TextTier => {
                let _ = writeln!(out, "        points: size = {}", tier.points.len());
                for (j, point) in tier.points.iter().enumerate() {
                    let _ = writeln!(out, "        points [{}]:", j + 1);
                    let _ = writeln!(out, "            number = {}", point.time);
                    let _ = writeln!(out, "            mark = \"{}\"", quote(&point.mark));
                }
            }
        }
    }
    out
}

fn write_short_oo_text(grid: &TextGrid) -> String {
    let mut out = String::new();
    out.push_str("File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\n");
    let _ = writeln!(out, "{}\n{}\n<exists>\n{}", grid.xmin, grid.xmax, grid.tiers.len());
    for tier in &grid.tiers {
        let _ = writeln!(
            out,
            "\"{}\"\n\"{}\"\n{}\n{}\n{}",
            tier.tier_type,
            quote(&tier.name),
            tier.xmin,
            tier.xmax,
            tier.entry_count()
        );
        for interval in &tier.intervals {
            let _ = writeln!(
                out,
                "{}\n{}\n\"{}\"",
                interval.xmin,
                interval.xmax,
                quote(&interval.text)
            );
        }
        for point in &tier.points {
            let _ = writeln!(out, "{}\n\"{}\"", point.time, quote(&point.mark));
        }
    }
    out
}

/// Chronological files list every entry once, across tiers, by start time.
fn write_chronological(grid: &TextGrid) -> String {
    let mut out = String::new();
    out.push_str("\"Praat chronological TextGrid text file\"\n");
    let _ = writeln!(out, "{} {}   ! Time domain.", grid.xmin, grid.xmax);
    let _ = writeln!(out, "{}   ! Number of tiers.", grid.tiers.len());
    for tier in &grid.tiers {
        let _ = writeln!(
            out,
            "\"{}\" \"{}\" {} {}",
            tier.tier_type,
            quote(&tier.name),
            tier.xmin,
            tier.xmax
        );
    }

    let mut records = grid
        .tiers
        .iter()
        .enumerate()
        .flat_map(|(i, tier)| chronological_records(i + 1, tier))
        .collect::<Vec<_>>();
    records.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (_, record) in records {
        out.push_str(&record);
    }
    out
}

fn chronological_records(index: usize, tier: &Tier) -> Vec<(f64, String)> {
    let intervals = tier.intervals.iter().map(move |interval| {
        (
            interval.xmin,
            format!(
                "{index} {} {}\n\"{}\"\n",
                interval.xmin,
                interval.xmax,
                quote(&interval.text)
            ),
        )
    });
    let points = tier.points.iter().map(move |point| {
        (
            point.time,
            format!("{index} {}\n\"{}\"\n", point.time, quote(&point.mark)),
        )
    });
    intervals.chain(points).collect()
}

fn quote(label: &str) -> String {
    label.replace('"', "\"\"")
}
