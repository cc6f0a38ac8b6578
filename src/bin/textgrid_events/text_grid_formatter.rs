use std::fs;
use std::path::{Path, PathBuf};

use textgrid_events::{write_textgrid, Dialect, TextGrid};

/// Writes `grid` next to `source` as `<stem><suffix>.TextGrid`.
pub fn write_converted(
    source: &Path,
    grid: &TextGrid,
    dialect: Dialect,
    suffix: &str,
) -> Result<PathBuf, String> {
    let out_path = build_textgrid_output_path(source, suffix)?;
    if out_path == source {
        return Err(format!(
            "Refusing to overwrite source TextGrid '{}'.",
            source.display()
        ));
    }
    fs::write(&out_path, write_textgrid(grid, dialect))
        .map_err(|err| format!("Failed to write TextGrid '{}': {err}", out_path.display()))?;
    Ok(out_path)
}

pub(crate) fn build_textgrid_output_path(source: &Path, suffix: &str) -> Result<PathBuf, String> {
    let stem = source
        .file_stem()
        .and_then(|value| value.to_str())
        .ok_or_else(|| {
            format!(
                "Failed to derive file stem for TextGrid path '{}'.",
                source.display()
            )
        })?;
    let file_name = format!("{stem}{suffix}.TextGrid");
    Ok(source.with_file_name(file_name))
}
