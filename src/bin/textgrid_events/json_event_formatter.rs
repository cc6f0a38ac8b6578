use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use textgrid_events::{Event, EventTable};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub silence_marker: String,
    pub file_count: usize,
}

#[derive(Debug, Serialize)]
pub struct FileEvents {
    pub path: String,
    pub events: EventTable,
}

#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct EventReport {
    pub schema_version: u32,
    pub meta: Meta,
    pub files: Vec<FileEvents>,
    pub failures: Vec<FileFailure>,
}

#[derive(Serialize)]
struct EventLine<'a> {
    path: &'a str,
    #[serde(flatten)]
    event: &'a Event,
}

pub fn write_report(path: &Path, report: &EventReport) -> Result<(), String> {
    ensure_parent_directory(path)?;
    let mut file = File::create(path)
        .map_err(|err| format!("Failed to create report file '{}': {err}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, report).map_err(|err| {
        format!(
            "Failed to serialize report JSON '{}': {err}",
            path.display()
        )
    })?;
    file.write_all(b"\n")
        .map_err(|err| format!("Failed to finalize report file '{}': {err}", path.display()))
}

/// One event per line, each tagged with the TextGrid it came from.
pub struct JsonlEventWriter {
    writer: BufWriter<File>,
    lines: usize,
}

impl JsonlEventWriter {
    pub fn create(path: &Path) -> Result<Self, String> {
        ensure_parent_directory(path)?;
        let file = File::create(path)
            .map_err(|err| format!("Failed to create JSONL file '{}': {err}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn append(&mut self, source: &str, events: &EventTable) -> Result<(), String> {
        for event in events {
            let line = EventLine {
                path: source,
                event,
            };
            serde_json::to_writer(&mut self.writer, &line).map_err(|err| {
                format!("Failed to serialize event JSONL record for '{source}': {err}")
            })?;
            self.writer
                .write_all(b"\n")
                .map_err(|err| format!("Failed to write JSONL record for '{source}': {err}"))?;
            self.lines += 1;
        }
        Ok(())
    }

    /// Flushes and returns the number of lines written.
    pub fn finish(mut self) -> Result<usize, String> {
        self.writer
            .flush()
            .map_err(|err| format!("Failed finalizing event JSONL writer: {err}"))?;
        Ok(self.lines)
    }
}

fn ensure_parent_directory(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })
        }
        _ => Ok(()),
    }
}
