use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use textgrid_events::{
    read_textgrid, Dialect, EventPipeline, EventPipelineBuilder, EventTable, TranscriptConfig,
};

#[path = "textgrid_events/json_event_formatter.rs"]
mod json_event_formatter;
#[path = "textgrid_events/text_grid_formatter.rs"]
mod text_grid_formatter;

use json_event_formatter::{EventReport, FileEvents, FileFailure, JsonlEventWriter, Meta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Jsonl,
    /// Re-emit each parsed TextGrid next to its source; no alignment is run.
    #[value(name = "textgrid")]
    TextGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialectChoice {
    #[value(name = "long")]
    OoText,
    #[value(name = "short")]
    ShortOoText,
    Chronological,
}

impl DialectChoice {
    fn dialect(self) -> Dialect {
        match self {
            Self::OoText => Dialect::OoText,
            Self::ShortOoText => Dialect::ShortOoText,
            Self::Chronological => Dialect::Chronological,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "textgrid_events")]
#[command(about = "Turn Praat TextGrid phoneme/word tiers into sentence, word and phoneme events")]
struct Args {
    /// TextGrid files or directories searched recursively for `*.TextGrid`.
    #[arg(
        required = true,
        env = "TEXTGRID_EVENTS_INPUTS",
        value_delimiter = ','
    )]
    inputs: Vec<PathBuf>,
    /// JSON transcript config (silence marker, stop labels, tier roles).
    #[arg(long, env = "TEXTGRID_EVENTS_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "TEXTGRID_EVENTS_OUT")]
    out: Option<PathBuf>,
    #[arg(long, env = "TEXTGRID_EVENTS_LIMIT")]
    limit: Option<usize>,
    #[arg(long, env = "TEXTGRID_EVENTS_OFFSET", default_value_t = 0)]
    offset: usize,
    #[arg(
        long,
        env = "TEXTGRID_EVENTS_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    #[arg(
        long,
        env = "TEXTGRID_EVENTS_TEXTGRID_DIALECT",
        value_enum,
        default_value_t = DialectChoice::OoText
    )]
    textgrid_dialect: DialectChoice,
    #[arg(
        long,
        env = "TEXTGRID_EVENTS_TEXTGRID_SUFFIX",
        default_value = ".converted"
    )]
    textgrid_suffix: String,
}

enum Sink {
    Report(Vec<FileEvents>),
    Jsonl(JsonlEventWriter),
    TextGrid { written: usize },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when at least one file failed.
fn run() -> Result<bool, String> {
    let args = Args::parse();
    let cwd = std::env::current_dir()
        .map_err(|err| format!("Failed to resolve working directory: {err}"))?;

    let config = match args.config.as_ref() {
        Some(path) => TranscriptConfig::load(&resolve_path(&cwd, path)).map_err(|e| e.to_string())?,
        None => TranscriptConfig::default(),
    };
    let silence_marker = config.silence_marker.clone();
    let pipeline = EventPipelineBuilder::new(config).build();

    let converting = args.output_format == OutputFormat::TextGrid;
    if converting && args.textgrid_suffix.is_empty() {
        return Err("--textgrid-suffix must not be empty.".to_string());
    }

    let mut files = Vec::new();
    for input in &args.inputs {
        let input = resolve_path(&cwd, input);
        require_path_exists(&input, "Missing input path.")?;
        if input.is_dir() {
            let mut found = Vec::new();
            collect_textgrid_files(&input, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            files.push(input);
        }
    }
    if converting {
        files.retain(|path| {
            let skip = is_converted_output(path, &args.textgrid_suffix);
            if skip {
                tracing::debug!(path = %path.display(), "textgrid_events: skipping earlier output");
            }
            !skip
        });
    }
    if args.offset > 0 {
        files = files.into_iter().skip(args.offset).collect();
    }
    if let Some(limit) = args.limit {
        files.truncate(limit);
    }
    if files.is_empty() {
        return Err("No TextGrid files selected after applying offset/limit.".to_string());
    }
    let out_path = match args.output_format {
        OutputFormat::Json => Some(resolve_out_path(&cwd, args.out.as_ref(), "json")),
        OutputFormat::Jsonl => Some(resolve_out_path(&cwd, args.out.as_ref(), "jsonl")),
        OutputFormat::TextGrid => None,
    };
    let mut sink = match (args.output_format, out_path.as_ref()) {
        (OutputFormat::Jsonl, Some(path)) => Sink::Jsonl(JsonlEventWriter::create(path)?),
        (OutputFormat::TextGrid, _) => Sink::TextGrid { written: 0 },
        _ => Sink::Report(Vec::with_capacity(files.len())),
    };

    let mut failures = Vec::new();
    let mut work_elapsed = Duration::ZERO;
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    progress.set_message("starting...");

    for path in &files {
        let display = path.to_string_lossy().replace('\\', "/");
        progress.set_message(display.clone());
        let started = Instant::now();
        let outcome = process_file(&pipeline, path, &display, &mut sink, &args);
        work_elapsed += started.elapsed();
        if let Err(error) = outcome {
            tracing::warn!(path = %display, %error, "textgrid_events: file failed");
            failures.push(FileFailure {
                path: display,
                error,
            });
        }
        progress.inc(1);
    }
    progress.finish_with_message("event pass complete");

    let work_seconds = work_elapsed.as_secs_f64();
    println!(
        "work_elapsed: {:.2}s ({}) avg_per_file: {:.2}ms",
        work_seconds,
        format_duration_hms(work_elapsed),
        work_seconds * 1000.0 / files.len() as f64
    );

    let ok = failures.is_empty();
    match sink {
        Sink::Report(per_file) => {
            let out_path = out_path
                .ok_or_else(|| "internal error: missing output path for JSON report".to_string())?;
            let report = EventReport {
                schema_version: json_event_formatter::SCHEMA_VERSION,
                meta: Meta {
                    generated_at: Utc::now().to_rfc3339(),
                    silence_marker,
                    file_count: files.len(),
                },
                files: per_file,
                failures,
            };
            json_event_formatter::write_report(&out_path, &report)?;
            println!("{}", out_path.display());
        }
        Sink::Jsonl(writer) => {
            let lines = writer.finish()?;
            report_failures(&failures);
            if let Some(out_path) = out_path {
                println!("Wrote {lines} event line(s) to {}", out_path.display());
            }
        }
        Sink::TextGrid { written } => {
            report_failures(&failures);
            println!(
                "Wrote {written} TextGrid file(s) with suffix '{}'.",
                args.textgrid_suffix
            );
        }
    }
    Ok(ok)
}

fn process_file(
    pipeline: &EventPipeline,
    path: &Path,
    display: &str,
    sink: &mut Sink,
    args: &Args,
) -> Result<(), String> {
    match sink {
        Sink::Report(per_file) => {
            let events = align(pipeline, path)?;
            per_file.push(FileEvents {
                path: display.to_string(),
                events,
            });
        }
        Sink::Jsonl(writer) => {
            let events = align(pipeline, path)?;
            writer.append(display, &events)?;
        }
        Sink::TextGrid { written } => {
            let grid = read_textgrid(path).map_err(|e| e.to_string())?;
            text_grid_formatter::write_converted(
                path,
                &grid,
                args.textgrid_dialect.dialect(),
                &args.textgrid_suffix,
            )?;
            *written += 1;
        }
    }
    Ok(())
}

fn align(pipeline: &EventPipeline, path: &Path) -> Result<EventTable, String> {
    pipeline.parse_and_align(path).map_err(|e| e.to_string())
}

fn report_failures(failures: &[FileFailure]) {
    for failure in failures {
        eprintln!("{}: {}", failure.path, failure.error);
    }
    if !failures.is_empty() {
        eprintln!("{} file(s) failed.", failures.len());
    }
}

fn resolve_out_path(cwd: &Path, out: Option<&PathBuf>, extension: &str) -> PathBuf {
    match out {
        Some(path) => resolve_path(cwd, path),
        None => cwd.join(format!("textgrid_events.{extension}")),
    }
}

fn collect_textgrid_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read directory '{}': {err}", dir.display()))?;
    for entry in entries {
        let entry = entry.map_err(|err| {
            format!(
                "Failed to read directory entry in '{}': {err}",
                dir.display()
            )
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_textgrid_files(&path, out)?;
            continue;
        }
        if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("TextGrid"))
        {
            out.push(path);
        }
    }
    Ok(())
}

/// True for files written by an earlier textgrid-mode run (`<stem><suffix>.TextGrid`).
fn is_converted_output(path: &Path, suffix: &str) -> bool {
    !suffix.is_empty()
        && path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.ends_with(suffix))
}

fn resolve_path(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn format_duration_hms(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    Err(format!("{message} Missing path: {}", path.display()))
}
