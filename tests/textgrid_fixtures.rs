use std::fs;
use std::path::{Path, PathBuf};

use libtest_mimic::{Arguments, Failed, Trial};
use serde::Deserialize;
use textgrid_events::{
    parse_textgrid, write_textgrid, Dialect, EventKind, EventPipelineBuilder, TextGrid,
};

const SUITE_NAME: &str = "textgrid_fixtures";
const FIXTURE_DIR: &str = "test-data/textgrids";

#[derive(Debug, Deserialize)]
struct Expectation {
    /// Substring of the parse error; when set, nothing else is checked.
    format_error: Option<String>,
    dialect: Option<String>,
    xmin: Option<f64>,
    xmax: Option<f64>,
    #[serde(default)]
    tiers: Vec<ExpectedTier>,
    alignment: Option<ExpectedAlignment>,
    alignment_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpectedTier {
    name: String,
    class: String,
    entries: usize,
}

#[derive(Debug, Deserialize)]
struct ExpectedAlignment {
    sentences: Vec<String>,
    words: usize,
    phonemes: usize,
    events: usize,
}

#[derive(Debug)]
struct Fixture {
    name: String,
    textgrid: PathBuf,
    expected: PathBuf,
}

fn main() {
    let args = Arguments::from_args();
    let repo_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    let fixtures = match load_fixtures(&repo_root.join(FIXTURE_DIR)) {
        Ok(fixtures) => fixtures,
        Err(err) => {
            run_setup_failure(&args, err);
            return;
        }
    };
    if fixtures.is_empty() {
        run_setup_failure(&args, format!("No fixtures found under {FIXTURE_DIR}."));
        return;
    }

    let mut tests = Vec::with_capacity(fixtures.len() * 2);
    for fixture in fixtures {
        let name = fixture.name.clone();
        let textgrid = fixture.textgrid.clone();
        tests.push(Trial::test(
            format!("{SUITE_NAME}::parse::{name}"),
            move || run_fixture(&fixture).map_err(Failed::from),
        ));
        tests.push(Trial::test(
            format!("{SUITE_NAME}::rewrite::{name}"),
            move || run_rewrite(&textgrid).map_err(Failed::from),
        ));
    }

    libtest_mimic::run(&args, tests).exit();
}

fn run_setup_failure(args: &Arguments, message: String) {
    let test = Trial::test(format!("{SUITE_NAME}::setup"), move || {
        Err(Failed::from(message))
    });
    libtest_mimic::run(args, vec![test]).exit();
}

fn load_fixtures(dir: &Path) -> Result<Vec<Fixture>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|err| format!("Failed to read fixture directory '{}': {err}", dir.display()))?;
    let mut fixtures = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| format!("Failed to read entry in '{}': {err}", dir.display()))?
            .path();
        let is_textgrid = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("TextGrid"));
        if !is_textgrid {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("Fixture '{}' has no usable stem.", path.display()))?
            .to_string();
        let expected = path.with_file_name(format!("{name}.expected.json"));
        if !expected.exists() {
            return Err(format!(
                "Fixture '{}' is missing its expectation file '{}'.",
                path.display(),
                expected.display()
            ));
        }
        fixtures.push(Fixture {
            name,
            textgrid: path,
            expected,
        });
    }
    fixtures.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(fixtures)
}

fn run_fixture(fixture: &Fixture) -> Result<(), String> {
    let text = read(&fixture.textgrid)?;
    let expected: Expectation = serde_json::from_str(&read(&fixture.expected)?)
        .map_err(|err| format!("Failed to parse '{}': {err}", fixture.expected.display()))?;

    let grid = match (parse_textgrid(&text), expected.format_error.as_deref()) {
        (Err(err), Some(fragment)) => {
            return expect_contains("format error", &err.to_string(), fragment);
        }
        (Ok(_), Some(fragment)) => {
            return Err(format!("expected format error containing '{fragment}', parsed fine"));
        }
        (Err(err), None) => return Err(format!("unexpected format error: {err}")),
        (Ok(grid), None) => grid,
    };

    check_grid(&grid, &expected)?;

    let pipeline = EventPipelineBuilder::default().build();
    match (
        pipeline.align_grid(&grid),
        &expected.alignment,
        expected.alignment_error.as_deref(),
    ) {
        (Err(err), _, Some(fragment)) => expect_contains("alignment error", &err.to_string(), fragment),
        (Ok(_), _, Some(fragment)) => Err(format!(
            "expected alignment error containing '{fragment}', aligned fine"
        )),
        (Err(err), _, None) => Err(format!("unexpected alignment error: {err}")),
        (Ok(table), Some(alignment), None) => {
            let sentences = table
                .of_kind(EventKind::Sound)
                .map(|event| event.word_sequence.clone())
                .collect::<Vec<_>>();
            check_eq("sentences", &sentences, &alignment.sentences)?;
            check_eq("words", &table.of_kind(EventKind::Word).count(), &alignment.words)?;
            check_eq(
                "phonemes",
                &table.of_kind(EventKind::Phoneme).count(),
                &alignment.phonemes,
            )?;
            check_eq("events", &table.len(), &alignment.events)?;
            let ordered = table
                .events()
                .windows(2)
                .all(|pair| pair[0].start <= pair[1].start);
            if !ordered {
                return Err("events are not ordered by start".to_string());
            }
            Ok(())
        }
        (Ok(_), None, None) => Ok(()),
    }
}

fn check_grid(grid: &TextGrid, expected: &Expectation) -> Result<(), String> {
    if let Some(dialect) = expected.dialect.as_deref() {
        let actual = serde_json::to_value(grid.dialect).map_err(|err| err.to_string())?;
        check_eq("dialect", &actual.as_str().unwrap_or_default(), &dialect)?;
    }
    if let Some(xmin) = expected.xmin {
        check_eq("xmin", &grid.xmin, &xmin)?;
    }
    if let Some(xmax) = expected.xmax {
        check_eq("xmax", &grid.xmax, &xmax)?;
    }
    check_eq("tier count", &grid.size(), &expected.tiers.len())?;
    for (tier, want) in grid.tiers.iter().zip(&expected.tiers) {
        check_eq("tier name", &tier.name.as_str(), &want.name.as_str())?;
        check_eq("tier class", &tier.tier_type.as_str(), &want.class.as_str())?;
        check_eq(
            &format!("entries of '{}'", tier.name),
            &tier.entry_count(),
            &want.entries,
        )?;
        if let Some(declared) = tier.size {
            check_eq(&format!("declared size of '{}'", tier.name), &declared, &want.entries)?;
        }
    }
    Ok(())
}

/// Every parsable fixture survives being written in each dialect and read back.
fn run_rewrite(path: &Path) -> Result<(), String> {
    let Ok(grid) = parse_textgrid(&read(path)?) else {
        return Ok(());
    };
    for dialect in [Dialect::OoText, Dialect::ShortOoText, Dialect::Chronological] {
        let written = write_textgrid(&grid, dialect);
        let reparsed = parse_textgrid(&written)
            .map_err(|err| format!("{} rewrite failed to parse: {err}", dialect.as_str()))?;
        check_eq("rewritten dialect", &reparsed.dialect, &dialect)?;
        check_eq("rewritten bounds", &(reparsed.xmin, reparsed.xmax), &(grid.xmin, grid.xmax))?;
        for (before, after) in grid.tiers.iter().zip(&reparsed.tiers) {
            check_eq("rewritten intervals", &after.intervals, &before.intervals)?;
            check_eq("rewritten points", &after.points, &before.points)?;
        }
        check_eq("rewritten tier count", &reparsed.size(), &grid.size())?;
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

fn check_eq<T: PartialEq + std::fmt::Debug>(what: &str, actual: &T, expected: &T) -> Result<(), String> {
    if actual == expected {
        Ok(())
    } else {
        Err(format!("{what}: expected {expected:?}, got {actual:?}"))
    }
}

fn expect_contains(what: &str, message: &str, fragment: &str) -> Result<(), String> {
    if message.contains(fragment) {
        Ok(())
    } else {
        Err(format!("{what} '{message}' does not mention '{fragment}'"))
    }
}
