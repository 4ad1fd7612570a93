//! Snapshot -> records -> report.
//!
//! Glue between the table reader, the extraction engine and the renderer.
//! Each step logs what it did; row-level problems are logged by the
//! assembler and never stop the run.

use std::path::{Path, PathBuf};

use cause_list_extract::{Assembly, ExtractConfig, RecordAssembler};
use cause_list_models::{CaseRecord, RawRow, RowKind};
use cause_list_pdf::ReportOptions;
use cause_list_scraper::HtmlTableReader;

/// Longest row preview printed by `classify`.
const PREVIEW_CHARS: usize = 80;

/// Where the rows come from and how to read them.
pub struct Source {
    /// Saved HTML page.
    pub input: PathBuf,
    /// Optional extraction config file.
    pub config: Option<PathBuf>,
    /// CSS selector of the results table.
    pub table: String,
}

impl Source {
    fn load_config(&self) -> Result<ExtractConfig, cause_list_extract::ConfigError> {
        self.config
            .as_deref()
            .map_or_else(|| Ok(ExtractConfig::default()), ExtractConfig::from_path)
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, cause_list_scraper::ScrapeError> {
        HtmlTableReader::new()
            .with_table_selector(&self.table)
            .read_file(&self.input)
    }

    fn assemble(&self) -> Result<Assembly, Box<dyn std::error::Error>> {
        let assembler = RecordAssembler::new(&self.load_config()?)?;
        let rows = self.read_rows()?;
        Ok(assembler.assemble(&rows))
    }
}

/// Extracts the records of `source`.
///
/// # Errors
///
/// Returns an error if the config or snapshot cannot be read.
pub fn extract(source: &Source) -> Result<Vec<CaseRecord>, Box<dyn std::error::Error>> {
    Ok(source.assemble()?.records)
}

/// Extracts the records of `source` and writes them to `output`.
///
/// An empty table still produces a (header-only) report.
///
/// # Errors
///
/// Returns an error if the inputs cannot be read or the report cannot be
/// written.
pub fn render(
    source: &Source,
    output: &Path,
    title: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let assembly = source.assemble()?;

    if assembly.records.is_empty() {
        log::warn!(
            "No valid case data found in {}; make sure the table had fully loaded before saving",
            source.input.display()
        );
    }
    if !assembly.warnings.is_empty() {
        log::warn!(
            "{} rows needed attention; see warnings above",
            assembly.warnings.len()
        );
    }

    let options = ReportOptions::default()
        .with_title(title)
        .with_output_path(output);

    Ok(cause_list_pdf::write_report(&assembly.records, &options)?)
}

/// The configuration `render` would use, as TOML.
///
/// Without a file this is the commented default; with one it is the file
/// merged over the defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or serialized.
pub fn effective_config(path: Option<&Path>) -> Result<String, cause_list_extract::ConfigError> {
    match path {
        None => Ok(cause_list_extract::config::DEFAULT_CONFIG_TOML.to_owned()),
        Some(path) => ExtractConfig::from_path(path)?.to_toml(),
    }
}

/// Classifies every row of `source`.
///
/// # Errors
///
/// Returns an error if the config or snapshot cannot be read.
pub fn classify(
    source: &Source,
) -> Result<Vec<(usize, RawRow, RowKind)>, Box<dyn std::error::Error>> {
    let assembler = RecordAssembler::new(&source.load_config()?)?;
    let classifier = assembler.classifier();

    Ok(source
        .read_rows()?
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            let kind = classifier.classify(&row);
            (index, row, kind)
        })
        .collect())
}

/// One-line summary of a row's cells.
#[must_use]
pub fn preview(row: &RawRow) -> String {
    let joined = row
        .cells
        .iter()
        .map(|cell| cell.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" | ");

    if joined.chars().count() > PREVIEW_CHARS {
        let cut: String = joined.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        joined
    }
}
