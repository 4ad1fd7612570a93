#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF rendering of cause list records.
//!
//! Produces a landscape table with the columns in
//! [`cause_list_models::COLUMN_HEADERS`], word-wrapped cells, alternating row
//! shading and the header row repeated on every page. Uses the PDF base-14
//! Helvetica fonts through [`lopdf`], so nothing needs to be installed.
//!
//! [`render`] builds the whole file in memory; [`write_report`] then writes
//! it in one step. An empty record list still yields a valid, header-only
//! report.

pub mod document;
pub mod layout;
pub mod text;

use std::path::{Path, PathBuf};

use cause_list_models::CaseRecord;
use chrono::{DateTime, Utc};

pub use layout::Geometry;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "Cause_List.pdf";

/// Default report title.
pub const DEFAULT_TITLE: &str = "District Court Cause List";

/// Errors that can occur while producing a report.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Building or serializing the PDF failed.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The report could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

/// Settings for a single report.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Title printed on the first page and stored in the document info.
    pub title: String,
    /// Where [`write_report`] puts the file.
    pub output_path: PathBuf,
    /// Page size, margins and type sizes.
    pub geometry: Geometry,
    /// Timestamp stored as the document creation date.
    pub generated_at: DateTime<Utc>,
    /// Compress content streams.
    pub compress: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            geometry: Geometry::default(),
            generated_at: Utc::now(),
            compress: true,
        }
    }
}

impl ReportOptions {
    /// Sets the report title.
    #[must_use]
    pub fn with_title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.title);
        self
    }

    /// Sets the output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }
}

/// Renders `records` to PDF bytes.
///
/// # Errors
///
/// Returns [`RenderError::Pdf`] if the document cannot be serialized.
pub fn render(records: &[CaseRecord], options: &ReportOptions) -> Result<Vec<u8>, RenderError> {
    let pages = layout::paginate(records, &options.geometry);
    log::debug!(
        "Laid out {} records on {} pages",
        records.len(),
        pages.len()
    );
    document::build(&pages, &options.geometry, options)
}

/// Renders `records` and writes them to `options.output_path`.
///
/// The file is only created once rendering has fully succeeded, via a
/// temporary sibling that is renamed into place, so a failure never leaves
/// a truncated report behind. Returns the path written.
///
/// # Errors
///
/// Returns [`RenderError::Pdf`] if rendering fails or [`RenderError::Io`] if
/// the file cannot be written.
pub fn write_report(
    records: &[CaseRecord],
    options: &ReportOptions,
) -> Result<PathBuf, RenderError> {
    let bytes = render(records, options)?;
    let path = options.output_path.clone();
    write_atomically(&path, &bytes)?;

    log::info!(
        "PDF created: {} ({} records, {} bytes)",
        path.display(),
        records.len(),
        bytes.len()
    );

    Ok(path)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    let io_err = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    if let Err(e) = std::fs::write(&tmp, bytes) {
        std::fs::remove_file(&tmp).ok();
        return Err(io_err(e));
    }

    std::fs::rename(&tmp, path).map_err(|e| {
        std::fs::remove_file(&tmp).ok();
        io_err(e)
    })
}
