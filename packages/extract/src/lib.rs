#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record extraction and normalization for court cause list tables.
//!
//! The engine is a short pipeline over a table snapshot:
//!
//! 1. [`classify::RowClassifier`] tags each [`RawRow`] as data, section
//!    header or noise.
//! 2. [`fields::FieldExtractor`] splits data rows into their four logical
//!    columns.
//! 3. [`normalize::Normalizer`] cleans each column's text.
//! 4. [`assemble::RecordAssembler`] drives the above, merges continuation
//!    rows into the case they belong to and emits [`CaseRecord`]s.
//!
//! Everything here is synchronous and in-memory. Problems with individual
//! rows never abort a run; they are logged and collected as
//! [`AssemblyWarning`]s next to the records.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod fields;
pub mod normalize;

use std::path::PathBuf;

use cause_list_models::{CaseRecord, RawRow};

pub use assemble::{Assembly, RecordAssembler};
pub use config::{ClassifierConfig, ColumnLayout, ExtractConfig, NormalizeRules};

/// Errors in the extraction configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has unexpected fields.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration could not be written out as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A normalization rule could not be compiled into a matcher.
    #[error("invalid normalization rule: {0}")]
    Pattern(#[from] regex::Error),

    /// The column layout is inconsistent.
    #[error("invalid column layout: {0}")]
    Columns(String),
}

/// A problem with a single row that prevents it from being used as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    /// A data row has fewer cells than the column layout needs.
    #[error("malformed row: {found} cells, at least {required} required")]
    MalformedRow {
        /// Cells present in the row.
        found: usize,
        /// Cells required by the column layout.
        required: usize,
    },

    /// A continuation row appeared while no case was open.
    #[error("continuation row with no preceding case")]
    OrphanContinuation,
}

/// Non-fatal findings of an assembly run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyWarning {
    /// A row was skipped or reinterpreted.
    #[error("row {row}: {source}")]
    Row {
        /// Zero-based position of the row in the input.
        row: usize,
        /// What was wrong with it.
        source: RowError,
    },

    /// Serial numbers skipped ahead.
    #[error("row {row}: serial jumped from {previous} to {current}")]
    SerialGap {
        /// Zero-based position of the row in the input.
        row: usize,
        /// Last serial seen before this row.
        previous: u32,
        /// Serial on this row.
        current: u32,
    },

    /// Serial numbers repeated or went backwards.
    #[error("row {row}: serial {current} does not follow {previous}")]
    SerialDisorder {
        /// Zero-based position of the row in the input.
        row: usize,
        /// Last serial seen before this row.
        previous: u32,
        /// Serial on this row.
        current: u32,
    },
}

/// Assembles `rows` with the default configuration and returns only the
/// records. Warnings are still logged.
///
/// # Panics
///
/// Panics if the built-in normalization rules fail to compile, which they
/// are tested not to.
#[must_use]
pub fn assemble(rows: &[RawRow]) -> Vec<CaseRecord> {
    RecordAssembler::new(&ExtractConfig::default())
        .unwrap_or_else(|e| panic!("built-in extraction config is invalid: {e}"))
        .assemble(rows)
        .records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_records() {
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn end_to_end_single_case() {
        let rows = [RawRow::new([
            "1",
            "SUIT/109794/1999\nNext hearing date:- 15-10-2025",
            "Suresh Ramchand Mehta (Targeted Matter)\nversus\nGalaxy Corporation",
            "Kudalkar S M ASSOCIATES,\nVijay B Mishra",
        ])];

        let records = assemble(&rows);

        assert_eq!(
            records,
            vec![CaseRecord {
                serial: Some(1),
                case_info: "SUIT/109794/1999 \u{2014} Next hearing date: 15-10-2025".to_owned(),
                party_name: "Suresh Ramchand Mehta (Targeted Matter) versus Galaxy Corporation"
                    .to_owned(),
                advocates: "Kudalkar S M ASSOCIATES, Vijay B Mishra".to_owned(),
            }]
        );
    }

    #[test]
    fn warnings_render_with_row_position() {
        let warning = AssemblyWarning::Row {
            row: 3,
            source: RowError::MalformedRow {
                found: 2,
                required: 4,
            },
        };
        assert_eq!(
            warning.to_string(),
            "row 3: malformed row: 2 cells, at least 4 required"
        );
    }
}
