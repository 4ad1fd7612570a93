#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Raw table rows and normalized case record types.
//!
//! A cause list arrives as a snapshot of the court portal's results table:
//! one [`RawRow`] per `<tr>`, one string per cell. The extraction engine tags
//! each row with a [`RowKind`], splits data rows into [`RawFields`] and
//! finally produces the durable [`CaseRecord`]s that the report renderer
//! consumes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Column headers of the rendered report, in output order.
pub const COLUMN_HEADERS: [&str; 4] = ["Sr No", "Case Info", "Party Name", "Advocate"];

/// One row of the source table as captured from the page.
///
/// Cell text is kept verbatim, including embedded line breaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    /// Cell text in source column order.
    pub cells: Vec<String>,
    /// Whether any source cell spanned several columns (`colspan`).
    #[serde(default)]
    pub spans_columns: bool,
}

impl RawRow {
    /// Creates a row from its cell texts.
    #[must_use]
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            spans_columns: false,
        }
    }

    /// Marks the row as containing a column-spanning cell.
    #[must_use]
    pub const fn with_column_span(mut self, spans: bool) -> Self {
        self.spans_columns = spans;
        self
    }

    /// Number of cells in the row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Returns the cell at `index`, if present.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Iterates over cells that contain something other than whitespace,
    /// trimmed.
    pub fn non_blank_cells(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.trim()).filter(|c| !c.is_empty())
    }

    /// Whether every cell is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.non_blank_cells().next().is_none()
    }
}

/// Classification of a [`RawRow`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RowKind {
    /// A case row, or a continuation of one.
    Data,
    /// A label for a group of cases (e.g. "Urgent Cases").
    SectionHeader,
    /// Blank or decorative row.
    Noise,
}

/// A data row split into its logical columns, still un-normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    /// Raw text of the serial number cell.
    pub serial: String,
    /// Raw text of the case number / type cell.
    pub case_info_raw: String,
    /// Raw text of the party names cell.
    pub party_raw: String,
    /// Raw text of the advocates cell.
    pub advocate_raw: String,
}

impl RawFields {
    /// Parses the serial cell as a positive integer.
    ///
    /// Accepts surrounding whitespace and a single trailing `.` or `)`
    /// (`"12."`, `"12)"`). Returns `None` for empty or non-numeric cells.
    #[must_use]
    pub fn serial_number(&self) -> Option<u32> {
        parse_serial(&self.serial)
    }
}

/// Parses a serial-number cell. See [`RawFields::serial_number`].
#[must_use]
pub fn parse_serial(cell: &str) -> Option<u32> {
    let trimmed = cell.trim();
    let digits = trimmed
        .strip_suffix('.')
        .or_else(|| trimmed.strip_suffix(')'))
        .unwrap_or(trimmed)
        .trim_end();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

/// A single case of the cause list, fully normalized.
///
/// Every text field is free of line breaks, leading/trailing whitespace and
/// repeated internal whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Serial number as printed in the source table. `None` when the record
    /// was opened by a continuation row with no preceding case.
    pub serial: Option<u32>,
    /// Case number/type plus any next-hearing annotation.
    pub case_info: String,
    /// Petitioner and respondent, usually separated by "versus".
    pub party_name: String,
    /// Comma-separated advocate names.
    pub advocates: String,
}

impl CaseRecord {
    /// The serial number as report cell text (empty when unknown).
    #[must_use]
    pub fn serial_text(&self) -> String {
        self.serial.map(|n| n.to_string()).unwrap_or_default()
    }

    /// The record as report cells, in [`COLUMN_HEADERS`] order.
    #[must_use]
    pub fn cells(&self) -> [String; 4] {
        [
            self.serial_text(),
            self.case_info.clone(),
            self.party_name.clone(),
            self.advocates.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_punctuated_serials() {
        assert_eq!(parse_serial("5"), Some(5));
        assert_eq!(parse_serial(" 12. "), Some(12));
        assert_eq!(parse_serial("7)"), Some(7));
        assert_eq!(parse_serial("\n42\n"), Some(42));
    }

    #[test]
    fn rejects_non_numeric_serials() {
        assert_eq!(parse_serial(""), None);
        assert_eq!(parse_serial("   "), None);
        assert_eq!(parse_serial("0"), None);
        assert_eq!(parse_serial("-3"), None);
        assert_eq!(parse_serial("12a"), None);
        assert_eq!(parse_serial("Sr No"), None);
        assert_eq!(parse_serial("99999999999"), None);
    }

    #[test]
    fn row_kind_round_trips_through_strings() {
        assert_eq!(RowKind::SectionHeader.to_string(), "section_header");
        assert_eq!(
            "Section_Header".parse::<RowKind>().ok(),
            Some(RowKind::SectionHeader)
        );
        assert_eq!("noise".parse::<RowKind>().ok(), Some(RowKind::Noise));
    }

    #[test]
    fn blank_rows_are_detected() {
        assert!(RawRow::new(["", "  ", "\n\t"]).is_blank());
        assert!(RawRow::default().is_blank());
        assert!(!RawRow::new(["", "x"]).is_blank());
    }

    #[test]
    fn unknown_serial_renders_as_empty_cell() {
        let record = CaseRecord {
            serial: None,
            case_info: "CC/1/2024".to_owned(),
            party_name: String::new(),
            advocates: String::new(),
        };
        assert_eq!(record.cells()[0], "");
    }

    #[test]
    fn records_serialize_camel_case() {
        let record = CaseRecord {
            serial: Some(3),
            case_info: "A".to_owned(),
            party_name: "B".to_owned(),
            advocates: "C".to_owned(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["serial"], 3);
        assert_eq!(json["caseInfo"], "A");
        assert_eq!(json["partyName"], "B");
    }
}
