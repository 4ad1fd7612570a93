//! Splits data rows into their logical columns.

use cause_list_models::{RawFields, RawRow};

use crate::RowError;
use crate::config::ColumnLayout;

/// Pulls the four logical fields out of a data row by column position.
///
/// Text is passed through untouched, line breaks included.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor {
    columns: ColumnLayout,
}

impl FieldExtractor {
    /// Creates an extractor for the given column layout.
    #[must_use]
    pub const fn new(columns: ColumnLayout) -> Self {
        Self { columns }
    }

    /// Fewest cells a row must have.
    #[must_use]
    pub fn min_cells(&self) -> usize {
        self.columns.min_cells()
    }

    /// Extracts the raw fields of `row`.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::MalformedRow`] if the row is too short to hold
    /// every configured column.
    pub fn extract(&self, row: &RawRow) -> Result<RawFields, RowError> {
        let required = self.min_cells();
        if row.width() < required {
            return Err(RowError::MalformedRow {
                found: row.width(),
                required,
            });
        }

        let cell = |index: usize| row.cell(index).unwrap_or_default().to_owned();

        Ok(RawFields {
            serial: cell(self.columns.serial),
            case_info_raw: cell(self.columns.case_info),
            party_raw: cell(self.columns.party),
            advocate_raw: cell(self.columns.advocate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fields_in_source_order() {
        let row = RawRow::new(["3", "CC/9/2021\nView", "A\nversus\nB", "X,\nY"]);
        let fields = FieldExtractor::default().extract(&row).unwrap();

        assert_eq!(fields.serial, "3");
        assert_eq!(fields.case_info_raw, "CC/9/2021\nView");
        assert_eq!(fields.party_raw, "A\nversus\nB");
        assert_eq!(fields.advocate_raw, "X,\nY");
    }

    #[test]
    fn ignores_extra_trailing_cells() {
        let row = RawRow::new(["1", "a", "b", "c", "court hall 4"]);
        let fields = FieldExtractor::default().extract(&row).unwrap();
        assert_eq!(fields.advocate_raw, "c");
    }

    #[test]
    fn short_rows_are_malformed() {
        let row = RawRow::new(["1", "CC/9/2021"]);
        assert_eq!(
            FieldExtractor::default().extract(&row),
            Err(RowError::MalformedRow {
                found: 2,
                required: 4
            })
        );
    }

    #[test]
    fn honours_custom_layout() {
        let extractor = FieldExtractor::new(ColumnLayout {
            serial: 0,
            case_info: 2,
            party: 3,
            advocate: 4,
        });
        let row = RawRow::new(["9", "ignored", "CS/1/2000", "P versus R", "Adv"]);
        let fields = extractor.extract(&row).unwrap();

        assert_eq!(fields.serial_number(), Some(9));
        assert_eq!(fields.case_info_raw, "CS/1/2000");
        assert_eq!(fields.advocate_raw, "Adv");
    }
}
