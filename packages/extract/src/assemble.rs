//! Record assembly.
//!
//! Walks the table snapshot in order, feeding each row through the
//! classifier, the field extractor and the normalizer, and merges rows that
//! continue a case into that case.
//!
//! The walk is a two-state machine:
//!
//! * **awaiting** — no case is open;
//! * **accumulating** — a case is open and continuation rows are appended
//!   to it line by line.
//!
//! A section header or noise row closes the open case. A data row with a new
//! serial closes it and opens the next one. A data row without a serial is a
//! continuation; if no case is open it opens one with an unknown serial.

use cause_list_models::{CaseRecord, RawFields, RawRow, RowKind};

use crate::classify::RowClassifier;
use crate::config::ExtractConfig;
use crate::fields::FieldExtractor;
use crate::normalize::Normalizer;
use crate::{AssemblyWarning, ConfigError, RowError};

/// Output of one assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Records in input order.
    pub records: Vec<CaseRecord>,
    /// Everything that was skipped, reinterpreted or out of sequence.
    pub warnings: Vec<AssemblyWarning>,
}

/// Turns a table snapshot into [`CaseRecord`]s.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    classifier: RowClassifier,
    extractor: FieldExtractor,
    normalizer: Normalizer,
}

impl RecordAssembler {
    /// Builds an assembler from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is inconsistent or a
    /// normalization rule fails to compile.
    pub fn new(config: &ExtractConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            classifier: RowClassifier::new(&config.classifier),
            extractor: FieldExtractor::new(config.columns),
            normalizer: Normalizer::new(&config.normalize)?,
        })
    }

    /// The row classifier this assembler uses.
    #[must_use]
    pub const fn classifier(&self) -> &RowClassifier {
        &self.classifier
    }

    /// Assembles every row of a snapshot.
    pub fn assemble<'a, I>(&self, rows: I) -> Assembly
    where
        I: IntoIterator<Item = &'a RawRow>,
    {
        let mut run = Run::new(self);

        for (index, row) in rows.into_iter().enumerate() {
            run.feed(index, row);
        }

        let assembly = run.finish();

        log::info!(
            "Assembled {} records ({} warnings)",
            assembly.records.len(),
            assembly.warnings.len()
        );

        assembly
    }
}

/// A case whose rows are still being collected.
#[derive(Debug)]
struct PendingRecord {
    serial: Option<u32>,
    case_info: Vec<String>,
    party: Vec<String>,
    advocates: Vec<String>,
}

impl PendingRecord {
    fn seed(serial: Option<u32>, fields: RawFields) -> Self {
        Self {
            serial,
            case_info: vec![fields.case_info_raw],
            party: vec![fields.party_raw],
            advocates: vec![fields.advocate_raw],
        }
    }

    fn append(&mut self, fields: RawFields) {
        self.case_info.push(fields.case_info_raw);
        self.party.push(fields.party_raw);
        self.advocates.push(fields.advocate_raw);
    }
}

#[derive(Debug)]
enum State {
    AwaitingRecord,
    AccumulatingContinuation(PendingRecord),
}

/// Mutable state of a single [`RecordAssembler::assemble`] call.
struct Run<'a> {
    assembler: &'a RecordAssembler,
    state: State,
    last_serial: Option<u32>,
    assembly: Assembly,
}

impl<'a> Run<'a> {
    fn new(assembler: &'a RecordAssembler) -> Self {
        Self {
            assembler,
            state: State::AwaitingRecord,
            last_serial: None,
            assembly: Assembly::default(),
        }
    }

    fn feed(&mut self, index: usize, row: &RawRow) {
        let kind = self.assembler.classifier.classify(row);
        log::trace!("row {index}: {kind} ({} cells)", row.width());

        match kind {
            RowKind::SectionHeader | RowKind::Noise => {
                if kind == RowKind::SectionHeader {
                    log::debug!(
                        "row {index}: section header {:?}",
                        row.non_blank_cells().collect::<Vec<_>>().join(" ")
                    );
                }
                self.close();
            }
            RowKind::Data => self.feed_data(index, row),
        }
    }

    fn feed_data(&mut self, index: usize, row: &RawRow) {
        let fields = match self.assembler.extractor.extract(row) {
            Ok(fields) => fields,
            Err(source) => {
                self.warn(AssemblyWarning::Row { row: index, source });
                return;
            }
        };

        let serial = fields.serial_number();

        if let State::AccumulatingContinuation(pending) = &mut self.state {
            // No serial, or the same serial repeated on a wrapped row.
            if serial.is_none() || serial == pending.serial {
                pending.append(fields);
                return;
            }
        }

        if let Some(n) = serial {
            self.close();
            self.check_sequence(index, n);
        } else {
            self.warn(AssemblyWarning::Row {
                row: index,
                source: RowError::OrphanContinuation,
            });
        }

        self.state = State::AccumulatingContinuation(PendingRecord::seed(serial, fields));
    }

    fn check_sequence(&mut self, index: usize, current: u32) {
        if let Some(previous) = self.last_serial {
            if current <= previous {
                self.warn(AssemblyWarning::SerialDisorder {
                    row: index,
                    previous,
                    current,
                });
            } else if current > previous + 1 {
                self.warn(AssemblyWarning::SerialGap {
                    row: index,
                    previous,
                    current,
                });
            }
        }
        self.last_serial = Some(current);
    }

    /// Normalizes and emits the open case, if any.
    fn close(&mut self) {
        let State::AccumulatingContinuation(pending) =
            std::mem::replace(&mut self.state, State::AwaitingRecord)
        else {
            return;
        };

        let normalizer = &self.assembler.normalizer;
        let record = CaseRecord {
            serial: pending.serial,
            case_info: normalizer.normalize_case_info(&pending.case_info.join("\n")),
            party_name: normalizer.normalize(&pending.party.join("\n")),
            advocates: normalizer.normalize(&pending.advocates.join("\n")),
        };

        log::debug!("Emitting record {:?}", record.serial);
        self.assembly.records.push(record);
    }

    fn warn(&mut self, warning: AssemblyWarning) {
        log::warn!("{warning}");
        self.assembly.warnings.push(warning);
    }

    fn finish(mut self) -> Assembly {
        self.close();
        self.assembly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(rows: &[RawRow]) -> Assembly {
        RecordAssembler::new(&ExtractConfig::default())
            .unwrap()
            .assemble(rows)
    }

    fn serials(assembly: &Assembly) -> Vec<Option<u32>> {
        assembly.records.iter().map(|r| r.serial).collect()
    }

    #[test]
    fn continuation_row_merges_party_text() {
        let rows = [
            RawRow::new(["5", "CC/5/2024", "Ramesh Kumar versus", "Adv A"]),
            RawRow::new(["", "", "State of Maharashtra", ""]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(assembly.records.len(), 1);
        let record = &assembly.records[0];
        assert_eq!(record.serial, Some(5));
        assert_eq!(record.party_name, "Ramesh Kumar versus State of Maharashtra");
        assert_eq!(record.case_info, "CC/5/2024");
        assert_eq!(record.advocates, "Adv A");
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn continuation_can_carry_the_hearing_annotation() {
        let rows = [
            RawRow::new(["2", "MACP/10/2019", "A versus B", "X"]),
            RawRow::new(["", "Next hearing date:- 20-10-2025", "", "Y"]),
        ];
        let record = &assemble(&rows).records[0];

        assert_eq!(
            record.case_info,
            "MACP/10/2019 \u{2014} Next hearing date: 20-10-2025"
        );
        assert_eq!(record.advocates, "X Y");
    }

    #[test]
    fn repeated_serial_continues_the_open_case() {
        let rows = [
            RawRow::new(["8", "RCS/1/2020", "A", "X"]),
            RawRow::new(["8", "", "and others", ""]),
            RawRow::new(["9", "RCS/2/2020", "C", "Z"]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![Some(8), Some(9)]);
        assert_eq!(assembly.records[0].party_name, "A and others");
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn section_header_is_skipped_and_processing_continues() {
        let rows = [
            RawRow::new(["1", "CC/1/2024", "A versus B", "X"]),
            RawRow::new(["Urgent Cases"]),
            RawRow::new(["2", "CC/2/2024", "C versus D", "Y"]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![Some(1), Some(2)]);
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn repeated_column_headers_are_not_merged_into_a_case() {
        let rows = [
            RawRow::new(["1", "CC/1/2024", "A versus B", "X"]),
            RawRow::new(["Sr No", "Cases", "Party Name", "Advocate"]),
            RawRow::new(["2", "CC/2/2024", "C versus D", "Y"]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![Some(1), Some(2)]);
        assert_eq!(assembly.records[0].case_info, "CC/1/2024");
        assert_eq!(assembly.records[0].party_name, "A versus B");
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn header_closes_the_open_case() {
        let rows = [
            RawRow::new(["1", "CC/1/2024", "A", "X"]),
            RawRow::new(["Urgent Cases"]),
            RawRow::new(["", "", "stray text", ""]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![Some(1), None]);
        assert_eq!(assembly.records[0].party_name, "A");
        assert_eq!(assembly.records[1].party_name, "stray text");
        assert_eq!(
            assembly.warnings,
            vec![AssemblyWarning::Row {
                row: 2,
                source: RowError::OrphanContinuation,
            }]
        );
    }

    #[test]
    fn orphan_continuation_opens_unknown_serial_record() {
        let rows = [
            RawRow::new(["", "CC/0/2024", "Orphan party", ""]),
            RawRow::new(["", "", "more", ""]),
            RawRow::new(["1", "CC/1/2024", "A", "X"]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![None, Some(1)]);
        assert_eq!(assembly.records[0].party_name, "Orphan party more");
        assert_eq!(assembly.warnings.len(), 1);
    }

    #[test]
    fn malformed_row_is_skipped_with_warning() {
        let rows = [
            RawRow::new(["1", "CC/1/2024", "A", "X"]),
            RawRow::new(["2", "CC/2/2024"]),
            RawRow::new(["3", "CC/3/2024", "B", "Y"]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![Some(1), Some(3)]);
        assert_eq!(
            assembly.warnings,
            vec![
                AssemblyWarning::Row {
                    row: 1,
                    source: RowError::MalformedRow {
                        found: 2,
                        required: 4,
                    },
                },
                AssemblyWarning::SerialGap {
                    row: 2,
                    previous: 1,
                    current: 3,
                },
            ]
        );
    }

    #[test]
    fn gaps_and_disorder_are_reported_but_kept() {
        let rows = [
            RawRow::new(["1", "a", "b", "c"]),
            RawRow::new(["4", "a", "b", "c"]),
            RawRow::new(["3", "a", "b", "c"]),
        ];
        let assembly = assemble(&rows);

        assert_eq!(serials(&assembly), vec![Some(1), Some(4), Some(3)]);
        assert_eq!(
            assembly.warnings,
            vec![
                AssemblyWarning::SerialGap {
                    row: 1,
                    previous: 1,
                    current: 4,
                },
                AssemblyWarning::SerialDisorder {
                    row: 2,
                    previous: 4,
                    current: 3,
                },
            ]
        );
    }

    #[test]
    fn noise_rows_produce_nothing() {
        let rows = [
            RawRow::new(["", "", "", ""]),
            RawRow::new(["---", "---", "---", "---"]),
        ];
        let assembly = assemble(&rows);

        assert!(assembly.records.is_empty());
        assert!(assembly.warnings.is_empty());
    }

    #[test]
    fn records_never_contain_line_breaks() {
        let rows = [
            RawRow::new(["1", "A\r\nB\n", "C\nversus\nD", "E,\nF"]),
            RawRow::new(["", "G\n\nH", "\nI", "J\r"]),
        ];
        for record in assemble(&rows).records {
            for field in [&record.case_info, &record.party_name, &record.advocates] {
                assert!(!field.contains(['\n', '\r']), "{field:?}");
                assert_eq!(field.trim(), field.as_str());
                assert!(!field.contains("  "), "{field:?}");
            }
        }
    }

    #[test]
    fn output_preserves_input_order() {
        let rows: Vec<RawRow> = [7, 3, 9, 1]
            .iter()
            .map(|n| RawRow::new([n.to_string(), "c".to_owned(), "p".to_owned(), "a".to_owned()]))
            .collect();
        assert_eq!(
            serials(&assemble(&rows)),
            vec![Some(7), Some(3), Some(9), Some(1)]
        );
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert_eq!(assemble(&[]), Assembly::default());
    }
}
