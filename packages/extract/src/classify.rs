//! Row classification.
//!
//! Decides whether a table row carries case data, labels a group of cases,
//! or is decoration. The vocabulary comes from [`ClassifierConfig`] so the
//! portal's wording can change without touching the assembler.

use std::collections::BTreeMap;

use cause_list_models::{RawRow, RowKind};

use crate::config::ClassifierConfig;

/// Characters a placeholder cell may consist of (`---`, `...`, `***`).
const PLACEHOLDER_CHARS: &[char] = &['-', '_', '=', '*', '.', '\u{2013}', '\u{2014}'];

/// Tags raw rows with a [`RowKind`].
#[derive(Debug, Clone)]
pub struct RowClassifier {
    data_width: usize,
    /// Keys are case- and whitespace-folded.
    markers: BTreeMap<String, RowKind>,
}

impl RowClassifier {
    /// Builds a classifier from its configuration.
    #[must_use]
    pub fn new(config: &ClassifierConfig) -> Self {
        let markers = config
            .markers
            .iter()
            .map(|(marker, kind)| (fold(marker), *kind))
            .filter(|(marker, _)| !marker.is_empty())
            .collect();

        Self {
            data_width: config.data_width,
            markers,
        }
    }

    /// Classifies a single row. Pure function of the row's text and shape.
    #[must_use]
    pub fn classify(&self, row: &RawRow) -> RowKind {
        if row.is_blank() || is_placeholder(row) {
            return RowKind::Noise;
        }

        let text = fold(&row.non_blank_cells().collect::<Vec<_>>().join(" "));

        if let Some(kind) = self.markers.get(&text) {
            return *kind;
        }

        // Column headers repeated as an ordinary row.
        if row
            .non_blank_cells()
            .any(|cell| self.markers.get(&fold(cell)) == Some(&RowKind::Noise))
        {
            return RowKind::Noise;
        }

        let narrow = row.width() < self.data_width;

        // A short row stretched across the table is a label.
        if narrow && row.spans_columns {
            return RowKind::SectionHeader;
        }

        if narrow && self.contains_header_marker(&text) {
            return RowKind::SectionHeader;
        }

        RowKind::Data
    }

    fn contains_header_marker(&self, text: &str) -> bool {
        self.markers
            .iter()
            .any(|(marker, kind)| *kind == RowKind::SectionHeader && text.contains(marker.as_str()))
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

/// Lower-cases and collapses whitespace.
fn fold(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether every non-blank cell is only dashes, dots and the like.
fn is_placeholder(row: &RawRow) -> bool {
    row.non_blank_cells().all(|cell| {
        cell.chars()
            .all(|c| c.is_whitespace() || PLACEHOLDER_CHARS.contains(&c))
    })
}
