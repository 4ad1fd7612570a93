//! Extraction settings.
//!
//! The defaults are documented in `config/default.toml`, which is embedded
//! at compile time as [`DEFAULT_CONFIG_TOML`]. Users may supply a TOML file
//! with the same layout; any table or field it omits keeps its default.

use std::collections::BTreeMap;
use std::path::Path;

use cause_list_models::RowKind;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The commented default configuration, as shipped.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Section-header vocabulary used when no configuration overrides it.
const DEFAULT_SECTION_MARKERS: &[&str] = &[
    "urgent cases",
    "time bound",
    "time bound cases",
    "fresh cases",
    "old cases",
    "after notice",
    "for orders",
    "part heard",
];

/// Repeated column-header text; matched against the whole row or any cell.
const DEFAULT_NOISE_MARKERS: &[&str] = &["sr no", "sr. no."];

/// Complete configuration of the extraction engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Row classification vocabulary.
    pub classifier: ClassifierConfig,
    /// Source column positions.
    pub columns: ColumnLayout,
    /// Text normalization rules.
    pub normalize: NormalizeRules,
}

impl ExtractConfig {
    /// Parses a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed, or
    /// [`ConfigError::Columns`] if the column layout is inconsistent.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration in the layout [`Self::from_toml`] reads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if a value has no TOML form.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::from_toml`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded extraction config from {}", path.display());
        Self::from_toml(&text)
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Columns`] if two logical columns share a cell
    /// index or `data_width` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut indices = self.columns.indices().to_vec();
        indices.sort_unstable();
        indices.dedup();
        if indices.len() != 4 {
            return Err(ConfigError::Columns(format!(
                "column indices must be distinct, got {:?}",
                self.columns.indices()
            )));
        }
        if self.classifier.data_width == 0 {
            return Err(ConfigError::Columns(
                "classifier.data_width must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Vocabulary and shape rules for the row classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Number of cells in a regular case row.
    pub data_width: usize,
    /// Marker text (matched case-insensitively) to the kind it implies.
    pub markers: BTreeMap<String, RowKind>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            data_width: 4,
            markers: DEFAULT_SECTION_MARKERS
                .iter()
                .map(|m| ((*m).to_owned(), RowKind::SectionHeader))
                .chain(
                    DEFAULT_NOISE_MARKERS
                        .iter()
                        .map(|m| ((*m).to_owned(), RowKind::Noise)),
                )
                .collect(),
        }
    }
}

/// Zero-based cell index of each logical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnLayout {
    /// Serial number column.
    pub serial: usize,
    /// Case number / type column.
    pub case_info: usize,
    /// Party names column.
    pub party: usize,
    /// Advocates column.
    pub advocate: usize,
}

impl ColumnLayout {
    /// Indices in logical order: serial, case info, party, advocate.
    #[must_use]
    pub const fn indices(&self) -> [usize; 4] {
        [self.serial, self.case_info, self.party, self.advocate]
    }

    /// Fewest cells a row needs for every column to be present.
    #[must_use]
    pub fn min_cells(&self) -> usize {
        self.indices().into_iter().max().unwrap_or(0) + 1
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            serial: 0,
            case_info: 1,
            party: 2,
            advocate: 3,
        }
    }
}

/// Configurable parts of text normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeRules {
    /// Label that opens a next-hearing annotation line. Empty disables
    /// annotation handling.
    pub annotation_label: String,
    /// Text placed between an annotation and the text before it.
    pub annotation_separator: String,
    /// Whole words removed from the case info column.
    pub boilerplate_tokens: Vec<String>,
    /// Remove `'` and `"` from the case info column.
    pub strip_quotes: bool,
}

impl Default for NormalizeRules {
    fn default() -> Self {
        Self {
            annotation_label: "Next hearing date".to_owned(),
            annotation_separator: " \u{2014} ".to_owned(),
            boilerplate_tokens: vec!["View".to_owned()],
            strip_quotes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_code_defaults() {
        let parsed = ExtractConfig::from_toml(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(parsed, ExtractConfig::default());
    }

    #[test]
    fn serialized_config_reads_back_unchanged() {
        let mut config = ExtractConfig::default();
        config.normalize.annotation_separator = " | ".to_owned();
        config
            .classifier
            .markers
            .insert("daily board".to_owned(), RowKind::SectionHeader);

        let text = config.to_toml().unwrap();

        assert!(text.contains("[classifier.markers]"), "{text}");
        assert_eq!(ExtractConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = ExtractConfig::from_toml(
            r#"
            [normalize]
            annotation_separator = " | "
            "#,
        )
        .unwrap();
        assert_eq!(config.normalize.annotation_separator, " | ");
        assert_eq!(config.normalize.annotation_label, "Next hearing date");
        assert_eq!(config.columns, ColumnLayout::default());
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn markers_table_replaces_vocabulary() {
        let config = ExtractConfig::from_toml(
            r#"
            [classifier.markers]
            "daily board" = "section_header"
            "no record found" = "noise"
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.markers.len(), 2);
        assert_eq!(
            config.classifier.markers.get("no record found"),
            Some(&RowKind::Noise)
        );
        assert_eq!(config.classifier.data_width, 4);
    }

    #[test]
    fn unknown_row_kind_is_rejected() {
        let err = ExtractConfig::from_toml(
            r#"
            [classifier.markers]
            "urgent cases" = "banner"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn duplicate_column_indices_are_rejected() {
        let err = ExtractConfig::from_toml(
            r"
            [columns]
            party = 1
            ",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Columns(_)));
    }

    #[test]
    fn min_cells_follows_widest_column() {
        let layout = ColumnLayout {
            serial: 0,
            case_info: 2,
            party: 3,
            advocate: 5,
        };
        assert_eq!(layout.min_cells(), 6);
        assert_eq!(ColumnLayout::default().min_cells(), 4);
    }
}
