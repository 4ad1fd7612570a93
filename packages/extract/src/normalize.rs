//! Cell text normalization.
//!
//! Cells arrive with the line structure of the rendered page: wrapped names,
//! a "versus" line between the parties, a next-hearing annotation under the
//! case number. Normalization flattens that into a single clean line:
//!
//! 1. split on line breaks, trim each line and drop empty ones;
//! 2. rewrite a line opening with the annotation label as `<label>: <rest>`;
//! 3. join lines with a space, or with the annotation separator in front of
//!    an annotation line;
//! 4. collapse whitespace runs.
//!
//! The case info column additionally loses quote characters and link
//! captions such as "View", both before and after the label rewrite.
//!
//! Output never contains a line break, and normalizing twice gives the same
//! result as normalizing once.

use regex::Regex;

use crate::ConfigError;
use crate::config::NormalizeRules;

/// Applies [`NormalizeRules`] to cell text.
#[derive(Debug, Clone)]
pub struct Normalizer {
    annotation: Option<Annotation>,
    separator: String,
    /// Lower-cased.
    boilerplate: Vec<String>,
    strip_quotes: bool,
}

/// Matcher for the next-hearing label and its canonical spelling.
#[derive(Debug, Clone)]
struct Annotation {
    pattern: Regex,
    label: String,
}

impl Annotation {
    fn new(label: &str) -> Result<Option<Self>, ConfigError> {
        let words: Vec<&str> = label.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }

        let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
        // Label, then a `:`/`-` run, plain whitespace, or end of line.
        let pattern = Regex::new(&format!(
            r"(?i)^{}(?:\s*[:\-]+\s*|\s+|$)",
            escaped.join(r"\s+")
        ))?;

        Ok(Some(Self {
            pattern,
            label: words.join(" "),
        }))
    }

    /// Canonical form of `line` if it opens with the label.
    fn canonicalize(&self, line: &str) -> Option<String> {
        let found = self.pattern.find(line)?;
        let rest = line[found.end()..].trim();

        Some(if rest.is_empty() {
            format!("{}:", self.label)
        } else {
            format!("{}: {rest}", self.label)
        })
    }
}

impl Normalizer {
    /// Compiles the given rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if the annotation label cannot be
    /// turned into a matcher.
    pub fn new(rules: &NormalizeRules) -> Result<Self, ConfigError> {
        Ok(Self {
            annotation: Annotation::new(&rules.annotation_label)?,
            separator: rules.annotation_separator.clone(),
            boilerplate: rules
                .boilerplate_tokens
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            strip_quotes: rules.strip_quotes,
        })
    }

    /// Normalizes party and advocate text, or any other generic cell.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        self.run(raw, false)
    }

    /// Normalizes case info text: [`Self::normalize`] plus quote and
    /// boilerplate removal.
    #[must_use]
    pub fn normalize_case_info(&self, raw: &str) -> String {
        self.run(raw, true)
    }

    fn run(&self, raw: &str, case_info: bool) -> String {
        let mut joined = String::with_capacity(raw.len());

        for line in raw.split(is_line_break) {
            let line = if case_info {
                self.clean_case_info_line(line)
            } else {
                collapse_ws(line)
            };
            if line.is_empty() {
                continue;
            }

            match self.canonical_annotation(&line, case_info) {
                Some(annotation) => {
                    if !joined.is_empty() {
                        joined.push_str(&self.separator);
                    }
                    joined.push_str(&annotation);
                }
                None => {
                    if !joined.is_empty() {
                        joined.push(' ');
                    }
                    joined.push_str(&line);
                }
            }
        }

        let collapsed = collapse_ws(&joined);

        // Joining can leave the label at the very start (first lines were
        // blank, or the label itself was wrapped); canonicalize it there too.
        self.canonical_annotation(&collapsed, case_info)
            .unwrap_or(collapsed)
    }

    /// Canonical annotation for `line`, cleaned again for case info since
    /// the rewrite can split a token glued to the label (`date:View`).
    fn canonical_annotation(&self, line: &str, case_info: bool) -> Option<String> {
        let canonical = self.annotation.as_ref()?.canonicalize(line)?;

        Some(if case_info {
            self.clean_case_info_line(&canonical)
        } else {
            canonical
        })
    }

    fn clean_case_info_line(&self, line: &str) -> String {
        let unquoted: String = if self.strip_quotes {
            line.chars().filter(|c| !matches!(c, '\'' | '"')).collect()
        } else {
            line.to_owned()
        };

        unquoted
            .split_whitespace()
            .filter(|word| !self.boilerplate.contains(&word.to_lowercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

const fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Trims and collapses every whitespace run to a single space.
fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
