//! HTML table reader.
//!
//! Parses a saved page, locates the results table via CSS selector, and
//! extracts each row's cells as rendered text: `<br>` and block elements
//! become line breaks, scripts and styles are dropped, entities are decoded.

use std::path::Path;

use cause_list_models::RawRow;
use scraper::{ElementRef, Html, Selector};

use crate::ScrapeError;

/// Elements that start a new line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "div", "p", "li", "ul", "ol", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Reader that extracts raw rows from an HTML table.
///
/// The defaults match the eCourts cause list page (`#dispTable`). Use the
/// builder methods for other layouts.
#[derive(Debug, Clone)]
pub struct HtmlTableReader {
    /// CSS selector for the target table element.
    table_selector: String,
    /// CSS selector for rows inside the table.
    row_selector: String,
    /// CSS selector for cells within a row.
    cell_selector: String,
}

impl Default for HtmlTableReader {
    fn default() -> Self {
        Self {
            table_selector: "#dispTable".to_owned(),
            row_selector: "tr".to_owned(),
            cell_selector: "td".to_owned(),
        }
    }
}

impl HtmlTableReader {
    /// Creates a reader with the default selectors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the CSS selector used to locate the table element.
    #[must_use]
    pub fn with_table_selector(mut self, selector: &str) -> Self {
        selector.clone_into(&mut self.table_selector);
        self
    }

    /// Overrides the CSS selector used to locate rows.
    #[must_use]
    pub fn with_row_selector(mut self, selector: &str) -> Self {
        selector.clone_into(&mut self.row_selector);
        self
    }

    /// Overrides the CSS selector used to locate cells within a row.
    #[must_use]
    pub fn with_cell_selector(mut self, selector: &str) -> Self {
        selector.clone_into(&mut self.cell_selector);
        self
    }

    /// Reads and parses a saved HTML page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Self::read`].
    pub fn read_file(&self, path: &Path) -> Result<Vec<RawRow>, ScrapeError> {
        let body = std::fs::read_to_string(path).map_err(|source| ScrapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Read {} bytes from {}", body.len(), path.display());

        self.read(&body)
    }

    /// Extracts every row that has at least one cell.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Selector`] if a selector is invalid, or
    /// [`ScrapeError::TableNotFound`] if the document has no matching table.
    pub fn read(&self, html: &str) -> Result<Vec<RawRow>, ScrapeError> {
        let document = Html::parse_document(html);

        // ── Locate the table ────────────────────────────────────────────
        let table_sel = parse_selector(&self.table_selector)?;
        let table = document
            .select(&table_sel)
            .next()
            .ok_or_else(|| ScrapeError::TableNotFound(self.table_selector.clone()))?;

        // ── Extract rows ────────────────────────────────────────────────
        let row_sel = parse_selector(&self.row_selector)?;
        let cell_sel = parse_selector(&self.cell_selector)?;

        let mut rows = Vec::new();

        for row in table.select(&row_sel) {
            let cells: Vec<ElementRef<'_>> = row.select(&cell_sel).collect();
            if cells.is_empty() {
                continue;
            }

            let spans_columns = cells
                .iter()
                .any(|cell| cell.value().attr("colspan").is_some());

            rows.push(RawRow::new(cells.into_iter().map(inner_text)).with_column_span(spans_columns));
        }

        log::info!(
            "Read {} rows from table '{}'",
            rows.len(),
            self.table_selector
        );

        Ok(rows)
    }
}

/// Parses a CSS selector string, returning a [`ScrapeError`] on failure.
fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_owned(),
        message: e.to_string(),
    })
}

/// Rendered text of an element, roughly as `innerText` reports it.
fn inner_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    out
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

        match child.value().name() {
            "script" | "style" => {}
            "br" => out.push('\n'),
            name if BLOCK_ELEMENTS.contains(&name) => {
                out.push('\n');
                push_text(child, out);
                out.push('\n');
            }
            _ => push_text(child, out),
        }
    }
}
