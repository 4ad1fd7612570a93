#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Table snapshot reader for court cause lists.
//!
//! The portal is driven by a person in a browser (captcha, court selection);
//! once the results table is on screen the page is saved and handed to this
//! crate. [`html_table::HtmlTableReader`] finds the results table and turns
//! each `<tr>` into a [`cause_list_models::RawRow`] with the cell text as the
//! browser would render it.

pub mod html_table;

use std::path::PathBuf;

pub use html_table::HtmlTableReader;

/// Errors that can occur while reading a table snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The snapshot file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the snapshot.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// A configured CSS selector is invalid.
    #[error("invalid CSS selector '{selector}': {message}")]
    Selector {
        /// The selector text.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// No element in the document matched the table selector.
    #[error("no element matching '{0}' found in document")]
    TableNotFound(String),
}
