//! Source record loading.
//!
//! Converts raw NASA records into normalized documents ready for embedding:
//! TechPort R&D projects from a CSV export, TechTransfer patents from the
//! public API. Records missing a title or description are skipped with a
//! warning, never an error.

pub mod techport;
pub mod techtransfer;

pub use techport::load_csv;
pub use techtransfer::{PatentRecord, TechTransferClient};

/// Build the document content searched and embedded for every dataset.
pub(crate) fn document_content(title: &str, description: &str) -> String {
    format!("Title: {}\n\nDescription: {}", title, description)
}
