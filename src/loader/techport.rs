//! TechPort CSV loader.
//!
//! Reads the NASA TechPort project export and produces one document per row
//! with a non-empty title and description.

use super::document_content;
use crate::error::Result;
use crate::vector_store::Document;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// One row of the TechPort export. Empty CSV fields deserialize to `None`.
#[derive(Debug, Deserialize)]
struct TechPortRow {
    #[serde(rename = "Project Title")]
    title: Option<String>,
    #[serde(rename = "Project Description")]
    description: Option<String>,
    #[serde(rename = "TechPort ID")]
    id: Option<String>,
    #[serde(rename = "Primary Taxonomy")]
    taxonomy: Option<String>,
    #[serde(rename = "Project URL")]
    url: Option<String>,
    #[serde(rename = "Responsible NASA Program")]
    program: Option<String>,
}

/// Load TechPort documents from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<Document>> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(file)
}

/// Load TechPort documents from any CSV reader.
///
/// Rows without both a project title and description are skipped; the
/// remaining columns become provenance metadata.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<Vec<Document>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut documents = Vec::new();
    let mut skipped = 0usize;

    for row in csv_reader.deserialize::<TechPortRow>() {
        let row = row?;

        let (title, description) = match (&row.title, &row.description) {
            (Some(t), Some(d)) if !t.is_empty() && !d.is_empty() => (t, d),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let mut metadata = BTreeMap::new();
        metadata.insert("title".to_string(), Some(title.clone()));
        metadata.insert("id".to_string(), row.id.clone());
        metadata.insert("taxonomy".to_string(), row.taxonomy.clone());
        metadata.insert("url".to_string(), row.url.clone());
        metadata.insert("program".to_string(), row.program.clone());
        metadata.insert("source".to_string(), Some("TechPort".to_string()));

        documents.push(Document::new(document_content(title, description), metadata));
    }

    if skipped > 0 {
        warn!("Skipped {} TechPort rows missing title or description", skipped);
    }
    info!("Loaded {} TechPort documents", documents.len());

    Ok(documents)
}
