//! NASA TechTransfer patent API client and record decoding.
//!
//! The API returns each patent as a positional array rather than an object.
//! Raw arrays are decoded into [`PatentRecord`] immediately at this
//! boundary, with the field count validated, so positional fragility never
//! leaks further into the pipeline.

use super::document_content;
use crate::error::{Result, TychoError};
use crate::vector_store::Document;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Positional offsets in a raw patent array.
const TITLE_INDEX: usize = 1;
const DESCRIPTION_INDEX: usize = 3;
const URL_INDEX: usize = 10;

/// Minimum array length for a decodable record.
const MIN_FIELDS: usize = DESCRIPTION_INDEX + 1;

/// Sentinel for records without a URL field.
const NO_URL: &str = "N/A";

/// Environment variable holding the NASA API key.
const NASA_API_KEY_VAR: &str = "NASA_API_KEY";

/// Raw API response envelope.
#[derive(Debug, Deserialize)]
struct PatentResponse {
    #[serde(default)]
    results: Vec<Vec<Value>>,
    /// Total matching records across all pages, when reported.
    total: Option<u64>,
}

/// A decoded TechTransfer patent record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatentRecord {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl PatentRecord {
    /// Decode one raw positional array.
    ///
    /// Fails if the array is too short to hold a title and description, or
    /// if either field is not a string. The URL field is optional and
    /// defaults to `"N/A"`.
    pub fn from_raw(raw: &[Value]) -> Result<Self> {
        if raw.len() < MIN_FIELDS {
            return Err(TychoError::SourceRecord(format!(
                "patent record has {} fields, expected at least {}",
                raw.len(),
                MIN_FIELDS
            )));
        }

        let field = |index: usize, name: &str| -> Result<String> {
            raw[index]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| {
                    TychoError::SourceRecord(format!(
                        "patent record field {} ({}) is not a string",
                        index, name
                    ))
                })
        };

        let title = field(TITLE_INDEX, "title")?;
        let description = field(DESCRIPTION_INDEX, "description")?;
        let url = raw
            .get(URL_INDEX)
            .and_then(Value::as_str)
            .unwrap_or(NO_URL)
            .to_string();

        Ok(Self {
            title,
            description,
            url,
        })
    }
}

/// Convert decoded patent records into documents.
///
/// Records with an empty title or description are skipped.
pub fn to_documents(records: &[PatentRecord]) -> Vec<Document> {
    let mut documents = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for record in records {
        if record.title.is_empty() || record.description.is_empty() {
            skipped += 1;
            continue;
        }

        let mut metadata = BTreeMap::new();
        metadata.insert("title".to_string(), Some(record.title.clone()));
        metadata.insert("url".to_string(), Some(record.url.clone()));
        metadata.insert("source".to_string(), Some("TechTransfer API".to_string()));

        documents.push(Document::new(
            document_content(&record.title, &record.description),
            metadata,
        ));
    }

    if skipped > 0 {
        warn!("Skipped {} patent records missing title or description", skipped);
    }

    documents
}

/// Client for the NASA TechTransfer patent API.
pub struct TechTransferClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TechTransferClient {
    /// Create a client reading the API key from `NASA_API_KEY`.
    pub fn new(base_url: &str) -> Result<Self> {
        let api_key = std::env::var(NASA_API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TychoError::Config(format!(
                    "{} not set. Get a key at https://api.nasa.gov and export it.",
                    NASA_API_KEY_VAR
                ))
            })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch and decode patent records matching `query`.
    ///
    /// Only the first page of results is consumed; if the API reports more
    /// matches than it returned, a warning is logged. Records that fail to
    /// decode are skipped, not fatal.
    #[instrument(skip(self))]
    pub async fn fetch_patents(&self, query: &str) -> Result<Vec<PatentRecord>> {
        let url = format!(
            "{}/patent/?{}&api_key={}",
            self.base_url, query, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TychoError::NasaApi(format!(
                "TechTransfer API error: {} - {}",
                status, body
            )));
        }

        let parsed: PatentResponse = response.json().await?;
        let fetched = parsed.results.len();

        if let Some(total) = parsed.total {
            if total as usize > fetched {
                warn!(
                    "TechTransfer reports {} total matches but returned {}; only the first page is indexed",
                    total, fetched
                );
            }
        }

        let mut records = Vec::with_capacity(fetched);
        for raw in &parsed.results {
            match PatentRecord::from_raw(raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping undecodable patent record: {}", e),
            }
        }

        info!("Decoded {} of {} patent records", records.len(), fetched);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_record(title: &str, description: &str) -> Vec<Value> {
        let mut raw = vec![Value::Null; 11];
        raw[0] = json!("patent_id");
        raw[TITLE_INDEX] = json!(title);
        raw[DESCRIPTION_INDEX] = json!(description);
        raw[URL_INDEX] = json!("https://technology.nasa.gov/patent/LEW-1");
        raw
    }

    #[test]
    fn test_decode_full_record() {
        let record = PatentRecord::from_raw(&raw_record("Robotic Arm", "A compliant arm")).unwrap();
        assert_eq!(record.title, "Robotic Arm");
        assert_eq!(record.description, "A compliant arm");
        assert_eq!(record.url, "https://technology.nasa.gov/patent/LEW-1");
    }

    #[test]
    fn test_decode_short_record_without_url() {
        let raw = vec![
            json!("id"),
            json!("Robotic Arm"),
            json!("cat"),
            json!("A compliant arm"),
        ];
        let record = PatentRecord::from_raw(&raw).unwrap();
        assert_eq!(record.url, NO_URL);
    }

    #[test]
    fn test_decode_rejects_truncated_record() {
        let raw = vec![json!("id"), json!("Robotic Arm")];
        let err = PatentRecord::from_raw(&raw).unwrap_err();
        assert!(matches!(err, TychoError::SourceRecord(_)));
    }

    #[test]
    fn test_decode_rejects_non_string_title() {
        let mut raw = raw_record("x", "y");
        raw[TITLE_INDEX] = json!(42);
        let err = PatentRecord::from_raw(&raw).unwrap_err();
        assert!(matches!(err, TychoError::SourceRecord(_)));
    }

    #[test]
    fn test_to_documents_skips_empty_fields() {
        let records = vec![
            PatentRecord {
                title: "Robotic Arm".to_string(),
                description: "A compliant arm".to_string(),
                url: NO_URL.to_string(),
            },
            PatentRecord {
                title: String::new(),
                description: "orphan description".to_string(),
                url: NO_URL.to_string(),
            },
        ];

        let docs = to_documents(&records);
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].content,
            "Title: Robotic Arm\n\nDescription: A compliant arm"
        );
        assert_eq!(docs[0].meta("source"), Some("TechTransfer API"));
        assert_eq!(docs[0].meta("url"), Some(NO_URL));
    }
}
