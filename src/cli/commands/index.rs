//! Index command implementation: the offline indexing entry point.

use crate::cli::preflight::{self, Operation};
use crate::cli::{Dataset, Output};
use crate::config::Settings;
use crate::embedding::GeminiEmbedder;
use crate::error::TychoError;
use crate::indexer::build_index;
use crate::loader;
use anyhow::Result;

/// Run the index command for one dataset.
pub async fn run_index(dataset: &Dataset, settings: Settings) -> Result<()> {
    let operation = match dataset {
        Dataset::Techport { .. } => Operation::IndexLocal,
        Dataset::Techtransfer { .. } => Operation::IndexRemote,
    };
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let embedder = GeminiEmbedder::new(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    )?;

    let (index_name, documents) = match dataset {
        Dataset::Techport { csv } => {
            Output::info(&format!("Loading TechPort projects from {}", csv.display()));
            ("TechPort", loader::load_csv(csv)?)
        }
        Dataset::Techtransfer { query } => {
            let query = query
                .clone()
                .unwrap_or_else(|| settings.techtransfer.default_query.clone());
            Output::info(&format!("Fetching TechTransfer patents for '{}'", query));

            let client = loader::TechTransferClient::new(&settings.techtransfer.base_url)?;
            let records = client.fetch_patents(&query).await?;
            Output::info(&format!("{} patent records retrieved", records.len()));

            ("TechTransfer", loader::techtransfer::to_documents(&records))
        }
    };

    if documents.is_empty() {
        Output::error("No valid documents to index.");
        return Err(TychoError::InvalidInput("no valid documents in source".to_string()).into());
    }

    let index_settings = settings
        .index_named(index_name)
        .ok_or_else(|| TychoError::Config(format!("no configured index named '{}'", index_name)))?;
    let dir = settings.index_dir(index_settings);

    let spinner = Output::spinner(&format!("Embedding {} documents...", documents.len()));
    let result = build_index(documents, &embedder, &dir).await;
    spinner.finish_and_clear();

    match result {
        Ok(count) => {
            Output::success(&format!(
                "{} data embedded and saved ({} documents, {})",
                index_name,
                count,
                dir.display()
            ));
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Indexing failed: {}", e));
            Err(e.into())
        }
    }
}
