//! Search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::AnswerPipeline;
use anyhow::Result;

/// Run the search command: scored retrieval without generation.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let pipeline = AnswerPipeline::load(&settings)?;

    let spinner = Output::spinner("Searching...");
    let results = pipeline.search(query, limit).await;
    spinner.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    let mut found = 0usize;
    for (index_name, matches) in &results {
        if matches.is_empty() {
            continue;
        }
        found += matches.len();
        Output::header(&format!("Results from {}", index_name));
        for result in matches {
            Output::source(
                &format!("{} (score: {:.2})", result.document.title(), result.score),
                &result.document.content,
                result.document.meta("url"),
            );
        }
    }

    if found == 0 {
        Output::warning("No results found matching your query.");
    }

    Ok(())
}
