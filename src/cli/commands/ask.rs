//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::memory::ConversationMemory;
use crate::pipeline::AnswerPipeline;
use anyhow::Result;

/// Run the ask command: one question through the full pipeline with fresh
/// memory.
pub async fn run_ask(question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Query) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let pipeline = AnswerPipeline::load(&settings)?;
    let mut memory = ConversationMemory::new(settings.chat.max_history);

    let spinner = Output::spinner("Thinking...");
    let answer = pipeline.answer(question, &mut memory).await;
    spinner.finish_and_clear();

    let answer = match answer {
        Ok(answer) => answer,
        Err(e) => {
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    };

    match &answer.reply {
        Some(reply) => println!("\n{}\n", reply),
        None => Output::error(&format!(
            "Error: {}",
            answer.error.as_deref().unwrap_or("generation failed")
        )),
    }

    for set in &answer.sources {
        if set.documents.is_empty() {
            continue;
        }
        Output::header(&format!("Sources ({})", set.index));
        for doc in &set.documents {
            Output::source(doc.title(), &doc.content, doc.meta("url"));
        }
    }

    Ok(())
}
