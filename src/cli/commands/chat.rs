//! Interactive chat command.
//!
//! A read-eval loop over the answer pipeline. The conversation memory lives
//! here, owned by the loop, and is passed into the pipeline per query. A
//! failed query is reported and the loop keeps accepting input.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::memory::ConversationMemory;
use crate::pipeline::AnswerPipeline;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Query) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let pipeline = AnswerPipeline::load(&settings)?;
    let mut memory = ConversationMemory::new(settings.chat.max_history);

    println!("\n{}", style("NASA Innovation Companion").bold().cyan());
    println!(
        "{}",
        style("Ask any innovation or technology question based on NASA's research and patents.").dim()
    );
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset the conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break; // EOF
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            memory.clear();
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let answer = pipeline.answer(input, &mut memory).await;
        spinner.finish_and_clear();

        // Per-query errors end the query, not the session.
        let answer = match answer {
            Ok(answer) => answer,
            Err(e) => {
                Output::error(&format!("{}", e));
                continue;
            }
        };

        match &answer.reply {
            Some(reply) => {
                println!("\n{} {}\n", style("NASA Companion:").cyan().bold(), reply);
            }
            None => {
                Output::error(&format!(
                    "Error: {}",
                    answer.error.as_deref().unwrap_or("generation failed")
                ));
            }
        }

        for set in &answer.sources {
            if set.documents.is_empty() {
                continue;
            }
            println!("{}", style(format!("Sources ({}):", set.index)).dim());
            for doc in &set.documents {
                println!("  {} {}", style("*").cyan(), doc.title());
            }
        }
        println!();
    }

    Ok(())
}
