//! Deterministic prompt assembly.
//!
//! Combines retrieved documents from each configured index, the rendered
//! conversation history, and the new user question into one prompt string.
//! The output is a pure function of its inputs: identical inputs produce
//! byte-identical prompts, and sections appear in the order the indexes are
//! declared in configuration.
//!
//! No truncation happens here. History is already bounded by the memory cap
//! and retrieval by `k`; if the result still exceeds the generation
//! service's input limit, that surfaces as a generation error.

use crate::vector_store::Document;

/// Documents retrieved from one named index, in similarity order.
#[derive(Debug, Clone)]
pub struct RetrievedSet {
    /// Index name as declared in configuration (e.g. "TechPort").
    pub index: String,
    /// Retrieved documents, best match first.
    pub documents: Vec<Document>,
}

/// Assemble the full prompt for the generation service.
pub fn assemble(preamble: &str, query: &str, retrieved: &[RetrievedSet], history: &str) -> String {
    let mut sections = Vec::with_capacity(retrieved.len() + 3);
    sections.push(preamble.to_string());

    for set in retrieved {
        let contents = set
            .documents
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        sections.push(format!("Documents from {}:\n{}", set.index, contents));
    }

    sections.push(format!("Chat history (for context):\n{}", history));
    sections.push(format!("User question: {}", query));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn doc(content: &str) -> Document {
        Document::new(content.to_string(), BTreeMap::new())
    }

    fn sample_retrieved() -> Vec<RetrievedSet> {
        vec![
            RetrievedSet {
                index: "TechPort".to_string(),
                documents: vec![doc("Title: A\n\nDescription: alpha"), doc("Title: B\n\nDescription: beta")],
            },
            RetrievedSet {
                index: "TechTransfer".to_string(),
                documents: vec![],
            },
        ]
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let retrieved = sample_retrieved();
        let a = assemble("Preamble.", "lunar habitats", &retrieved, "User: hi");
        let b = assemble("Preamble.", "lunar habitats", &retrieved, "User: hi");
        assert_eq!(a, b);
    }

    #[test]
    fn test_assemble_section_order_and_contents() {
        let retrieved = sample_retrieved();
        let prompt = assemble("Preamble.", "lunar habitats", &retrieved, "User: lunar habitats");

        let techport_pos = prompt.find("Documents from TechPort:").unwrap();
        let techtransfer_pos = prompt.find("Documents from TechTransfer:").unwrap();
        let history_pos = prompt.find("Chat history (for context):").unwrap();
        let question_pos = prompt.find("User question: lunar habitats").unwrap();

        assert!(techport_pos < techtransfer_pos);
        assert!(techtransfer_pos < history_pos);
        assert!(history_pos < question_pos);

        // Both TechPort documents appear, separated by a blank line.
        assert!(prompt.contains("Description: alpha\n\nTitle: B"));
    }

    #[test]
    fn test_assemble_empty_index_keeps_labeled_section() {
        let retrieved = sample_retrieved();
        let prompt = assemble("Preamble.", "q", &retrieved, "");
        assert!(prompt.contains("Documents from TechTransfer:\n"));
    }
}
