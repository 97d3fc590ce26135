//! Bounded conversation memory.
//!
//! A session-scoped, append-only log of chat turns, truncated to the most
//! recent `max_history`. The cap is a deliberate bound on prompt size and
//! generation cost, not a storage limitation. Memory is never persisted
//! across sessions; the caller (the chat loop) owns its lifetime and passes
//! it into the answer pipeline explicitly.

use std::collections::VecDeque;

/// Default number of retained turns (3 user/assistant pairs).
pub const DEFAULT_MAX_HISTORY: usize = 6;

/// Label used for assistant turns in rendered history.
const ASSISTANT_LABEL: &str = "NASA Companion";

/// Label used for user turns in rendered history.
const USER_LABEL: &str = "User";

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// The label used when rendering this role into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => USER_LABEL,
            Role::Assistant => ASSISTANT_LABEL,
        }
    }
}

/// One exchange unit: a user utterance or an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered, bounded log of conversation turns.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    turns: VecDeque<Turn>,
    max_history: usize,
}

impl ConversationMemory {
    /// Create an empty memory retaining at most `max_history` turns.
    pub fn new(max_history: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            max_history,
        }
    }

    /// Append one turn, evicting the oldest turns if the cap is exceeded.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.max_history {
            self.turns.pop_front();
        }
    }

    /// The retained turns, oldest first.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Render the retained turns as `"{label}: {text}"` lines.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop all retained turns.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Number of retained turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns are retained.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_evicts_oldest_beyond_cap() {
        let mut memory = ConversationMemory::new(6);
        for i in 0..10 {
            memory.append(Turn::user(format!("question {}", i)));
        }

        assert_eq!(memory.len(), 6);
        let snapshot = memory.snapshot();
        assert_eq!(snapshot[0].text, "question 4");
        assert_eq!(snapshot[5].text, "question 9");
    }

    #[test]
    fn test_render_labels_roles() {
        let mut memory = ConversationMemory::new(6);
        memory.append(Turn::user("How is AI used in space communications?"));
        memory.append(Turn::assistant("AI routes signals adaptively."));

        assert_eq!(
            memory.render(),
            "User: How is AI used in space communications?\n\
             NASA Companion: AI routes signals adaptively."
        );
    }

    #[test]
    fn test_render_empty_memory() {
        let memory = ConversationMemory::new(6);
        assert_eq!(memory.render(), "");
    }

    #[test]
    fn test_clear() {
        let mut memory = ConversationMemory::new(6);
        memory.append(Turn::user("hello"));
        memory.clear();
        assert!(memory.is_empty());
    }
}
