//! Presentation and input seams.
//!
//! The engine never prints or reads directly. Narration goes to a
//! [`Presenter`] tagged with a [`Category`], and prompts go to an
//! [`InputSource`]. [`Transcript`] and [`ScriptedInput`] are in-memory
//! implementations for tests and tools.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of text is being reported. Front ends style by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Scene prose and general narration.
    Narration,
    /// Spoken lines and dialogue menus.
    Dialogue,
    /// Combat rounds.
    Combat,
    /// Found items and revealed secrets.
    Discovery,
    /// Errors, help, and status.
    System,
    /// Music and sound cues.
    Audio,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Narration => "narration",
            Category::Dialogue => "dialogue",
            Category::Combat => "combat",
            Category::Discovery => "discovery",
            Category::System => "system",
            Category::Audio => "audio",
        };
        f.write_str(s)
    }
}

/// Receives everything the engine has to say.
pub trait Presenter {
    /// Show one piece of text.
    fn report(&mut self, text: &str, category: Category);
}

/// Supplies answers to prompts.
pub trait InputSource {
    /// Ask for a line of input. `None` means no more input will come.
    fn request_input(&mut self, prompt: &str) -> Option<String>;
}

/// A presenter that records everything in memory.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<(Category, String)>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, in order.
    pub fn entries(&self) -> &[(Category, String)] {
        &self.entries
    }

    /// Texts reported in one category.
    pub fn in_category(&self, category: Category) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, t)| t.as_str())
            .collect()
    }

    /// Whether any entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|(_, t)| t.contains(needle))
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|(_, t)| t.as_str())
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Presenter for Transcript {
    fn report(&mut self, text: &str, category: Category) {
        self.entries.push((category, text.to_string()));
    }
}

/// An input source that replays queued answers, then reports closed.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    /// Queue the given answers.
    pub fn new<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Queue one more answer.
    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    /// Prompts seen so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn request_input(&mut self, prompt: &str) -> Option<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_records_in_order() {
        let mut t = Transcript::new();
        t.report("You wake up.", Category::Narration);
        t.report("Hello.", Category::Dialogue);
        assert_eq!(t.entries().len(), 2);
        assert_eq!(t.in_category(Category::Dialogue), vec!["Hello."]);
        assert!(t.contains("wake"));
        assert_eq!(t.last(), Some("Hello."));
        t.clear();
        assert!(t.entries().is_empty());
    }

    #[test]
    fn scripted_input_runs_dry() {
        let mut input = ScriptedInput::new(["1"]);
        assert_eq!(input.request_input("Choose"), Some("1".to_string()));
        assert_eq!(input.request_input("Choose"), None);
        assert_eq!(input.prompts().len(), 2);
    }
}
