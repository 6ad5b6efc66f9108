//! Blocking prompt seam.

use std::collections::VecDeque;

use thiserror::Error;

/// Prompt error.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input stream closed (end of file).
    #[error("Console input closed")]
    Closed,
    /// User interrupted the prompt.
    #[error("Prompt interrupted")]
    Interrupted,
    #[error("Console error: {0}")]
    Console(String),
}

/// Trait for asking the user a single question.
///
/// An empty answer must be reported as `default`. Callers pass
/// [`crate::literal::NULL`] as the default so "no value" is explicit.
pub trait Prompter: Send {
    fn prompt(&mut self, label: &str, default: &str, echo: bool) -> Result<String, PromptError>;
}

/// Prompter answering from a fixed script.
///
/// Useful for tests and non-interactive runs. Once the script is exhausted
/// every prompt returns its default.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    labels: Vec<String>,
}

impl ScriptedPrompter {
    /// Create a prompter with the given answers, consumed in order.
    #[must_use]
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            labels: Vec::new(),
        }
    }

    /// Queue more answers.
    pub fn push<S: Into<String>>(&mut self, answer: S) {
        self.answers.push_back(answer.into());
    }

    /// Labels of every prompt asked so far.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, label: &str, default: &str, _echo: bool) -> Result<String, PromptError> {
        self.labels.push(label.to_owned());
        Ok(match self.answers.pop_front() {
            Some(answer) if !answer.is_empty() => answer,
            _ => default.to_owned(),
        })
    }
}
