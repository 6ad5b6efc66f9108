//! Line-editor backed prompter.

use remote_shell_core::{PromptError, Prompter};
use rustyline::{DefaultEditor, error::ReadlineError};

/// Prompter reading answers from the terminal.
///
/// Each question gets a fresh editor without history, so answers never land in
/// the command history.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn prompt(&mut self, label: &str, default: &str, echo: bool) -> Result<String, PromptError> {
        if !echo {
            tracing::debug!(label, "Masked input is not supported, echoing");
        }
        let mut editor = DefaultEditor::new().map_err(console)?;

        let (head, last) = label.rsplit_once('\n').unwrap_or(("", label));
        if !head.is_empty() {
            println!("{head}");
        }
        match editor.readline(&format!("{last}: ")) {
            Ok(answer) => Ok(answer_or_default(answer, default)),
            Err(ReadlineError::Eof) => Err(PromptError::Closed),
            Err(ReadlineError::Interrupted) => Err(PromptError::Interrupted),
            Err(e) => Err(console(e)),
        }
    }
}

fn console(e: ReadlineError) -> PromptError {
    PromptError::Console(e.to_string())
}

fn answer_or_default(answer: String, default: &str) -> String {
    let answer = answer.trim_end_matches(['\r', '\n']);
    if answer.is_empty() {
        default.to_owned()
    } else {
        answer.to_owned()
    }
}
