//! Tab completion.

use remote_shell_core::{Connector, Prompter};
use remote_shell_session::{CompletionKind, Session};
use rustyline::{
    Context, Helper, Highlighter, Hinter, Validator,
    completion::{Completer, Pair},
};

use crate::commands;

/// Names known to the session when the line editor was last refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub components: Vec<String>,
    pub methods: Vec<String>,
    /// What `ls` lists from the current location.
    pub browse: Vec<String>,
    pub containers: Vec<String>,
}

impl Snapshot {
    #[must_use]
    pub fn capture<C: Connector, P: Prompter>(session: &Session<C, P>) -> Self {
        Self {
            components: session.completions(CompletionKind::Components, ""),
            methods: session.completions(CompletionKind::Methods, ""),
            browse: session.completions(CompletionKind::Common, ""),
            containers: session.completions(CompletionKind::Containers, ""),
        }
    }

    /// Start offset of the word under the cursor and its candidates.
    #[must_use]
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = line.get(..pos).unwrap_or(line);
        let start = head.rfind(|c: char| c.is_ascii_whitespace()).map_or(0, |i| i + 1);
        let partial = &head[start..];
        let words: Vec<&str> = head[..start].split_whitespace().collect();

        let pool: Vec<&str> = match words.as_slice() {
            [] => commands::NAMES.to_vec(),
            ["cd"] => self.components.iter().map(String::as_str).collect(),
            ["ls"] => self.browse.iter().map(String::as_str).collect(),
            ["call"] => self.methods.iter().map(String::as_str).collect(),
            ["print" | "write"] => self.containers.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        };
        let found = pool
            .into_iter()
            .filter(|name| name.starts_with(partial))
            .map(ToOwned::to_owned)
            .collect();
        (start, found)
    }
}

#[derive(Debug, Default, Helper, Highlighter, Hinter, Validator)]
pub struct ShellHelper {
    snapshot: Snapshot,
}

impl ShellHelper {
    pub fn update(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
    }
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, found) = self.snapshot.candidates(line, pos);
        let pairs = found
            .into_iter()
            .map(|name| Pair {
                display: name.clone(),
                replacement: name,
            })
            .collect();
        Ok((start, pairs))
    }
}
