//! Session error taxonomy.

use std::path::PathBuf;

use remote_shell_core::{CoercionError, ContainerError, PromptError, TransportError};

/// Session error.
///
/// Every variant terminates only the current command. See [`SessionError::is_recoverable`]
/// for the few that end the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Connection failed [{endpoint}]: {source}")]
    ConnectionFailed {
        endpoint: String,
        #[source]
        source: TransportError,
    },
    #[error("Not connected, use `config --uri <endpoint>` first")]
    NotConnected,
    #[error("Unknown component [{0}]")]
    UnknownComponent(String),
    #[error("No component selected, use `cd <component>` first")]
    NoComponentSelected,
    #[error("{kind} [{name}] does not exist")]
    NotFound { kind: &'static str, name: String },
    #[error("Type mismatch: {0}")]
    TypeMismatch(#[from] CoercionError),
    #[error("Type mismatch: object [{name}] is [{actual}], expected [{expected}]")]
    ReferenceMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Remote invocation failed: {code}: {message}")]
    RemoteInvocation { code: i32, message: String },
    #[error("Nothing to repeat, no call has succeeded yet")]
    NoHistory,
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub(crate) fn method_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "Method",
            name: name.to_owned(),
        }
    }

    /// False for faults the session cannot continue past: responses that cannot be
    /// interpreted at all, and a closed console.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Transport(TransportError::Malformed(_)) | Self::Prompt(PromptError::Closed)
        )
    }

    /// True for both literal and back-reference mismatches.
    #[must_use]
    pub const fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch(_) | Self::ReferenceMismatch { .. })
    }
}

impl From<ContainerError> for SessionError {
    fn from(err: ContainerError) -> Self {
        match err {
            ContainerError::NotFound(name) => Self::NotFound {
                kind: "Object",
                name,
            },
            ContainerError::Io { path, source } => Self::Io { path, source },
        }
    }
}
