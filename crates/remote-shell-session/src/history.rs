//! Single-slot invocation history.

use remote_shell_core::{MethodInfo, Param};

use crate::SessionError;

/// A successful invocation, replayable as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub component: String,
    pub method: MethodInfo,
    pub params: Vec<Param>,
}

/// Remembers the most recent successful invocation.
#[derive(Debug, Clone, Default)]
pub struct History {
    last: Option<Invocation>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot.
    pub fn record(&mut self, invocation: Invocation) {
        tracing::trace!(
            component = %invocation.component,
            method = %invocation.method.name,
            "Recorded invocation"
        );
        self.last = Some(invocation);
    }

    /// The invocation to replay.
    ///
    /// # Errors
    /// Returns `NoHistory` if nothing has been recorded.
    pub fn repeat(&self) -> Result<&Invocation, SessionError> {
        self.last.as_ref().ok_or(SessionError::NoHistory)
    }

    #[must_use]
    pub const fn last(&self) -> Option<&Invocation> {
        self.last.as_ref()
    }
}
