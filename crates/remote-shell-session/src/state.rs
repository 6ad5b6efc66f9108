//! Session state and configuration.

use remote_shell_core::InvokeOptions;
use serde::{Deserialize, Serialize};

/// Mutable per-session state, written only by the command currently executing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Endpoint of the live transport binding.
    pub endpoint: Option<String>,
    /// Selected component; always present in the cached directory.
    pub current_component: Option<String>,
    /// Type prefix used when listing components.
    pub component_prefix: Option<String>,
    /// Remote log level requested with each call.
    pub log_level: Option<String>,
    /// Capture database logs with each call.
    pub database_log_enabled: bool,
    /// Log lines returned by the last successful call.
    pub last_log: Option<String>,
}

impl SessionState {
    /// Options forwarded to the transport with every invocation.
    #[must_use]
    pub fn invoke_options(&self) -> InvokeOptions {
        InvokeOptions {
            log_level: self.log_level.clone(),
            capture_db_log: self.database_log_enabled,
        }
    }
}

/// Configuration update applied by `Session::configure`.
///
/// `None` leaves the corresponding setting untouched. An empty prefix or log
/// level clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOptions {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub enable_database_log: Option<bool>,
}

impl SessionOptions {
    /// True if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.prefix.is_none()
            && self.log_level.is_none()
            && self.enable_database_log.is_none()
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
