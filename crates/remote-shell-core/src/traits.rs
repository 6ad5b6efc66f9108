//! Remote directory model and the transport seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strip the package part of a fully-qualified type name.
///
/// `java.lang.String` becomes `String`; names without a dot are returned as-is.
#[must_use]
pub fn simple_type_name(type_name: &str) -> &str {
    type_name
        .rsplit_once('.')
        .map_or(type_name, |(_, simple)| simple)
}

/// A discoverable remote component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    /// Registry name used to address the component.
    pub name: String,
    /// Fully-qualified remote type of the component.
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ComponentInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// One method parameter or one struct field as reported by the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl FieldInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// An invokable remote method.
///
/// The order of `params` is the positional order expected by the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodInfo {
    pub name: String,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<FieldInfo>,
}

impl MethodInfo {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        return_type: impl Into<String>,
        params: Vec<FieldInfo>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            params,
        }
    }

    /// Render as `Return name(Type param, ...)` using simple type names.
    #[must_use]
    pub fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(|p| format!("{} {}", simple_type_name(&p.type_name), p.name))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} {}({params})",
            simple_type_name(&self.return_type),
            self.name
        )
    }
}

/// One positional argument: the declared type and its literal or JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
}

impl Param {
    #[must_use]
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

/// Per-invocation options forwarded to the remote side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeOptions {
    /// Remote log verbosity to capture for this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Capture database statement logs.
    #[serde(default)]
    pub capture_db_log: bool,
}

/// Response envelope of a remote invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

impl InvokeResponse {
    /// Response code signalling success.
    pub const SUCCESS: i32 = 0;

    /// Create a successful response.
    #[must_use]
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            code: Self::SUCCESS,
            message: None,
            result: Some(result.into()),
            logs: None,
        }
    }

    /// Create a remote-reported failure.
    #[must_use]
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            result: None,
            logs: None,
        }
    }

    /// Attach captured log lines.
    #[must_use]
    pub fn with_logs(mut self, logs: Vec<String>) -> Self {
        self.logs = Some(logs);
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == Self::SUCCESS
    }
}

/// Transport error.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Remote unreachable: {0}")]
    Unreachable(String),
    #[error("Remote error: {0}")]
    Remote(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Trait for a bound RPC channel to a remote registry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Liveness check; returns the remote echo text.
    async fn probe(&self) -> Result<String, TransportError>;

    /// List components, optionally restricted to a type-name prefix.
    async fn list_components(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<ComponentInfo>, TransportError>;

    /// List the methods of one component.
    async fn list_methods(&self, component: &str) -> Result<Vec<MethodInfo>, TransportError>;

    /// List the fields of a composite type.
    async fn list_fields(&self, type_name: &str) -> Result<Vec<FieldInfo>, TransportError>;

    /// Invoke a method with positional parameters.
    async fn invoke(
        &self,
        component: &str,
        method: &str,
        params: &[Param],
        options: &InvokeOptions,
    ) -> Result<InvokeResponse, TransportError>;
}

/// Trait for establishing a transport binding to an endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: Transport;

    /// Bind to `endpoint`. Implementations must not probe; the session does.
    async fn connect(&self, endpoint: &str) -> Result<Self::Transport, TransportError>;
}
