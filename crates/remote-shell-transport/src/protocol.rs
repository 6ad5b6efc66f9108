//! Wire protocol for shell-to-registry communication.

use remote_shell_core::{InvokeOptions, Param, TransportError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Request from the shell to the remote registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RemoteRequest {
    /// Liveness probe.
    Echo,
    /// List components under an optional type prefix.
    ListComponents {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },
    /// List methods of a component.
    ListMethods { component: String },
    /// List fields of a composite type.
    ListFields {
        #[serde(rename = "type")]
        type_name: String,
    },
    /// Invoke a method.
    Invoke {
        component: String,
        method: String,
        params: Vec<Param>,
        #[serde(default)]
        options: InvokeOptions,
    },
}

impl RemoteRequest {
    /// Short operation name for logging.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Echo => "echo",
            Self::ListComponents { .. } => "list_components",
            Self::ListMethods { .. } => "list_methods",
            Self::ListFields { .. } => "list_fields",
            Self::Invoke { .. } => "invoke",
        }
    }
}

/// Reply from the remote registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteReply {
    /// Operation succeeded; `data` depends on the request.
    Ok { data: serde_json::Value },
    /// Operation failed on the remote side.
    Error { message: String },
}

impl RemoteReply {
    /// Create a success reply from any serializable payload.
    ///
    /// # Errors
    /// Returns error if the payload cannot be serialized.
    pub fn ok<T: Serialize>(data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Ok {
            data: serde_json::to_value(data)?,
        })
    }

    /// Decode the payload as `T`.
    ///
    /// # Errors
    /// Returns `Remote` for error replies and `Malformed` if the payload does not
    /// match the expected shape.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, TransportError> {
        match self {
            Self::Ok { data } => {
                serde_json::from_value(data).map_err(|e| TransportError::Malformed(e.to_string()))
            }
            Self::Error { message } => Err(TransportError::Remote(message)),
        }
    }
}
