//! JSON-over-HTTP binding.

use async_trait::async_trait;
use remote_shell_core::{
    ComponentInfo, Connector, FieldInfo, InvokeOptions, InvokeResponse, MethodInfo, Param,
    Transport, TransportError,
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::protocol::{RemoteReply, RemoteRequest};

/// Path appended to the configured endpoint.
pub const SERVICE_PATH: &str = "shellRemote";

/// Connector producing [`HttpTransport`] bindings.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    client: reqwest::Client,
}

impl HttpConnector {
    /// Create a connector with a caller-supplied client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Resolve the service URL for an endpoint such as `http://host:8080/app`.
///
/// # Errors
/// Returns `InvalidEndpoint` if the endpoint is not an http(s) URL.
pub fn service_url(endpoint: &str) -> Result<Url, TransportError> {
    let raw = format!("{}/{SERVICE_PATH}", endpoint.trim().trim_end_matches('/'));
    let url = Url::parse(&raw).map_err(|e| TransportError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TransportError::InvalidEndpoint(format!(
            "{endpoint}: unsupported scheme {other}"
        ))),
    }
}

#[async_trait]
impl Connector for HttpConnector {
    type Transport = HttpTransport;

    async fn connect(&self, endpoint: &str) -> Result<HttpTransport, TransportError> {
        let url = service_url(endpoint)?;
        tracing::debug!(%url, "Bound HTTP transport");
        Ok(HttpTransport {
            client: self.client.clone(),
            url,
        })
    }
}

/// Transport posting [`RemoteRequest`]s to a single service URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
}

impl HttpTransport {
    /// The service URL this binding posts to.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    async fn send<T: DeserializeOwned>(&self, request: &RemoteRequest) -> Result<T, TransportError> {
        tracing::trace!(op = request.op(), url = %self.url, "Sending request");
        let response = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Unreachable(format!("HTTP {status}")));
        }

        let reply: RemoteReply = response
            .json()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        reply.into_data()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn probe(&self) -> Result<String, TransportError> {
        self.send(&RemoteRequest::Echo).await
    }

    async fn list_components(
        &self,
        prefix: Option<&str>,
    ) -> Result<Vec<ComponentInfo>, TransportError> {
        self.send(&RemoteRequest::ListComponents {
            prefix: prefix.map(ToOwned::to_owned),
        })
        .await
    }

    async fn list_methods(&self, component: &str) -> Result<Vec<MethodInfo>, TransportError> {
        self.send(&RemoteRequest::ListMethods {
            component: component.to_owned(),
        })
        .await
    }

    async fn list_fields(&self, type_name: &str) -> Result<Vec<FieldInfo>, TransportError> {
        self.send(&RemoteRequest::ListFields {
            type_name: type_name.to_owned(),
        })
        .await
    }

    async fn invoke(
        &self,
        component: &str,
        method: &str,
        params: &[Param],
        options: &InvokeOptions,
    ) -> Result<InvokeResponse, TransportError> {
        self.send(&RemoteRequest::Invoke {
            component: component.to_owned(),
            method: method.to_owned(),
            params: params.to_vec(),
            options: options.clone(),
        })
        .await
    }
}
