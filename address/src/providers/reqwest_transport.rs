//! `reqwest`-backed HTTP transport.

use crate::error::TransportError;
use crate::providers::HttpTransport;
use futures::future::{AbortRegistration, Abortable};
use reqwest::header::ACCEPT;
use std::future::Future;

/// HTTP transport over a shared [`reqwest::Client`].
///
/// Cloning shares the connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport over an existing client (proxies, custom TLS, ...).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn get_json(
        &self,
        url: &str,
        cancel: AbortRegistration,
    ) -> impl Future<Output = Result<serde_json::Value, TransportError>> + Send {
        let request = self.client.get(url).header(ACCEPT, "application/json");

        let exchange = async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status(status.as_u16()));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        };

        async move {
            Abortable::new(exchange, cancel)
                .await
                .unwrap_or(Err(TransportError::Aborted))
        }
    }
}
