//! Mock HTTP transport.

use crate::error::TransportError;
use crate::mocks::fixtures;
use crate::providers::HttpTransport;
use futures::future::{AbortRegistration, Abortable};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted transport outcome.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 200 with this body
    Json(Value),
    /// Non-success status
    Status(u16),
    /// Connection failure
    Unreachable(String),
}

/// Mock transport routing requests by the CEP digits in the URL.
///
/// Unknown codes answer like the real provider does (`{"erro": true}`).
/// Clones share scripts and counters.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requested: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
    aborted: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Create a transport with no scripted codes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `digits` with `body`.
    #[must_use]
    pub fn with_address(self, digits: &str, body: Value) -> Self {
        self.with_response(digits, MockResponse::Json(body))
    }

    /// Answer `digits` with `response`.
    #[must_use]
    pub fn with_response(self, digits: &str, response: MockResponse) -> Self {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(digits.to_string(), response);
        }
        self
    }

    /// Hold every response for `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests issued.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requested.lock().map_or(0, |urls| urls.len())
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().map(|urls| urls.clone()).unwrap_or_default()
    }

    /// Number of requests that observed their cancellation token.
    #[must_use]
    pub fn abort_count(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }

    fn response_for(&self, url: &str) -> MockResponse {
        let Ok(responses) = self.responses.lock() else {
            return MockResponse::Unreachable("Mutex lock failed".to_string());
        };
        url.split('/')
            .find_map(|segment| responses.get(segment).cloned())
            .unwrap_or_else(|| MockResponse::Json(fixtures::not_found_payload()))
    }
}

impl HttpTransport for MockTransport {
    fn get_json(
        &self,
        url: &str,
        cancel: AbortRegistration,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        let response = self.response_for(url);
        let delay = self.delay;
        let aborted = Arc::clone(&self.aborted);

        let exchange = async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match response {
                MockResponse::Json(body) => Ok(body),
                MockResponse::Status(status) => Err(TransportError::Status(status)),
                MockResponse::Unreachable(reason) => Err(TransportError::Request(reason)),
            }
        };

        async move {
            match Abortable::new(exchange, cancel).await {
                Ok(result) => result,
                Err(_) => {
                    aborted.fetch_add(1, Ordering::SeqCst);
                    Err(TransportError::Aborted)
                }
            }
        }
    }
}
