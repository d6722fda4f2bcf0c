//! Mock address provider.

use crate::error::LookupError;
use crate::postal_code;
use crate::providers::AddressProvider;
use crate::state::AddressRecord;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock provider answering from a table keyed by CEP digits.
///
/// Codes not in the table resolve to [`LookupError::NotFound`].
/// Clones share the table and the call counter.
#[derive(Debug, Clone, Default)]
pub struct MockAddressProvider {
    results: Arc<Mutex<HashMap<String, Result<AddressRecord, LookupError>>>>,
    calls: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl MockAddressProvider {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `code` to `record`.
    #[must_use]
    pub fn with_record(self, code: &str, record: AddressRecord) -> Self {
        self.with_result(code, Ok(record))
    }

    /// Fail lookups of `code` with `error`.
    #[must_use]
    pub fn with_error(self, code: &str, error: LookupError) -> Self {
        self.with_result(code, Err(error))
    }

    /// Respond after `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn with_result(self, code: &str, result: Result<AddressRecord, LookupError>) -> Self {
        if let Ok(mut results) = self.results.lock() {
            results.insert(postal_code::digits(code), result);
        }
        self
    }

    /// Number of lookups performed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressProvider for MockAddressProvider {
    fn fetch_address(
        &self,
        raw_code: &str,
    ) -> impl Future<Output = Result<AddressRecord, LookupError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .results
            .lock()
            .map_err(|_| LookupError::Unknown {
                detail: "Mutex lock failed".to_string(),
            })
            .and_then(|results| {
                results
                    .get(&postal_code::digits(raw_code))
                    .cloned()
                    .unwrap_or(Err(LookupError::NotFound))
            });
        let latency = self.latency;

        async move {
            if let Some(latency) = latency {
                tokio::time::sleep(latency).await;
            }
            result
        }
    }
}
