//! Provider traits for the address lookup.
//!
//! These traits are the seams between the lookup logic and the outside
//! world: the HTTP transport, the address provider the reducers call, and
//! the session-scoped storage the lookup state is persisted to.

use crate::error::{LookupError, StorageError, TransportError};
use crate::state::AddressRecord;
use futures::future::AbortRegistration;
use std::future::Future;

pub mod reqwest_transport;
pub mod viacep;

pub use reqwest_transport::ReqwestTransport;
pub use viacep::{LookupClient, ProviderPayload};

/// Minimal HTTP transport used by [`LookupClient`].
///
/// # Implementation Notes
///
/// - Issue exactly one `GET` with `Accept: application/json`
/// - Wrap the exchange in [`futures::future::Abortable`] with `cancel`, so
///   that once the caller aborts, the next poll resolves immediately with
///   [`TransportError::Aborted`]. [`LookupClient`] polls once after aborting
///   and then drops the future either way.
/// - Treat non-2xx statuses as [`TransportError::Status`]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url` and decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request is aborted through `cancel`
    /// - The connection fails or the status is not a success
    /// - The body is not JSON
    fn get_json(
        &self,
        url: &str,
        cancel: AbortRegistration,
    ) -> impl Future<Output = Result<serde_json::Value, TransportError>> + Send;
}

/// Resolves a CEP to an address.
///
/// This is what the lookup reducer's environment depends on.
pub trait AddressProvider: Send + Sync {
    /// Look up `raw_code`.
    ///
    /// One call, no retries.
    ///
    /// # Errors
    ///
    /// Returns a [`LookupError`] describing why no address was produced.
    fn fetch_address(
        &self,
        raw_code: &str,
    ) -> impl Future<Output = Result<AddressRecord, LookupError>> + Send;
}

/// Session-scoped key/value storage.
///
/// Mirrors the browser storage API: synchronous string values, cleared when
/// the session ends.
pub trait SessionStorage: Send + Sync {
    /// Read `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
