//! Mock providers for testing.
//!
//! In-memory stand-ins for the HTTP transport and the address provider,
//! with call accounting so tests can assert on request counts.

pub mod fixtures;
pub mod provider;
pub mod transport;

pub use provider::MockAddressProvider;
pub use transport::{MockResponse, MockTransport};
