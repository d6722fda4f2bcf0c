//! # Vitrine Address
//!
//! CEP (Brazilian postal code) lookup for the storefront header.
//!
//! ## Components
//!
//! - **Lookup client**: validates the code locally, then issues one request
//!   to the provider, raced against a timeout that aborts the transport
//! - **Lookup store**: current code, resolved address, loading and error
//!   flags; written through to session storage after every change
//! - **Widget**: hover popup with a delayed close, formatting input as the
//!   user types and closing once a lookup resolves; it submits through the
//!   lookup store and renders from it
//!
//! ## Architecture
//!
//! Both the store and the widget are reducers run by a
//! [`vitrine_runtime::Store`]. The lookup store is the only writer of the
//! lookup state:
//!
//! ```text
//! WidgetAction → WidgetReducer → popup / input state
//!                     │
//!                     └→ Effect::Future(AddressStore::fetch_by_code) → WidgetAction::LookupSettled
//!
//! LookupAction → LookupReducer → LookupState → session storage
//!                     │
//!                     └→ Effect::Future(provider lookup) → LookupAction
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitrine_address::*;
//! use vitrine_core::SystemClock;
//!
//! let client = LookupClient::new(ReqwestTransport::new(), LookupConfig::from_env()?);
//! let env = AddressEnvironment::new(client, Arc::new(MemoryStorage::new()), Arc::new(SystemClock));
//!
//! let store = AddressStore::open(env);
//! let state = store.fetch_by_code("01310-100").await?;
//! assert_eq!(state.record.map(|r| r.city).as_deref(), Some("São Paulo"));
//! ```

pub mod actions;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod mocks;
pub mod postal_code;
pub mod providers;
pub mod reducers;
pub mod state;
pub mod store;
pub mod stores;
pub mod widget;

pub use actions::{LookupAction, WidgetAction};
pub use config::{LookupConfig, WidgetConfig};
pub use environment::{AddressEnvironment, WidgetEnvironment};
pub use error::{ConfigError, LookupError, StorageError, TransportError};
pub use postal_code::PostalCode;
pub use providers::{
    AddressProvider, HttpTransport, LookupClient, ReqwestTransport, SessionStorage,
};
pub use reducers::{LookupReducer, Popup, WidgetReducer, WidgetState, WidgetView};
pub use state::{AddressRecord, LookupState};
pub use store::AddressStore;
pub use stores::{FileSessionStorage, MemoryStorage};
pub use widget::AddressWidget;
