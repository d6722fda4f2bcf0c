//! Environment for the address reducers.

use crate::config::WidgetConfig;
use crate::constants::STORAGE_KEY;
use crate::providers::{AddressProvider, SessionStorage};
use crate::state::{LookupState, PersistedLookup};
use crate::store::AddressStore;
use std::sync::Arc;
use vitrine_core::environment::Clock;

/// Dependencies injected into the lookup reducer.
///
/// # Type Parameters
///
/// - `P`: Address provider
#[derive(Clone)]
pub struct AddressEnvironment<P>
where
    P: AddressProvider + Clone,
{
    /// Address provider
    pub provider: P,

    /// Session storage the lookup state is persisted to
    pub storage: Arc<dyn SessionStorage>,

    /// Clock used to stamp successful lookups
    pub clock: Arc<dyn Clock>,
}

impl<P> AddressEnvironment<P>
where
    P: AddressProvider + Clone,
{
    /// Create an environment.
    #[must_use]
    pub fn new(provider: P, storage: Arc<dyn SessionStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            storage,
            clock,
        }
    }

    /// Write `state` to session storage.
    ///
    /// Failures are logged; persistence never fails an action.
    pub fn persist(&self, state: &LookupState) {
        let json = match serde_json::to_string(&PersistedLookup::from(state)) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(error = %error, "Failed to serialize lookup state");
                return;
            },
        };

        if let Err(error) = self.storage.set(STORAGE_KEY, &json) {
            tracing::warn!(error = %error, "Failed to persist lookup state");
        }
    }

    /// Read the persisted state, falling back to the initial state when the
    /// entry is missing or unreadable.
    #[must_use]
    pub fn rehydrate(&self) -> LookupState {
        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LookupState::default(),
            Err(error) => {
                tracing::warn!(error = %error, "Failed to read persisted lookup state");
                return LookupState::default();
            },
        };

        match serde_json::from_str::<PersistedLookup>(&raw) {
            Ok(persisted) => {
                let state = LookupState::from(persisted);
                tracing::debug!(cep = %state.current_code, "Rehydrated lookup state");
                state
            },
            Err(error) => {
                tracing::warn!(error = %error, "Ignoring corrupt persisted lookup state");
                LookupState::default()
            },
        }
    }
}

/// Dependencies injected into the widget reducer.
///
/// The widget owns no lookup state: submits go through `store`, which stays
/// the only writer of the persisted entry.
#[derive(Clone)]
pub struct WidgetEnvironment<P>
where
    P: AddressProvider + Clone + 'static,
{
    /// Shared lookup store
    pub store: AddressStore<P>,

    /// Presentation settings
    pub config: WidgetConfig,
}

impl<P> WidgetEnvironment<P>
where
    P: AddressProvider + Clone + 'static,
{
    /// Create a widget environment over `store`.
    #[must_use]
    pub fn new(store: AddressStore<P>, config: WidgetConfig) -> Self {
        Self { store, config }
    }
}
