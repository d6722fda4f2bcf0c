//! Address state store.
//!
//! A [`vitrine_runtime::Store`] running the [`LookupReducer`], opened from
//! session storage. Operations resolve once the lookup they start has settled.

use crate::actions::LookupAction;
use crate::environment::AddressEnvironment;
use crate::postal_code;
use crate::providers::AddressProvider;
use crate::reducers::LookupReducer;
use crate::state::LookupState;
use vitrine_runtime::{Store, StoreError};

type LookupStore<P> = Store<LookupState, LookupAction, AddressEnvironment<P>, LookupReducer<P>>;

/// CEP lookup store.
///
/// Cloning shares the underlying state.
#[derive(Clone)]
pub struct AddressStore<P>
where
    P: AddressProvider + Clone + 'static,
{
    store: LookupStore<P>,
}

impl<P> AddressStore<P>
where
    P: AddressProvider + Clone + 'static,
{
    /// Open the store, rehydrating from session storage if an entry exists.
    #[must_use]
    pub fn open(env: AddressEnvironment<P>) -> Self {
        let initial = env.rehydrate();
        Self {
            store: Store::new(initial, LookupReducer::new(), env),
        }
    }

    /// Look up `input` and return the settled state.
    ///
    /// Lookup failures end up in [`LookupState::error`], never here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn fetch_by_code(&self, input: &str) -> Result<LookupState, StoreError> {
        self.dispatch(LookupAction::FetchByCode {
            input: input.to_string(),
        })
        .await
    }

    /// Reset to the initial state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn clear(&self) -> Result<LookupState, StoreError> {
        self.dispatch(LookupAction::Clear).await
    }

    /// Drop the current error message.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn clear_error(&self) -> Result<LookupState, StoreError> {
        self.dispatch(LookupAction::ClearError).await
    }

    /// True iff `code` has exactly 8 digits.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn validate(&self, code: &str) -> bool {
        postal_code::validate(code)
    }

    /// Display form of `code`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn format(&self, code: &str) -> String {
        postal_code::format(code)
    }

    /// Current state.
    pub async fn snapshot(&self) -> LookupState {
        self.store.state(Clone::clone).await
    }

    /// Stop accepting actions and wait for running effects.
    ///
    /// A lookup already in flight still settles into the state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
    /// when the default timeout expires.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.shutdown_default().await
    }

    async fn dispatch(&self, action: LookupAction) -> Result<LookupState, StoreError> {
        let mut handle = self.store.send(action).await?;
        handle.wait().await;
        Ok(self.snapshot().await)
    }
}
