//! Address widget handle.
//!
//! Owns a store running the [`WidgetReducer`] in front of a shared
//! [`AddressStore`]. Dropping the handle cancels a pending close timer, so no
//! timer fires after teardown. The lookup store outlives the widget.

use crate::actions::WidgetAction;
use crate::config::WidgetConfig;
use crate::environment::WidgetEnvironment;
use crate::providers::AddressProvider;
use crate::reducers::{CLOSE_TIMER, WidgetReducer, WidgetState, WidgetView};
use crate::store::AddressStore;
use tokio::sync::broadcast;
use vitrine_runtime::{EffectHandle, Store, StoreError};

type WidgetStore<P> = Store<WidgetState, WidgetAction, WidgetEnvironment<P>, WidgetReducer<P>>;

/// Hover-triggered CEP popup.
pub struct AddressWidget<P>
where
    P: AddressProvider + Clone + 'static,
{
    store: WidgetStore<P>,
}

impl<P> AddressWidget<P>
where
    P: AddressProvider + Clone + 'static,
{
    /// Mount the widget in front of `lookup`.
    #[must_use]
    pub fn open(lookup: AddressStore<P>, config: WidgetConfig) -> Self {
        let env = WidgetEnvironment::new(lookup, config);
        Self {
            store: Store::new(WidgetState::default(), WidgetReducer::new(), env),
        }
    }

    /// The lookup store this widget submits to.
    #[must_use]
    pub fn lookup_store(&self) -> &AddressStore<P> {
        &self.store.environment().store
    }

    /// Send a raw widget action.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the widget was disposed.
    pub async fn dispatch(&self, action: WidgetAction) -> Result<EffectHandle, StoreError> {
        self.store.send(action).await
    }

    /// Pointer entered the trigger or the popup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the widget was disposed.
    pub async fn pointer_enter(&self) -> Result<(), StoreError> {
        self.dispatch(WidgetAction::PointerEntered).await.map(drop)
    }

    /// Pointer left; the popup closes after the configured delay unless the
    /// pointer comes back.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the widget was disposed.
    pub async fn pointer_leave(&self) -> Result<(), StoreError> {
        self.dispatch(WidgetAction::PointerLeft).await.map(drop)
    }

    /// Cancel button.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the widget was disposed.
    pub async fn close(&self) -> Result<(), StoreError> {
        self.dispatch(WidgetAction::CloseRequested).await.map(drop)
    }

    /// Keystroke; returns the input field contents after formatting.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the widget was disposed.
    pub async fn type_input(&self, value: &str) -> Result<String, StoreError> {
        self.dispatch(WidgetAction::InputChanged {
            value: value.to_string(),
        })
        .await?;
        Ok(self.store.state(|s| s.input.clone()).await)
    }

    /// Submit the typed code and wait for the lookup to settle.
    ///
    /// Does nothing while the lookup store is loading, as the submit
    /// control is disabled then.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the widget was disposed.
    pub async fn submit(&self) -> Result<WidgetView, StoreError> {
        let view = self.state().await;
        if view.submit_disabled() {
            tracing::debug!("Submit ignored while a lookup is in flight");
            return Ok(view);
        }
        let mut handle = self.dispatch(WidgetAction::Submit).await?;
        handle.wait().await;
        Ok(self.state().await)
    }

    /// Widget state together with the lookup store's current snapshot.
    pub async fn state(&self) -> WidgetView {
        WidgetView {
            widget: self.store.state(Clone::clone).await,
            lookup: self.lookup_store().snapshot().await,
        }
    }

    /// Text on the trigger.
    pub async fn trigger_label(&self) -> String {
        let placeholder = &self.store.environment().config.placeholder;
        self.state().await.trigger_label(placeholder)
    }

    /// Widget settings.
    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.store.environment().config
    }

    /// Actions produced by the widget's effects (timer firings, lookup outcomes).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetAction> {
        self.store.subscribe_actions()
    }

    /// Unmount: cancel the close timer and stop accepting actions.
    ///
    /// The lookup store is left running for its other users.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if a lookup is still running
    /// when the shutdown timeout expires.
    pub async fn dispose(self) -> Result<(), StoreError> {
        self.dispatch(WidgetAction::Disposed).await?;
        self.store.shutdown_default().await
    }
}

impl<P> Drop for AddressWidget<P>
where
    P: AddressProvider + Clone + 'static,
{
    fn drop(&mut self) {
        let cancelled = self.store.cancel(&CLOSE_TIMER);
        if cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled close timer on drop");
        }
    }
}
