//! Widget reducer: hover popup in front of the lookup store.
//!
//! # States
//!
//! `Closed` (initial) and `Open`. Leaving the widget arms a close timer
//! (a cancellable delayed effect under [`CLOSE_TIMER`]); coming back before
//! it fires cancels it. Each timer carries a generation, and a firing from
//! any timer but the latest armed one is ignored.
//!
//! The widget keeps no lookup state of its own. A valid submit calls
//! [`AddressStore::fetch_by_code`](crate::AddressStore::fetch_by_code) and
//! reacts to the outcome; what the trigger shows is read from the store.

use crate::actions::WidgetAction;
use crate::environment::WidgetEnvironment;
use crate::error::LookupError;
use crate::postal_code;
use crate::providers::AddressProvider;
use crate::state::LookupState;
use std::marker::PhantomData;
use vitrine_core::{Effect, EffectId, Reducer, SmallVec, async_effect, delay, smallvec};

/// Cancellation id of the close timer.
pub const CLOSE_TIMER: EffectId = EffectId::new("address-widget.close-timer");

/// Popup visibility.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Popup {
    /// Only the trigger is visible
    #[default]
    Closed,
    /// The input popup is visible
    Open,
}

/// Widget-local state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetState {
    /// Popup visibility
    pub popup: Popup,

    /// Input field contents, always in display form
    pub input: String,

    /// A close timer is running
    pub close_pending: bool,

    /// Generation of the most recently armed close timer
    pub close_generation: u64,

    /// The digit-count hint is visible
    pub show_format_hint: bool,

    /// A submitted lookup has not settled yet
    pub awaiting_result: bool,
}

impl WidgetState {
    /// Whether the popup is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.popup == Popup::Open
    }
}

/// What the widget renders: its own state plus the store's
/// `(is_loading, error, record)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetView {
    /// Widget-local state
    pub widget: WidgetState,

    /// Lookup store snapshot
    pub lookup: LookupState,
}

impl WidgetView {
    /// Whether the popup is visible.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.widget.is_open()
    }

    /// Trigger text: `"{city}, {state_code}"` once an address is known,
    /// `placeholder` until then.
    #[must_use]
    pub fn trigger_label(&self, placeholder: &str) -> String {
        match &self.lookup.record {
            Some(record) if record.is_valid => record.short_label(),
            _ => placeholder.to_string(),
        }
    }

    /// The submit control is disabled while a lookup is in flight.
    #[must_use]
    pub const fn submit_disabled(&self) -> bool {
        self.lookup.is_loading || self.widget.awaiting_result
    }

    /// Text shown beneath the input: the local hint, else the lookup error.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if self.widget.show_format_hint {
            Some(LookupError::InvalidFormat.to_string())
        } else {
            self.lookup.error.clone()
        }
    }
}

/// Reducer for [`WidgetState`].
pub struct WidgetReducer<P> {
    _provider: PhantomData<fn() -> P>,
}

impl<P> WidgetReducer<P> {
    /// Create a new widget reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _provider: PhantomData,
        }
    }
}

impl<P> Default for WidgetReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for WidgetReducer<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for WidgetReducer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WidgetReducer")
    }
}

fn disarm(state: &mut WidgetState) -> Option<Effect<WidgetAction>> {
    if state.close_pending {
        state.close_pending = false;
        Some(Effect::Cancel(CLOSE_TIMER))
    } else {
        None
    }
}

impl<P> Reducer for WidgetReducer<P>
where
    P: AddressProvider + Clone + 'static,
{
    type State = WidgetState;
    type Action = WidgetAction;
    type Environment = WidgetEnvironment<P>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            WidgetAction::PointerEntered => {
                state.popup = Popup::Open;
                disarm(state).into_iter().collect()
            },

            WidgetAction::PointerLeft => {
                if !state.is_open() {
                    return SmallVec::new();
                }
                state.close_pending = true;
                state.close_generation += 1;
                let generation = state.close_generation;
                tracing::trace!(
                    delay_ms = env.config.close_delay.as_millis(),
                    generation,
                    "Arming close timer"
                );
                smallvec![
                    delay! {
                        duration: env.config.close_delay,
                        action: WidgetAction::CloseTimerElapsed { generation }
                    }
                    .cancellable(CLOSE_TIMER)
                ]
            },

            WidgetAction::CloseTimerElapsed { generation } => {
                if state.close_pending && generation == state.close_generation {
                    state.close_pending = false;
                    state.popup = Popup::Closed;
                } else {
                    tracing::trace!(generation, "Ignoring superseded close timer");
                }
                SmallVec::new()
            },

            WidgetAction::CloseRequested => {
                state.popup = Popup::Closed;
                state.show_format_hint = false;
                disarm(state).into_iter().collect()
            },

            WidgetAction::InputChanged { value } => {
                state.input = postal_code::format(&value);
                state.show_format_hint = false;
                SmallVec::new()
            },

            WidgetAction::Submit => {
                if state.awaiting_result {
                    return SmallVec::new();
                }
                if !postal_code::validate(&state.input) {
                    state.show_format_hint = true;
                    return SmallVec::new();
                }
                state.show_format_hint = false;
                state.awaiting_result = true;

                let store = env.store.clone();
                let input = state.input.clone();
                smallvec![async_effect! {
                    let resolved = match store.fetch_by_code(&input).await {
                        Ok(lookup) => lookup.error.is_none() && lookup.has_valid_record(),
                        Err(error) => {
                            tracing::warn!(error = %error, "Lookup store rejected submit");
                            false
                        },
                    };
                    Some(WidgetAction::LookupSettled { resolved })
                }]
            },

            WidgetAction::LookupSettled { resolved } => {
                if !state.awaiting_result {
                    return SmallVec::new();
                }
                state.awaiting_result = false;
                if resolved {
                    tracing::debug!("Lookup settled with an address, closing popup");
                    state.popup = Popup::Closed;
                    disarm(state).into_iter().collect()
                } else {
                    SmallVec::new()
                }
            },

            WidgetAction::Disposed => {
                state.close_pending = false;
                smallvec![Effect::Cancel(CLOSE_TIMER)]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::environment::AddressEnvironment;
    use crate::mocks::{MockAddressProvider, fixtures};
    use crate::store::AddressStore;
    use crate::stores::MemoryStorage;
    use std::sync::Arc;
    use vitrine_testing::{ReducerTest, assertions, test_clock};

    fn env() -> WidgetEnvironment<MockAddressProvider> {
        let store = AddressStore::open(AddressEnvironment::new(
            MockAddressProvider::new(),
            Arc::new(MemoryStorage::new()),
            Arc::new(test_clock()),
        ));
        WidgetEnvironment::new(store, WidgetConfig::default())
    }

    fn open() -> WidgetState {
        WidgetState {
            popup: Popup::Open,
            ..WidgetState::default()
        }
    }

    #[test]
    fn test_pointer_enter_opens() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState::default())
            .when_action(WidgetAction::PointerEntered)
            .then_state(|state| assert!(state.is_open()))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_pointer_leave_arms_cancellable_timer() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::PointerLeft)
            .then_state(|state| {
                assert!(state.is_open());
                assert!(state.close_pending);
                assert_eq!(state.close_generation, 1);
            })
            .then_effects(|effects| assertions::assert_has_cancellable_delay(effects, &CLOSE_TIMER))
            .run();
    }

    #[test]
    fn test_pointer_leave_while_closed_does_nothing() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState::default())
            .when_action(WidgetAction::PointerLeft)
            .then_state(|state| {
                assert!(!state.close_pending);
                assert_eq!(state.close_generation, 0);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_reenter_cancels_timer() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::PointerEntered)
            .then_state(|state| {
                assert!(state.is_open());
                assert!(!state.close_pending);
            })
            .then_effects(|effects| assertions::assert_cancels(effects, &CLOSE_TIMER))
            .run();
    }

    #[test]
    fn test_disarmed_timer_is_ignored() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::CloseTimerElapsed { generation: 0 })
            .then_state(|state| assert!(state.is_open()))
            .run();
    }

    #[test]
    fn test_firing_from_earlier_timer_is_ignored() {
        // First timer already fired and is queued when the pointer comes
        // back and leaves again.
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::PointerEntered)
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::CloseTimerElapsed { generation: 1 })
            .then_state(|state| {
                assert!(state.is_open());
                assert!(state.close_pending);
                assert_eq!(state.close_generation, 2);
            })
            .run();
    }

    #[test]
    fn test_latest_timer_closes() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::PointerEntered)
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::CloseTimerElapsed { generation: 2 })
            .then_state(|state| {
                assert_eq!(state.popup, Popup::Closed);
                assert!(!state.close_pending);
            })
            .run();
    }

    #[test]
    fn test_input_is_formatted() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::InputChanged {
                value: "01310100".to_string(),
            })
            .then_state(|state| assert_eq!(state.input, "01310-100"))
            .run();
    }

    #[test]
    fn test_invalid_submit_shows_hint() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState {
                input: "123".to_string(),
                ..open()
            })
            .when_action(WidgetAction::Submit)
            .then_state(|state| {
                assert!(state.is_open());
                assert!(state.show_format_hint);
                assert!(!state.awaiting_result);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_submit_while_awaiting_is_ignored() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState {
                input: "01310-100".to_string(),
                awaiting_result: true,
                ..open()
            })
            .when_action(WidgetAction::Submit)
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_valid_submit_calls_store() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState {
                input: "01310-100".to_string(),
                ..open()
            })
            .when_action(WidgetAction::Submit)
            .then_state(|state| {
                assert!(state.awaiting_result);
                assert!(!state.show_format_hint);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_resolved_settle_closes() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState {
                awaiting_result: true,
                ..open()
            })
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::LookupSettled { resolved: true })
            .then_state(|state| {
                assert_eq!(state.popup, Popup::Closed);
                assert!(!state.awaiting_result);
                assert!(!state.close_pending);
            })
            .then_effects(|effects| assertions::assert_cancels(effects, &CLOSE_TIMER))
            .run();
    }

    #[test]
    fn test_unresolved_settle_stays_open() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(WidgetState {
                awaiting_result: true,
                ..open()
            })
            .when_action(WidgetAction::LookupSettled { resolved: false })
            .then_state(|state| {
                assert!(state.is_open());
                assert!(!state.awaiting_result);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_dispose_cancels_timer() {
        ReducerTest::new(WidgetReducer::new())
            .with_env(env())
            .given_state(open())
            .when_action(WidgetAction::PointerLeft)
            .when_action(WidgetAction::Disposed)
            .then_state(|state| assert!(!state.close_pending))
            .then_effects(|effects| assertions::assert_cancels(effects, &CLOSE_TIMER))
            .run();
    }

    #[test]
    fn test_view_reads_lookup_fields() {
        let failed = WidgetView {
            widget: open(),
            lookup: LookupState {
                current_code: "99999-999".to_string(),
                error: Some(LookupError::NotFound.to_string()),
                ..LookupState::default()
            },
        };
        assert_eq!(failed.trigger_label("Informe seu CEP"), "Informe seu CEP");
        assert_eq!(failed.message().as_deref(), Some("CEP não encontrado"));
        assert!(!failed.submit_disabled());

        let resolved = WidgetView {
            widget: WidgetState::default(),
            lookup: LookupState {
                record: Some(fixtures::paulista_record()),
                ..LookupState::default()
            },
        };
        assert_eq!(resolved.trigger_label("Informe seu CEP"), "São Paulo, SP");

        let loading = WidgetView {
            widget: open(),
            lookup: LookupState {
                is_loading: true,
                ..LookupState::default()
            },
        };
        assert!(loading.submit_disabled());
    }

    #[test]
    fn test_hint_takes_precedence_over_store_error() {
        let view = WidgetView {
            widget: WidgetState {
                show_format_hint: true,
                ..open()
            },
            lookup: LookupState {
                error: Some(LookupError::Timeout.to_string()),
                ..LookupState::default()
            },
        };
        assert_eq!(view.message().as_deref(), Some("CEP deve conter 8 dígitos"));
    }
}
