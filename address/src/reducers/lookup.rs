//! Lookup reducer.
//!
//! Every reduction that changes the state is written through to session
//! storage before the reducer returns.

use crate::actions::LookupAction;
use crate::environment::AddressEnvironment;
use crate::error::LookupError;
use crate::postal_code;
use crate::providers::AddressProvider;
use crate::state::LookupState;
use chrono::SubsecRound;
use std::marker::PhantomData;
use vitrine_core::{Effect, Reducer, SmallVec, async_effect, smallvec};

/// Reducer for [`LookupState`].
pub struct LookupReducer<P> {
    _provider: PhantomData<fn() -> P>,
}

impl<P> LookupReducer<P> {
    /// Create a new lookup reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _provider: PhantomData,
        }
    }
}

impl<P> Default for LookupReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for LookupReducer<P> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for LookupReducer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LookupReducer")
    }
}

impl<P> LookupReducer<P>
where
    P: AddressProvider + Clone + 'static,
{
    fn fetch(
        state: &mut LookupState,
        input: &str,
        env: &AddressEnvironment<P>,
    ) -> SmallVec<[Effect<LookupAction>; 4]> {
        let code = postal_code::format(input);

        if !postal_code::validate(&code) {
            tracing::debug!(input = %code, "Rejected CEP with wrong digit count");
            state.is_loading = false;
            state.error = Some(LookupError::InvalidFormat.to_string());
            return SmallVec::new();
        }

        state.is_loading = true;
        state.error = None;
        state.current_code.clone_from(&code);

        tracing::info!(cep = %code, "Looking up CEP");
        let provider = env.provider.clone();
        smallvec![async_effect! {
            let result = provider.fetch_address(&code).await;
            Some(LookupAction::settled(code, result))
        }]
    }
}

impl<P> Reducer for LookupReducer<P>
where
    P: AddressProvider + Clone + 'static,
{
    type State = LookupState;
    type Action = LookupAction;
    type Environment = AddressEnvironment<P>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let before = state.clone();

        let effects = match action {
            LookupAction::FetchByCode { input } => Self::fetch(state, &input, env),

            LookupAction::LookupSucceeded { code, record } => {
                // Only the request for the current code may settle it.
                if state.is_loading && code == state.current_code {
                    tracing::info!(cep = %code, city = %record.city, "CEP resolved");
                    state.record = Some(record);
                    state.error = None;
                    state.last_updated = Some(env.clock.now().trunc_subsecs(3));
                    state.is_loading = false;
                } else {
                    tracing::debug!(cep = %code, "Ignoring stale lookup result");
                }
                SmallVec::new()
            },

            LookupAction::LookupFailed { code, error } => {
                if state.is_loading && code == state.current_code {
                    tracing::warn!(
                        cep = %code,
                        error = %error,
                        detail = error.detail().unwrap_or_default(),
                        "CEP lookup failed"
                    );
                    state.record = None;
                    state.error = Some(error.to_string());
                    state.last_updated = None;
                    state.is_loading = false;
                } else {
                    tracing::debug!(cep = %code, "Ignoring stale lookup failure");
                }
                SmallVec::new()
            },

            LookupAction::Clear => {
                *state = LookupState::default();
                SmallVec::new()
            },

            LookupAction::ClearError => {
                state.error = None;
                SmallVec::new()
            },
        };

        if *state != before {
            env.persist(state);
        }

        effects
    }
}
