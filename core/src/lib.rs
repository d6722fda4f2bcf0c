//! # Vitrine Core
//!
//! Core traits and types for the Vitrine reducer architecture.
//!
//! Storefront features are written as reducers: pure state transitions that
//! describe their side effects instead of performing them. The runtime crate
//! executes those descriptions and feeds any resulting actions back in.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature
//! - **Action**: All possible inputs to a reducer (user intents and results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Example
//!
//! ```ignore
//! use vitrine_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct CartState {
//!     items: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CartAction {
//!     AddItem,
//! }
//!
//! impl Reducer for CartReducer {
//!     type State = CartState;
//!     type Action = CartAction;
//!     type Environment = CartEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CartState,
//!         action: CartAction,
//!         env: &CartEnvironment,
//!     ) -> SmallVec<[Effect<CartAction>; 4]> {
//!         state.items += 1;
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Declarative macros for building effects
pub mod effect_macros;

pub use effect::{Effect, EffectId};
pub use environment::{Clock, SystemClock};
pub use reducer::Reducer;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This function:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable and cancellable.
pub mod effect {
    use std::borrow::Cow;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::time::Duration;

    /// Identifier used to cancel in-flight effects
    ///
    /// Effects wrapped in [`Effect::Cancellable`] are registered under their id
    /// by the runtime; [`Effect::Cancel`] aborts everything registered under it.
    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct EffectId(Cow<'static, str>);

    impl EffectId {
        /// Create an id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(Cow::Borrowed(name))
        }

        /// Create an id from an owned name (e.g. one id per widget instance)
        #[must_use]
        pub fn owned(name: String) -> Self {
            Self(Cow::Owned(name))
        }

        /// The id as a string slice
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, debounced UI timers)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// Run `effect` so that it can later be aborted through `id`
        ///
        /// Starting a cancellable effect cancels whatever is still in flight
        /// under the same id.
        Cancellable {
            /// Cancellation identifier
            id: EffectId,
            /// The effect to run
            effect: Box<Effect<Action>>,
        },

        /// Abort every in-flight effect registered under the id
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Make this effect cancellable under `id`
        #[must_use]
        pub fn cancellable(self, id: EffectId) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(self),
            }
        }

        /// Whether this is a no-op
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }

    impl<Action> Effect<Action>
    where
        Action: Send + 'static,
    {
        /// Transform the actions this effect produces
        ///
        /// Used by parent reducers that embed a child reducer and wrap its
        /// actions in one of their own variants.
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            self.map_shared(&Arc::new(f))
        }

        fn map_shared<B, F>(self, f: &Arc<F>) -> Effect<B>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => {
                    Effect::Parallel(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Sequential(effects) => {
                    Effect::Sequential(effects.into_iter().map(|e| e.map_shared(f)).collect())
                },
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => {
                    let f = Arc::clone(f);
                    Effect::Future(Box::pin(async move { fut.await.map(|a| f(a)) }))
                },
                Effect::Cancellable { id, effect } => Effect::Cancellable {
                    id,
                    effect: Box::new(effect.map_shared(f)),
                },
                Effect::Cancel(id) => Effect::Cancel(id),
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Child {
        Loaded(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Parent {
        Child(Child),
    }

    #[test]
    fn test_map_delay_wraps_action() {
        let effect = Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(Child::Loaded(1)),
        }
        .map(Parent::Child);

        match effect {
            Effect::Delay { action, .. } => assert_eq!(*action, Parent::Child(Child::Loaded(1))),
            other => unreachable!("unexpected effect: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_map_future_wraps_output() {
        let effect: Effect<Child> = Effect::Future(Box::pin(async { Some(Child::Loaded(7)) }));

        let Effect::Future(fut) = effect.map(Parent::Child) else {
            unreachable!("map must preserve the Future variant");
        };
        assert_eq!(fut.await, Some(Parent::Child(Child::Loaded(7))));
    }

    #[test]
    fn test_map_keeps_cancellation_ids() {
        let id = EffectId::new("timer");
        let effect = Effect::Delay {
            duration: Duration::from_millis(5),
            action: Box::new(Child::Loaded(1)),
        }
        .cancellable(id.clone())
        .map(Parent::Child);

        assert!(matches!(effect, Effect::Cancellable { id: ref got, .. } if *got == id));
        assert!(matches!(
            Effect::<Child>::Cancel(id.clone()).map(Parent::Child),
            Effect::Cancel(ref got) if *got == id
        ));
    }

    #[test]
    fn test_effect_id_display() {
        assert_eq!(EffectId::new("close-timer").to_string(), "close-timer");
        assert_eq!(EffectId::owned("widget-1".to_string()).as_str(), "widget-1");
    }
}
