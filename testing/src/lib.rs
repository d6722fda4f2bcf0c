//! # Vitrine Testing
//!
//! Testing utilities and helpers for the Vitrine reducer architecture.
//!
//! This crate provides:
//! - Deterministic clocks for the `Clock` environment trait
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effect lists
//! - Tracing setup for tests
//!
//! ## Example
//!
//! ```ignore
//! use vitrine_testing::test_clock;
//! use vitrine_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_lookup_flow() {
//!     let env = test_environment(test_clock());
//!     let store = Store::new(LookupState::default(), LookupReducer::new(), env);
//!
//!     store.send(LookupAction::FetchByCode { input: "01310100".into() }).await;
//! }
//! ```

use chrono::{DateTime, Utc};
use vitrine_core::environment::Clock;


/// Mock implementations of core Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use vitrine_testing::mocks::FixedClock;
    /// use vitrine_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that only moves when a test advances it
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl ManualClock {
        /// Create a manual clock starting at `start`
        #[must_use]
        pub fn new(start: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(start)),
            }
        }

        /// Move the clock forward
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// The instant every test clock starts at (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `fmt` tracing subscriber for the current test binary
    ///
    /// Honours `RUST_LOG`; safe to call from every test since only the
    /// first call installs the subscriber.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use helpers::init_test_tracing;
pub use mocks::{test_clock, test_epoch, FixedClock, ManualClock};
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(time1.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(test_epoch());
        clock.advance(chrono::Duration::milliseconds(1500));
        assert_eq!(clock.now() - test_epoch(), chrono::Duration::milliseconds(1500));
    }
}
