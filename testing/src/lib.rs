//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront reducer architecture.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: effect assertion helpers
//! - [`FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use storefront_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(CartReducer::new())
//!     .with_env(test_environment())
//!     .given_state(CartState::new())
//!     .when_action(CartAction::ClearCart)
//!     .then_state(|state| assert!(state.is_empty()))
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use storefront_core::environment::Clock;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of core Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use storefront_testing::mocks::FixedClock;
    /// use storefront_core::environment::Clock;
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

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
