//! # Storefront Core
//!
//! Core traits and types for the storefront reducer architecture.
//!
//! A feature is described by four pieces:
//!
//! - **State**: owned domain data for the feature
//! - **Action**: every input the feature reacts to (user intents, timer callbacks)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of a side effect, executed later by the runtime
//!
//! Collaborators such as storage or a display surface are injected through the
//! reducer's `Environment`, so the reducer itself never performs I/O.
//!
//! ## Example
//!
//! ```ignore
//! use storefront_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
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
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
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
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CartReducer {
    ///     type State = CartState;
    ///     type Action = CartAction;
    ///     type Environment = CartEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut CartState,
    ///         action: CartAction,
    ///         env: &CartEnvironment,
    ///     ) -> SmallVec<[Effect<CartAction>; 4]> {
    ///         match action {
    ///             CartAction::ClearCart => {
    ///                 state.clear();
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => SmallVec::new(),
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce at most a handful of effects, so the result is
        /// a `SmallVec` that stays on the stack for up to four of them.
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
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts such as hiding a notification)
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

        /// Wrap a side-effecting future that never feeds an action back
        ///
        /// Convenience for "fire and forget" work such as persisting a snapshot.
        #[must_use]
        pub fn run<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = ()> + Send + 'static,
        {
            Effect::Future(Box::pin(async move {
                fut.await;
                None
            }))
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
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
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Pong,
    }

    #[test]
    fn merge_and_chain_wrap_effects() {
        let merged = Effect::<Ping>::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(merged, Effect::Parallel(ref v) if v.len() == 2));

        let chained = Effect::<Ping>::chain(vec![Effect::None]);
        assert!(matches!(chained, Effect::Sequential(ref v) if v.len() == 1));
    }

    #[test]
    fn debug_output_hides_futures() {
        let effect: Effect<Ping> = Effect::run(async {});
        assert_eq!(format!("{effect:?}"), "Effect::Future(<future>)");

        let delay = Effect::Delay {
            duration: Duration::from_secs(3),
            action: Box::new(Ping::Pong),
        };
        assert!(format!("{delay:?}").contains("Pong"));
    }

    #[test]
    fn run_effect_produces_no_action() {
        let Effect::Future(fut) = Effect::<Ping>::run(async {}) else {
            unreachable!("Effect::run always builds a future");
        };
        assert_eq!(tokio_test::block_on(fut), None);
    }

    #[test]
    fn is_none_only_for_none() {
        assert!(Effect::<Ping>::None.is_none());
        assert!(!Effect::<Ping>::merge(vec![]).is_none());
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
