//! # Todo Store Runtime
//!
//! Runtime implementation for the todo store.
//!
//! This crate provides the Store that owns state, runs a reducer against it,
//! and tells subscribers about every change.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, serializes mutations through the reducer
//! - **Subscriptions**: Each successful mutation publishes an `Arc` snapshot of
//!   the new state on a broadcast channel
//! - **`StoreConfig`**: Tunables for the Store (broadcast capacity)
//!
//! ## Example
//!
//! ```
//! use todo_store_core::reducer::{Reducer, Reduction};
//! use todo_store_runtime::Store;
//!
//! #[derive(Clone, Debug, Default)]
//! struct Tally {
//!     value: i32,
//! }
//!
//! struct TallyReducer;
//!
//! impl Reducer for TallyReducer {
//!     type State = Tally;
//!     type Action = i32;
//!     type Environment = ();
//!     type Error = std::convert::Infallible;
//!
//!     fn reduce(&self, state: &mut Tally, by: i32, _env: &()) -> Result<Reduction, Self::Error> {
//!         if by == 0 {
//!             return Ok(Reduction::Unchanged);
//!         }
//!         state.value += by;
//!         Ok(Reduction::Changed)
//!     }
//! }
//!
//! let mut store = Store::new(Tally::default(), TallyReducer, ());
//! let mut updates = store.subscribe();
//!
//! // Send an action
//! assert_eq!(store.send(2), Ok(Reduction::Changed));
//!
//! // Read state
//! assert_eq!(store.state(|s| s.value), 2);
//!
//! // Re-render from the published snapshot
//! assert_eq!(updates.try_recv().map(|s| s.value), Ok(2));
//!
//! // No-ops publish nothing
//! assert_eq!(store.send(0), Ok(Reduction::Unchanged));
//! assert!(updates.try_recv().is_err());
//! //! ```

use std::sync::Arc;
use todo_store_core::reducer::{Reducer, Reduction};

/// Default number of snapshots buffered per subscriber
pub const DEFAULT_BROADCAST_CAPACITY: usize = 16;

/// Largest number of snapshots a Store buffers per subscriber
pub const MAX_BROADCAST_CAPACITY: usize = 1 << 16;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use todo_store_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of state snapshots buffered for each subscriber before the
    /// oldest are dropped. Values outside `1..=MAX_BROADCAST_CAPACITY` are
    /// clamped into that range.
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }
    }

    /// Set the broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// The capacity a Store actually allocates for this configuration
    ///
    /// ```
    /// use todo_store_runtime::{MAX_BROADCAST_CAPACITY, StoreConfig};
    ///
    /// assert_eq!(StoreConfig::new(0).effective_capacity(), 1);
    /// assert_eq!(StoreConfig::new(usize::MAX).effective_capacity(), MAX_BROADCAST_CAPACITY);
    /// ```
    #[must_use]
    pub fn effective_capacity(self) -> usize {
        self.broadcast_capacity.clamp(1, MAX_BROADCAST_CAPACITY)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

/// Store module - the single writer over a piece of state
pub mod store {
    use super::{Arc, Reducer, Reduction, StoreConfig};
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned exclusively; mutated only through `send`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Subscribers (notified with a state snapshot after each change)
    ///
    /// Mutation takes `&mut self`: there is exactly one writer and every
    /// action runs to completion, notification included, before `send`
    /// returns. Readers only ever observe whole states.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        /// Snapshot broadcast channel for observing state changes.
        ///
        /// A snapshot is published only when the reducer reports
        /// [`Reduction::Changed`].
        state_broadcast: broadcast::Sender<Arc<S>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        R::Error: std::fmt::Display,
        S: Clone,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// The broadcast capacity is clamped with
        /// [`StoreConfig::effective_capacity`].
        ///
        /// # Example
        ///
        /// ```
        /// use todo_store_core::reducer::{Reducer, Reduction};
        /// use todo_store_runtime::{Store, StoreConfig};
        ///
        /// struct Toggle;
        ///
        /// impl Reducer for Toggle {
        ///     type State = bool;
        ///     type Action = ();
        ///     type Environment = ();
        ///     type Error = std::convert::Infallible;
        ///
        ///     fn reduce(&self, on: &mut bool, _: (), _: &()) -> Result<Reduction, Self::Error> {
        ///         *on = !*on;
        ///         Ok(Reduction::Changed)
        ///     }
        /// }
        ///
        /// let config = StoreConfig::default().with_broadcast_capacity(256);
        /// let mut store = Store::with_config(false, Toggle, (), config);
        /// store.send(()).unwrap();
        /// assert!(*store.current_state());
        /// ```
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let capacity = config.effective_capacity();
            if capacity != config.broadcast_capacity {
                tracing::warn!(
                    requested = config.broadcast_capacity,
                    capacity,
                    "Broadcast capacity out of range, clamped"
                );
            }
            let (state_broadcast, _) = broadcast::channel(capacity);

            Self {
                state: initial_state,
                reducer,
                environment,
                state_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Calls reducer with (state, action, environment)
        /// 2. On [`Reduction::Changed`], publishes a snapshot of the new state
        ///    to every subscriber
        ///
        /// # Errors
        ///
        /// Returns the reducer's error if the action was rejected. State is
        /// unchanged and no subscriber is notified in that case.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<Reduction, R::Error> {
            tracing::debug!("Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let start = std::time::Instant::now();
            let result = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer.reduce(&mut self.state, action, &self.environment)
            };
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            match result {
                Ok(Reduction::Changed) => {
                    self.notify();
                    Ok(Reduction::Changed)
                },
                Ok(Reduction::Unchanged) => {
                    tracing::debug!("Action was a no-op, subscribers not notified");
                    Ok(Reduction::Unchanged)
                },
                Err(error) => {
                    tracing::warn!(%error, "Action rejected");
                    metrics::counter!("store.actions.rejected").increment(1);
                    Err(error)
                },
            }
        }

        /// Read current state via a closure
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the current state
        #[must_use]
        pub const fn current_state(&self) -> &S {
            &self.state
        }

        /// Take an owned snapshot of the current state
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::new(self.state.clone())
        }

        /// Access the environment the reducer runs with
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Subscribe to state changes
        ///
        /// The receiver gets an `Arc` snapshot of the state after every
        /// action that changed it. It does not receive the state as of
        /// subscription; read that with [`Store::snapshot`].
        ///
        /// # Notes
        ///
        /// - Poll synchronously with `try_recv`, or `recv().await` from async code
        /// - A receiver that falls more than the configured capacity behind gets
        ///   `Lagged` and resumes from the oldest retained snapshot; since each
        ///   snapshot is a whole state, rendering the newest one is always enough
        #[must_use]
        pub fn subscribe(&self) -> broadcast::Receiver<Arc<S>> {
            self.state_broadcast.subscribe()
        }

        /// Number of live subscribers
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.state_broadcast.receiver_count()
        }

        fn notify(&self) {
            if self.state_broadcast.receiver_count() == 0 {
                tracing::trace!("State changed, no subscribers");
                return;
            }

            let snapshot = Arc::new(self.state.clone());
            // Only fails when every receiver has been dropped in between
            let delivered = self.state_broadcast.send(snapshot).unwrap_or(0);
            tracing::trace!(subscribers = delivered, "Published state snapshot");
            metrics::counter!("store.notifications.total").increment(1);
        }
    }

    impl<S, A, E, R> std::fmt::Debug for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        S: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Store")
                .field("state", &self.state)
                .field("subscribers", &self.state_broadcast.receiver_count())
                .finish_non_exhaustive()
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;
    use tokio::sync::broadcast::error::TryRecvError;

    #[derive(Debug, Clone, PartialEq)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        NoOp,
        Reject,
    }

    #[derive(Debug, Error, PartialEq)]
    #[error("rejected")]
    struct Rejected;

    struct TestEnv;

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;
        type Error = Rejected;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Result<Reduction, Rejected> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    Ok(Reduction::Changed)
                },
                TestAction::NoOp => Ok(Reduction::Unchanged),
                TestAction::Reject => Err(Rejected),
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[test]
    fn test_send_updates_state() {
        let mut store = test_store();

        assert_eq!(store.send(TestAction::Increment), Ok(Reduction::Changed));
        assert_eq!(store.state(|s| s.value), 1);
        assert_eq!(store.current_state().value, 1);
    }

    #[test]
    fn test_change_notifies_subscribers() {
        let mut store = test_store();
        let mut first = store.subscribe();
        let mut second = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        store.send(TestAction::Increment).unwrap();

        assert_eq!(first.try_recv().unwrap().value, 1);
        assert_eq!(second.try_recv().unwrap().value, 1);
    }

    #[test]
    fn test_noop_does_not_notify() {
        let mut store = test_store();
        let mut rx = store.subscribe();

        assert_eq!(store.send(TestAction::NoOp), Ok(Reduction::Unchanged));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_rejection_does_not_notify() {
        let mut store = test_store();
        let mut rx = store.subscribe();

        assert_eq!(store.send(TestAction::Reject), Err(Rejected));
        assert_eq!(store.state(|s| s.value), 0);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_send_without_subscribers() {
        let mut store = test_store();
        store.send(TestAction::Increment).unwrap();
        store.send(TestAction::Increment).unwrap();
        assert_eq!(store.snapshot().value, 2);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_changes() {
        let mut store = test_store();
        let before = store.snapshot();
        store.send(TestAction::Increment).unwrap();

        assert_eq!(before.value, 0);
        assert_eq!(store.snapshot().value, 1);
    }

    #[test]
    fn test_lagging_subscriber_skips_to_retained_snapshots() {
        let config = StoreConfig::default().with_broadcast_capacity(2);
        let mut store = Store::with_config(TestState { value: 0 }, TestReducer, TestEnv, config);
        let mut rx = store.subscribe();

        for _ in 0..5 {
            store.send(TestAction::Increment).unwrap();
        }

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(3))));
        assert_eq!(rx.try_recv().unwrap().value, 4);
        assert_eq!(rx.try_recv().unwrap().value, 5);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = StoreConfig::new(0);
        let mut store = Store::with_config(TestState { value: 0 }, TestReducer, TestEnv, config);
        let mut rx = store.subscribe();

        store.send(TestAction::Increment).unwrap();
        assert_eq!(rx.try_recv().unwrap().value, 1);
    }

    #[test]
    fn test_oversized_capacity_is_clamped() {
        let config = StoreConfig::new(usize::MAX / 2 + 1);
        assert_eq!(config.effective_capacity(), MAX_BROADCAST_CAPACITY);

        let mut store = Store::with_config(TestState { value: 0 }, TestReducer, TestEnv, config);
        let mut rx = store.subscribe();

        store.send(TestAction::Increment).unwrap();
        assert_eq!(rx.try_recv().unwrap().value, 1);
    }

    #[tokio::test]
    async fn test_async_subscriber_receives_snapshot() {
        let mut store = test_store();
        let mut rx = store.subscribe();

        let observer = tokio::spawn(async move { rx.recv().await.map(|s| s.value) });

        store.send(TestAction::Increment).unwrap();

        assert_eq!(observer.await.unwrap().unwrap(), 1);
    }
}
