//! # Todo Store Testing
//!
//! Testing utilities and helpers for the todo store.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies for offset operations
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_testing::test_ids;
//!
//! #[test]
//! fn test_seeded_list() {
//!     let env = TodoEnvironment::new(Arc::new(test_ids()));
//!     let manager = TodoManager::initialize(env);
//!
//!     assert_eq!(manager.todos().len(), 3);
//! }
//! ```

use todo_store_core::environment::IdGenerator;


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::IdGenerator;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Sequential id generator for deterministic tests
    ///
    /// Produces `"{prefix}-1"`, `"{prefix}-2"`, ... in call order.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_store_testing::mocks::SequentialIdGenerator;
    /// use todo_store_core::environment::IdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new("todo");
    /// assert_eq!(ids.next_id(), "todo-1");
    /// assert_eq!(ids.next_id(), "todo-2");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose ids start at `{prefix}-1`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }

        /// Number of ids handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.next.load(Ordering::Relaxed) - 1
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }

    /// Create the default sequential generator for tests (`todo-1`, `todo-2`, ...)
    #[must_use]
    pub fn test_ids() -> SequentialIdGenerator {
        SequentialIdGenerator::new("todo")
    }
}

/// Property-based testing utilities
///
/// Strategies producing valid arguments for offset-based list operations
/// against a list of known length.
pub mod properties {
    use proptest::prelude::*;
    use proptest::sample::Index;
    use todo_store_core::Offsets;

    /// Any set of in-range offsets for a list of length `len` (possibly empty)
    pub fn offsets_within(len: usize) -> impl Strategy<Value = Offsets> {
        proptest::collection::vec(any::<Index>(), 0..=len).prop_map(move |picks| {
            if len == 0 {
                return Offsets::new();
            }
            picks.iter().map(|pick| pick.index(len)).collect()
        })
    }

    /// In-range source offsets plus a destination valid after their removal
    pub fn move_arguments(len: usize) -> impl Strategy<Value = (Offsets, usize)> {
        (offsets_within(len), any::<Index>()).prop_map(move |(from, pick)| {
            let remaining = len - from.len();
            (from, pick.index(remaining + 1))
        })
    }
}

// Re-export commonly used items
pub use mocks::{SequentialIdGenerator, test_ids};
