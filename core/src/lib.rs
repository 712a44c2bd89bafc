//! # Todo Store Core
//!
//! Core traits and algorithms for the todo store.
//!
//! This crate provides the abstractions the runtime and the domain crate are
//! built on:
//!
//! - **Reducer**: `(State, Action, Environment) → Result<Reduction, Error>`
//! - **Reduction**: whether a reducer step changed state (and observers must
//!   be notified) or was a no-op
//! - **Environment**: injected dependencies, currently id generation
//! - **Offsets**: ordered position sets and the move/remove algorithms a
//!   drag-to-reorder list needs
//!
//! ## Example
//!
//! ```
//! use todo_store_core::reducer::{Reducer, Reduction};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! enum NamesAction {
//!     Push(String),
//! }
//!
//! struct NamesReducer;
//!
//! impl Reducer for NamesReducer {
//!     type State = Names;
//!     type Action = NamesAction;
//!     type Environment = ();
//!     type Error = std::convert::Infallible;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Names,
//!         action: NamesAction,
//!         _env: &(),
//!     ) -> Result<Reduction, Self::Error> {
//!         match action {
//!             NamesAction::Push(name) => state.0.push(name),
//!         }
//!         Ok(Reduction::Changed)
//!     }
//! }
//!
//! let mut names = Names::default();
//! let outcome = NamesReducer.reduce(&mut names, NamesAction::Push("a".into()), &());
//! assert_eq!(outcome, Ok(Reduction::Changed));
//! ```

pub use serde::{Deserialize, Serialize};

/// Ordered position sets and list reordering algorithms
pub mod offsets;

pub use offsets::{OffsetError, Offsets};

/// Reducer module - The core trait for business logic
///
/// Reducers are deterministic functions: `(State, Action, Environment) → Reduction`.
/// They contain all business logic and are trivially testable without a Store.
pub mod reducer {
    /// Outcome of a successful reducer step
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub enum Reduction {
        /// State was mutated; observers must be notified
        Changed,
        /// The action was a no-op; state is untouched and nobody is notified
        Unchanged,
    }

    impl Reduction {
        /// Returns true if the step mutated state
        #[must_use]
        pub const fn is_changed(self) -> bool {
            matches!(self, Self::Changed)
        }
    }

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Error`: Why an action was rejected
    ///
    /// # Contract
    ///
    /// When `reduce` returns `Err`, `state` must be exactly as it was before
    /// the call. Validation happens before mutation.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The error returned when an action is rejected
        type Error;

        /// Reduce an action into a state change
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` if the action violates a precondition of the
        /// state it is applied to. State is left untouched in that case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Reduction, Self::Error>;
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism are abstracted behind traits and injected
/// via the Environment parameter, so tests can substitute fixed values.
pub mod environment {
    use uuid::Uuid;

    /// `IdGenerator` trait - abstracts identity generation for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use todo_store_core::environment::{IdGenerator, UuidGenerator};
    ///
    /// let ids = UuidGenerator;
    /// assert_ne!(ids.next_id(), ids.next_id());
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh identifier, unique for the lifetime of the process
        fn next_id(&self) -> String;
    }

    /// Production id generator backed by random (v4) UUIDs
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            Uuid::new_v4().to_string()
        }
    }
}
