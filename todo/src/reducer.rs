//! Reducer logic for the todo list.
//!
//! Validates each action against the current list and applies it in place.
//! Every action either changes the list, is a no-op, or is rejected before
//! anything is touched.

use crate::types::{Todo, TodoAction, TodoError, TodoList};
use std::sync::Arc;
use todo_store_core::environment::IdGenerator;
use todo_store_core::reducer::{Reducer, Reduction};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for newly created items
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Creates a new item with a fresh id from this environment
    #[must_use]
    pub fn new_todo(&self, name: impl Into<String>, priority: impl Into<String>) -> Todo {
        Todo::new(self.ids.as_ref(), name, false, priority)
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoList;
    type Action = TodoAction;
    type Environment = TodoEnvironment;
    type Error = TodoError;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Result<Reduction, Self::Error> {
        match action {
            TodoAction::Append(todo) => {
                tracing::debug!(id = %todo.id(), "Appending todo");
                state.push(todo);
                Ok(Reduction::Changed)
            },

            TodoAction::Update(todo) => {
                let id = todo.id().clone();
                if state.replace(todo) {
                    tracing::debug!(%id, "Updated todo");
                    Ok(Reduction::Changed)
                } else {
                    tracing::debug!(%id, "No todo with this id, update ignored");
                    Ok(Reduction::Unchanged)
                }
            },

            TodoAction::Move { from, to } => {
                if from.is_empty() {
                    return Ok(Reduction::Unchanged);
                }
                state.move_items(&from, to)?;
                tracing::debug!(%from, to, "Moved todos");
                Ok(Reduction::Changed)
            },

            TodoAction::Delete { offsets } => {
                if offsets.is_empty() {
                    return Ok(Reduction::Unchanged);
                }
                let removed = state.remove_items(&offsets)?;
                tracing::debug!(%offsets, removed = removed.len(), "Deleted todos");
                Ok(Reduction::Changed)
            },
        }
    }
}
