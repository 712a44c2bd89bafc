//! The todo list context object handed to the presentation layer.
//!
//! `TodoManager` is created once at startup and passed to whatever renders
//! the list. It owns the [`Store`], exposes the list's mutation operations
//! under their domain names, and hands out read access and subscriptions.

use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{Todo, TodoAction, TodoError, TodoList};
use std::sync::Arc;
use todo_store_core::Offsets;
use todo_store_runtime::{Store, StoreConfig};
use tokio::sync::broadcast;

/// Store specialised to the todo list
pub type TodoStore = Store<TodoList, TodoAction, TodoEnvironment, TodoReducer>;

/// Owner of the todo list for the lifetime of the process
///
/// Every successful mutation publishes a snapshot of the whole list to
/// subscribers before the method returns.
#[derive(Debug)]
pub struct TodoManager {
    store: TodoStore,
}

impl TodoManager {
    /// Create the manager with the three seeded items
    #[must_use]
    pub fn initialize(env: TodoEnvironment) -> Self {
        Self::with_config(env, StoreConfig::default())
    }

    /// Create the manager with the three seeded items and custom store settings
    #[must_use]
    pub fn with_config(env: TodoEnvironment, config: StoreConfig) -> Self {
        let seeded = TodoList::seeded(env.ids.as_ref());
        tracing::info!(items = seeded.len(), "Initialized todo list");
        Self {
            store: Store::with_config(seeded, TodoReducer::new(), env, config),
        }
    }

    /// Add an item at the end of the list
    ///
    /// The item's id must not already be in the list.
    pub fn append(&mut self, todo: Todo) {
        if let Err(error) = self.store.send(TodoAction::Append(todo)) {
            tracing::warn!(%error, "Append rejected");
        }
    }

    /// Create an open item with a fresh id and append it
    ///
    /// Returns a copy of the new item.
    pub fn add(&mut self, name: impl Into<String>, priority: impl Into<String>) -> Todo {
        let todo = self.store.environment().new_todo(name, priority);
        self.append(todo.clone());
        todo
    }

    /// Commit an edited copy of an item
    ///
    /// Overwrites name, completion and priority of the item with the same id,
    /// keeping its position. Returns false, changing nothing and notifying
    /// nobody, if no item has that id.
    pub fn update(&mut self, todo: Todo) -> bool {
        matches!(
            self.store.send(TodoAction::Update(todo)),
            Ok(reduction) if reduction.is_changed()
        )
    }

    /// Move the items at `from` to sit, as one block, before `to`
    ///
    /// `to` is a position in the list after the moved items were lifted out.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Offset`] if an offset or the destination is out of
    /// range. The list is unchanged in that case.
    pub fn move_items(&mut self, from: Offsets, to: usize) -> Result<(), TodoError> {
        self.store.send(TodoAction::Move { from, to }).map(|_| ())
    }

    /// Delete the items at the given positions, all at once
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Offset`] if an offset is out of range. The list is
    /// unchanged in that case.
    pub fn delete(&mut self, offsets: Offsets) -> Result<(), TodoError> {
        self.store.send(TodoAction::Delete { offsets }).map(|_| ())
    }

    /// The items in display order
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        self.store.current_state().todos()
    }

    /// Read the list via a closure
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoList) -> T,
    {
        self.store.state(f)
    }

    /// Owned snapshot of the list
    #[must_use]
    pub fn snapshot(&self) -> Arc<TodoList> {
        self.store.snapshot()
    }

    /// Subscribe to list changes
    ///
    /// Receives a snapshot of the list after every successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TodoList>> {
        self.store.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_store_testing::test_ids;
    use tokio::sync::broadcast::error::TryRecvError;

    fn manager() -> TodoManager {
        TodoManager::initialize(TodoEnvironment::new(Arc::new(test_ids())))
    }

    #[test]
    fn test_initialize_seeds_three_items() {
        let manager = manager();
        let todos = manager.todos();

        assert_eq!(todos.len(), 3);
        assert_eq!(todos[0].name, "item 1");
        assert_eq!(todos[2].name, "item 3");
        assert!(todos.iter().all(|t| t.priority == "P1" && !t.completed));
    }

    #[test]
    fn test_add_draws_next_id() {
        let mut manager = manager();
        let todo = manager.add("Walk dog", "P2");

        assert_eq!(todo.id().as_str(), "todo-4");
        assert_eq!(manager.todos().last(), Some(&todo));
    }

    #[test]
    fn test_update_reports_match() {
        let mut manager = manager();
        let edited = manager.todos()[1].clone().with_name("renamed");

        assert!(manager.update(edited));
        assert_eq!(manager.todos()[1].name, "renamed");
    }

    #[test]
    fn test_update_unknown_is_silent() {
        let mut manager = manager();
        let mut rx = manager.subscribe();
        let before = manager.snapshot();

        let stranger = Todo::with_id(crate::TodoId::new("missing"), "x", true, "P9");
        assert!(!manager.update(stranger));

        assert_eq!(*manager.snapshot(), *before);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_rejected_move_does_not_notify() {
        let mut manager = manager();
        let mut rx = manager.subscribe();

        assert!(manager.move_items(Offsets::from(3), 0).is_err());
        assert!(manager.delete(Offsets::from(3)).is_err());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_append_notifies_with_item_last() {
        let mut manager = manager();
        let mut rx = manager.subscribe();
        let todo = Todo::with_id(crate::TodoId::new("extra"), "Water plants", false, "P3");

        manager.append(todo.clone());

        let latest = rx.try_recv().unwrap();
        assert_eq!(latest.len(), 4);
        assert_eq!(latest.todos().last(), Some(&todo));
    }

    #[test]
    fn test_delete_nothing_does_not_notify() {
        let mut manager = manager();
        let mut rx = manager.subscribe();
        let before = manager.snapshot();

        manager.delete(Offsets::new()).unwrap();

        assert_eq!(*manager.snapshot(), *before);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_every_mutation_notifies_with_new_list() {
        let mut manager = manager();
        let mut rx = manager.subscribe();

        manager.add("four", "P2");
        assert_eq!(rx.try_recv().unwrap().len(), 4);

        manager.move_items(Offsets::from(3), 0).unwrap();
        assert_eq!(rx.try_recv().unwrap().todos()[0].name, "four");

        manager.delete(Offsets::from([0, 1])).unwrap();
        let latest = rx.try_recv().unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest.as_ref(), &*manager.snapshot());
    }
}
