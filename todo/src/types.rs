//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of items. Order is meaningful: it is
//! the display order, and the user can rearrange it by dragging rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use todo_store_core::environment::IdGenerator;
use todo_store_core::{OffsetError, Offsets};

/// Unique identifier for a todo item
///
/// Assigned once when the item is created and never reassigned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Draw a fresh id from the given generator
    #[must_use]
    pub fn generate(ids: &dyn IdGenerator) -> Self {
        Self(ids.next_id())
    }

    /// Wrap an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single todo item
///
/// The id is fixed at construction. Everything else is freely editable,
/// typically on a detached copy that is committed back with
/// [`TodoAction::Update`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    /// Free-form label
    pub name: String,
    /// Whether the item is done
    pub completed: bool,
    /// Free-form priority label, e.g. `"P1"`
    pub priority: String,
}

impl Todo {
    /// Creates a todo with a fresh id
    #[must_use]
    pub fn new(
        ids: &dyn IdGenerator,
        name: impl Into<String>,
        completed: bool,
        priority: impl Into<String>,
    ) -> Self {
        Self::with_id(TodoId::generate(ids), name, completed, priority)
    }

    /// Creates a todo with a known id
    #[must_use]
    pub fn with_id(
        id: TodoId,
        name: impl Into<String>,
        completed: bool,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            completed,
            priority: priority.into(),
        }
    }

    /// The item's identity
    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    /// Copy every editable field from `other`, keeping this item's id
    pub fn assign_fields(&mut self, other: Todo) {
        self.name = other.name;
        self.completed = other.completed;
        self.priority = other.priority;
    }

    /// Set the name (builder style)
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the completion flag (builder style)
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Set the priority (builder style)
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }
}

/// Errors raised when an action does not fit the current list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// An offset or destination does not address the list
    #[error(transparent)]
    Offset(#[from] OffsetError),
}

/// State of the todo list
///
/// The ordered sequence of items. Ids are unique within it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    todos: Vec<Todo>,
}

impl TodoList {
    /// Names of the items every new list starts with
    pub const SEED_NAMES: [&'static str; 3] = ["item 1", "item 2", "item 3"];

    /// Priority given to the seeded items
    pub const SEED_PRIORITY: &'static str = "P1";

    /// Creates an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self { todos: Vec::new() }
    }

    /// Creates the startup list: three open items at priority `P1`
    #[must_use]
    pub fn seeded(ids: &dyn IdGenerator) -> Self {
        Self::SEED_NAMES
            .into_iter()
            .map(|name| Todo::new(ids, name, false, Self::SEED_PRIORITY))
            .collect()
    }

    /// The items in display order
    #[must_use]
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Returns the number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Returns true if the list has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Returns the number of completed items
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    /// Position of the item with the given id
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id() == id)
    }

    pub(crate) fn push(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    pub(crate) fn replace(&mut self, todo: Todo) -> bool {
        match self.todos.iter_mut().find(|t| t.id() == todo.id()) {
            Some(existing) => {
                existing.assign_fields(todo);
                true
            },
            None => false,
        }
    }

    pub(crate) fn move_items(&mut self, from: &Offsets, to: usize) -> Result<(), TodoError> {
        todo_store_core::offsets::move_offsets(&mut self.todos, from, to)?;
        Ok(())
    }

    pub(crate) fn remove_items(&mut self, offsets: &Offsets) -> Result<Vec<Todo>, TodoError> {
        Ok(todo_store_core::offsets::remove_offsets(&mut self.todos, offsets)?)
    }
}

impl FromIterator<Todo> for TodoList {
    fn from_iter<I: IntoIterator<Item = Todo>>(iter: I) -> Self {
        Self {
            todos: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Todo;
    type IntoIter = std::slice::Iter<'a, Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.todos.iter()
    }
}

/// Actions the list accepts
///
/// These are the only ways the list changes. Offsets are positions in the
/// list as it is when the action is sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Add an item at the end
    ///
    /// The item's id must not already be in the list.
    Append(Todo),

    /// Overwrite the fields of the item with the same id, in place
    ///
    /// A no-op if no item has that id.
    Update(Todo),

    /// Lift the items at `from` out and reinsert them, in their relative
    /// order, before position `to` of the list that remains
    Move {
        /// Positions of the items to move
        from: Offsets,
        /// Destination, resolved after the moved items were removed
        to: usize,
    },

    /// Remove the items at the given positions, all at once
    Delete {
        /// Positions of the items to delete
        offsets: Offsets,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_store_testing::test_ids;

    #[test]
    fn todo_id_display() {
        let id = TodoId::new("abc");
        assert_eq!(format!("{id}"), "abc");
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn todo_new_draws_id() {
        let ids = test_ids();
        let todo = Todo::new(&ids, "Buy milk", false, "P2");

        assert_eq!(todo.id(), &TodoId::new("todo-1"));
        assert_eq!(todo.name, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(todo.priority, "P2");
    }

    #[test]
    fn assign_fields_keeps_id() {
        let ids = test_ids();
        let mut todo = Todo::new(&ids, "a", false, "P1");
        let other = Todo::new(&ids, "b", true, "P3");

        todo.assign_fields(other);

        assert_eq!(todo.id(), &TodoId::new("todo-1"));
        assert_eq!(todo.name, "b");
        assert!(todo.completed);
        assert_eq!(todo.priority, "P3");
    }

    #[test]
    fn seeded_list() {
        let list = TodoList::seeded(&test_ids());

        assert_eq!(list.len(), 3);
        assert_eq!(list.completed_count(), 0);
        let names: Vec<_> = list.todos().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["item 1", "item 2", "item 3"]);
        assert!(list.todos().iter().all(|t| t.priority == "P1" && !t.completed));
        assert_eq!(list.position(&TodoId::new("todo-3")), Some(2));
    }

    #[test]
    fn replace_unknown_id_is_rejected() {
        let ids = test_ids();
        let mut list = TodoList::seeded(&ids);
        let stranger = Todo::new(&ids, "stranger", true, "P9");

        assert!(!list.replace(stranger));
        assert_eq!(list, TodoList::seeded(&test_ids()));
    }

    #[test]
    fn empty_names_and_priorities_are_allowed() {
        let todo = Todo::with_id(TodoId::new("x"), "", false, "");
        let list: TodoList = std::iter::once(todo).collect();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn list_serializes_as_ordered_items() {
        let list = TodoList::seeded(&test_ids());
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["todos"][0]["id"], "todo-1");
        assert_eq!(json["todos"][2]["name"], "item 3");
        assert_eq!(json["todos"][1]["priority"], "P1");
    }
}
