//! Single-screen to-do list.
//!
//! An ordered, in-memory list of todo items (name, completion flag,
//! priority) behind a Store. The presentation layer gets a [`TodoManager`]
//! at startup, reads the list from it, calls its four mutations, and
//! re-renders whenever a snapshot arrives on its subscription.
//!
//! - `append`: add an item at the end
//! - `update`: overwrite an item's fields, located by id
//! - `move_items`: drag a set of rows to a new position
//! - `delete`: remove a set of rows
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use todo::{TodoEnvironment, TodoManager};
//! use todo_store_core::environment::UuidGenerator;
//!
//! let mut manager = TodoManager::initialize(TodoEnvironment::new(Arc::new(UuidGenerator)));
//! let mut updates = manager.subscribe();
//!
//! let edited = manager.todos()[0].clone().with_name("Buy milk").with_completed(true);
//! assert!(manager.update(edited));
//!
//! let latest = updates.try_recv().unwrap();
//! assert_eq!(latest.todos()[0].name, "Buy milk");
//! assert_eq!(latest.todos()[0].priority, "P1");
//! ```

pub mod config;
pub mod manager;
pub mod reducer;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, DemoConfig, RenderFormat};
pub use manager::{TodoManager, TodoStore};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{Todo, TodoAction, TodoError, TodoId, TodoList};
