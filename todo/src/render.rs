//! Plain-text and JSON renderings of the list for the terminal demo.

use crate::config::RenderFormat;
use crate::types::{Todo, TodoList};

/// One list row: completion mark, name and priority
#[must_use]
pub fn render_row(todo: &Todo) -> String {
    let mark = if todo.completed { "x" } else { " " };
    format!("[{mark}] {} {}", todo.name, todo.priority)
}

/// Render the list in the requested format
///
/// # Errors
///
/// Returns a `serde_json::Error` if JSON serialization fails.
pub fn render(list: &TodoList, format: RenderFormat) -> Result<String, serde_json::Error> {
    match format {
        RenderFormat::Rows => Ok(list
            .todos()
            .iter()
            .map(render_row)
            .collect::<Vec<_>>()
            .join("\n")),
        RenderFormat::Json => serde_json::to_string_pretty(list),
    }
}
