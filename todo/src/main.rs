//! Terminal demo for the todo list.
//!
//! Plays the part of the presentation layer: it holds the `TodoManager`,
//! performs a few edits the way a user would, and re-renders the list from
//! each published snapshot.

use anyhow::Context;
use std::sync::Arc;
use todo::render::render;
use todo::{DemoConfig, TodoEnvironment, TodoList, TodoManager};
use todo_store_core::Offsets;
use todo_store_core::environment::UuidGenerator;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Render the newest snapshot waiting on the subscription, if any
fn refresh(
    updates: &mut broadcast::Receiver<Arc<TodoList>>,
    config: &DemoConfig,
    title: &str,
) -> anyhow::Result<()> {
    let mut latest = None;
    loop {
        match updates.try_recv() {
            Ok(snapshot) => latest = Some(snapshot),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Renderer fell behind, skipping to newer snapshots");
            },
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    match latest {
        Some(list) => {
            println!("\n>>> {title}");
            println!("{}", render(&list, config.render)?);
        },
        None => println!("\n>>> {title} (no change)"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,todo_store_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DemoConfig::from_env().context("reading demo configuration")?;
    tracing::info!(?config, "Starting todo demo");

    let env = TodoEnvironment::new(Arc::new(UuidGenerator));
    let mut manager = TodoManager::with_config(env, config.store_config());
    let mut updates = manager.subscribe();

    println!("=== Todo List ===");
    println!("{}", render(&manager.snapshot(), config.render)?);

    // Edit the first row and save it
    let edited = manager
        .todos()
        .first()
        .cloned()
        .context("seeded list is empty")?
        .with_name("Buy milk")
        .with_completed(true);
    if !manager.update(edited) {
        tracing::warn!("Edited todo no longer in the list");
    }
    refresh(&mut updates, &config, "Saved edit of row 0")?;

    let added = manager.add("Walk dog", "P2");
    tracing::info!(id = %added.id(), "Added todo");
    refresh(&mut updates, &config, "Appended \"Walk dog\"")?;

    // Drag rows 0 and 2 to sit before row 1 of what remains
    manager.move_items(Offsets::from([0, 2]), 1)?;
    refresh(&mut updates, &config, "Moved rows {0, 2} to 1")?;

    manager.delete(Offsets::from([1, 3]))?;
    refresh(&mut updates, &config, "Deleted rows {1, 3}")?;

    if let Err(error) = manager.delete(Offsets::from(10)) {
        tracing::warn!(%error, "Delete rejected");
    }
    refresh(&mut updates, &config, "Tried to delete row 10")?;

    let remaining = manager.state(TodoList::len);
    let done = manager.state(TodoList::completed_count);
    println!("\nCompleted: {done}/{remaining}");

    Ok(())
}
