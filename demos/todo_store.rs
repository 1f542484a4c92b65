//! Todo list driven by dispatched events, with undo and redo

use rebound::{snapshot, Payload, State, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TodoItem {
    id: usize,
    title: String,
    completed: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: String,
}

fn todos(state: &State) -> anyhow::Result<Vec<TodoItem>> {
    Ok(snapshot::field(state, "todos")?.unwrap_or_default())
}

fn add_todo(mut state: State, payload: Option<&Payload>) -> anyhow::Result<State> {
    let title: String = payload
        .map(|p| snapshot::field(p, "title"))
        .transpose()?
        .flatten()
        .ok_or_else(|| anyhow::anyhow!("add_todo needs a title"))?;
    let mut list = todos(&state)?;
    list.push(TodoItem {
        id: list.len(),
        title,
        completed: false,
    });
    state.insert("todos".to_string(), serde_json::to_value(list)?);
    Ok(state)
}

fn toggle_todo(mut state: State, payload: Option<&Payload>) -> anyhow::Result<State> {
    let id: usize = payload
        .map(|p| snapshot::field(p, "id"))
        .transpose()?
        .flatten()
        .ok_or_else(|| anyhow::anyhow!("toggle_todo needs an id"))?;
    let mut list = todos(&state)?;
    if let Some(todo) = list.iter_mut().find(|t| t.id == id) {
        todo.completed = !todo.completed;
    }
    state.insert("todos".to_string(), serde_json::to_value(list)?);
    Ok(state)
}

fn set_filter(mut state: State, payload: Option<&Payload>) -> anyhow::Result<State> {
    if let Some(filter) = payload.and_then(|p| p.get("filter")) {
        state.insert("filter".to_string(), filter.clone());
    }
    Ok(state)
}

fn print_todos(store: &rebound::Store) -> Result<(), StoreError> {
    let app: AppState = store.get_as()?;
    for todo in &app.todos {
        let status = if todo.completed { "x" } else { " " };
        println!("   [{}] {}", status, todo.title);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Store Example: Todo App ===\n");

    let store: rebound::Store = rebound::Store::from_serialize(&AppState {
        filter: "all".to_string(),
        ..AppState::default()
    })?;

    println!("1. Registering reducers and a change listener");
    store.on("add_todo", add_todo)?;
    store.on("toggle_todo", toggle_todo)?;
    store.on("set_filter", set_filter)?;
    store.on_changed(|state, _, event| {
        let list = todos(&state)?;
        let completed = list.iter().filter(|t| t.completed).count();
        println!(
            "   [{}] Total: {}, Completed: {}",
            event,
            list.len(),
            completed
        );
        Ok(())
    });

    println!("\n2. Adding todos");
    for title in ["Learn Rust", "Build a state store", "Write documentation"] {
        store.dispatch("add_todo", Some(snapshot::from_value(json!({ "title": title }))?))?;
    }

    println!("\n3. Completing the first todo");
    store.dispatch("toggle_todo", Some(snapshot::from_value(json!({ "id": 0 }))?))?;
    print_todos(&store)?;

    println!("\n4. Setting the same filter again (no change, no notification)");
    store.dispatch("set_filter", Some(snapshot::from_value(json!({ "filter": "all" }))?))?;

    println!("\n5. Undoing twice (the unchanged filter dispatch left an undo point too)");
    store.undo()?;
    store.undo()?;
    print_todos(&store)?;

    println!("\n6. Redoing it");
    store.redo()?;
    print_todos(&store)?;

    println!("\n7. Dispatching a missing event is ignored");
    store.dispatch("missing", None)?;

    println!("\nHistory entries: {}", store.history_len());
    println!("\n✓ Example complete!");
    Ok(())
}
