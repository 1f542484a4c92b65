//! Counter application using the rollback log and a deferred reducer

use futures::executor::LocalPool;
use rebound::{snapshot, Payload, Reduction, RollbackLog, State, Store, StoreBuilder, StoreConfig};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn count(state: &State) -> i64 {
    state["count"].as_i64().unwrap_or_default()
}

fn step(state: &State) -> i64 {
    state["step"].as_i64().unwrap_or(1)
}

fn increment(mut state: State, _: Option<&Payload>) -> anyhow::Result<State> {
    let next = count(&state) + step(&state);
    state.insert("count".to_string(), json!(next));
    Ok(state)
}

fn decrement(mut state: State, _: Option<&Payload>) -> anyhow::Result<State> {
    let next = count(&state) - step(&state);
    state.insert("count".to_string(), json!(next));
    Ok(state)
}

fn set_step(mut state: State, payload: Option<&Payload>) -> anyhow::Result<State> {
    let step: i64 = payload
        .map(|p| snapshot::field(p, "step"))
        .transpose()?
        .flatten()
        .unwrap_or(1);
    state.insert("step".to_string(), json!(step));
    Ok(state)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Complete Counter Application ===\n");

    let mut pool = LocalPool::new();

    println!("1. Initializing counter with a bounded rollback log");
    let store = build_store(&pool)?;

    store.on_changed(|state, _, event| {
        println!("   [{}] Count: {}, Step: {}", event, count(&state), step(&state));
        Ok(())
    });

    println!("\n2. Incrementing and decrementing");
    store.dispatch("increment", None)?;
    store.dispatch("increment", None)?;
    store.dispatch("set_step", Some(snapshot::from_value(json!({ "step": 5 }))?))?;
    store.dispatch("increment", None)?;
    store.dispatch("decrement", None)?;

    println!("\n3. Event log (newest first): {:?}", store.log());

    println!("\n4. Rolling back two events");
    let state = store.rollback(2)?;
    println!("   Count after rollback: {}", count(&state));

    println!("\n5. Scheduling a delayed reset");
    store.dispatch("reset_later", None)?;
    println!("   Count right after dispatch: {}", count(&store.get()));
    pool.run_until_stalled();
    println!("   Count after the deferred work ran: {}", count(&store.get()));

    println!("\n6. Rolling back past the start of the log");
    let state = store.rollback(100)?;
    println!("   Count: {}", count(&state));

    println!("\n✓ Example complete!");
    Ok(())
}

fn build_store(pool: &LocalPool) -> anyhow::Result<Store<RollbackLog>> {
    let store: Store<RollbackLog> =
        StoreBuilder::new(snapshot::from_value(json!({ "count": 0, "step": 1 }))?)
            .config(StoreConfig::default().with_history_limit(16))
            .spawner(pool.spawner())
            .build();

    store.on("increment", increment)?;
    store.on("decrement", decrement)?;
    store.on("set_step", set_step)?;
    store.on("reset", |mut state, _| {
        state.insert("count".to_string(), json!(0));
        Ok(state)
    })?;

    let weak = store.downgrade();
    store.on("reset_later", move |state, _| {
        let weak = weak.clone();
        Ok(Reduction::deferred(state, async move {
            if let Some(store) = weak.upgrade() {
                if let Err(err) = store.dispatch("reset", None) {
                    tracing::warn!(error = %err, "deferred reset failed");
                }
            }
        }))
    })?;

    Ok(store)
}
