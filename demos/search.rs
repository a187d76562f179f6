//! # Example: search
//!
//! A search box backed by one controller: every keystroke changes the inputs, the
//! previous request is superseded and only the latest result is observed.
//!
//! Shows how to:
//! - Build a controller with callbacks and the [`LogWriter`] subscriber
//! - Stop superseded work through [`Injection::abort`]
//! - Cancel the active run explicitly and receive `on_cancel`
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Controller::builder(search, "r").activate()   → run #1
//!   ├─► set_inputs("ru")                              → run #1 superseded, run #2
//!   ├─► set_inputs("rust")                            → run #2 superseded, run #3
//!   │     └─► on_success(["rust-analyzer", ...], "rust")
//!   ├─► set_inputs("rusty"), cancel()                 → on_cancel("rusty")
//!   └─► teardown (drop)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=taskcell=debug cargo run --example search --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskcell::{
    Controller, Injection, LogWriter, Status, Subscribe, TaskError, TaskFn, TaskRef, Work,
};
use tracing_subscriber::EnvFilter;

const CATALOG: &[&str] = &["rust-analyzer", "rustfmt", "rustup", "ruby", "rusty-v8"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    // 1. Creation function: simulated backend latency, stops early when aborted
    let search: TaskRef<String, Vec<String>> =
        TaskFn::arc("search", |query: &String, inj: Injection| {
            let query = query.clone();
            Work::deferred(async move {
                tokio::select! {
                    _ = inj.abort.cancelled() => Err(TaskError::Aborted),
                    _ = tokio::time::sleep(Duration::from_millis(300)) => {
                        if query.is_empty() {
                            return Err(TaskError::fail("empty query"));
                        }
                        Ok(CATALOG
                            .iter()
                            .filter(|name| name.starts_with(query.as_str()))
                            .map(|name| name.to_string())
                            .collect())
                    }
                }
            })
        });

    // 2. Controller with callbacks and a logging subscriber
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let ctrl = Controller::builder(search, "r".to_string())
        .name("search-box")
        .on_success(|hits: &Vec<String>, query: &String| println!("[{query}] {hits:?}"))
        .on_error(|err: &TaskError, query: &String| println!("[{query}] failed: {err}"))
        .on_cancel(|query: &String| println!("[{query}] cancelled"))
        .with_subscribers(subs)
        .build();
    let handle = ctrl.handle();

    // 3. Typing: only the last query settles
    ctrl.activate();
    for query in ["ru", "rust"] {
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctrl.set_inputs(query.to_string());
    }
    let snap = handle.settled().await;
    assert_eq!(snap.status, Status::Succeeded);

    // 4. Explicit cancel
    ctrl.set_inputs("rusty".to_string());
    tokio::time::sleep(Duration::from_millis(50)).await;
    ctrl.cancel();
    let snap = handle.settled().await;
    assert_eq!(snap.status, Status::Cancelled);
    println!("last result still visible: {:?}", snap.result);

    // 5. Teardown; give the subscriber a moment to flush
    drop(ctrl);
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
