//! Search demo binary
//!
//! Interactive GitHub repository search: each line typed on stdin becomes
//! an `UpdateQuery` action; a previous query's in-flight request is
//! superseded by the next one. Type `next` to load the following page.

use reactor_rust_runtime::Store;
use search_demo::{SearchAction, SearchReactor};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "search_demo=info,reactor_rust_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    reactor_rust_runtime::metrics::describe_metrics();

    println!("=== Search Demo: GitHub repository search ===");
    println!("Type a query and press enter. `next` loads the next page.\n");

    let store = Store::new(SearchReactor::new());

    // Render every state the store delivers.
    let mut states = store.state();
    let renderer = tokio::spawn(async move {
        while let Some(state) = states.recv().await {
            let query = state.query.as_deref().unwrap_or("<none>");
            println!(
                "query: {query}   repos: {}   next page: {:?}",
                state.repos.len(),
                state.next_page
            );
            for repo in state.repos.iter().take(5) {
                println!("  - {repo}");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "" => store.send(SearchAction::UpdateQuery(None)),
            "next" => store.send(SearchAction::LoadNextPage),
            _ => store.send(SearchAction::UpdateQuery(Some(line))),
        }
    }

    drop(store);
    let _ = renderer.await;
    Ok(())
}
