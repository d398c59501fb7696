//! # Shared Registry Example
//!
//! Several producers publish through one [`SyncRegistry`] without a broadcast
//! loop. Subscribers join while the producers are running; a late joiner only
//! sees what was sent after it subscribed.
//!
//! ## Run
//! ```bash
//! RUST_LOG=fanout=debug cargo run --example sync_registry
//! ```

use std::time::Duration;

use fanout::SyncRegistry;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fanout=debug".parse()?),
        )
        .init();

    let registry = SyncRegistry::<String>::new(16);
    let token = CancellationToken::new();

    let mut early = registry.subscribe().await;

    let mut producers = Vec::new();
    for p in 0..3 {
        let registry = registry.clone();
        let token = token.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..5 {
                if !registry.send_or_wait(&token, format!("p{p}-{i}")).await {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }));
    }

    tokio::time::sleep(Duration::from_millis(25)).await;
    let mut late = registry.subscribe().await;

    for p in producers {
        p.await?;
    }
    println!("subscribers: {}", registry.len().await);
    println!("closed: {}", registry.close_all().await);

    let mut seen = 0;
    while let Some(v) = early.recv().await {
        seen += 1;
        println!("[early] {v}");
    }
    println!("[early] {seen} values");

    let mut seen = 0;
    while let Some(v) = late.recv().await {
        seen += 1;
        println!("[late] {v}");
    }
    println!("[late] {seen} values");
    Ok(())
}
