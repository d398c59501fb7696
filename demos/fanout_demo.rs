//! # Fan-out Example
//!
//! One ticker feeds three broadcasters, one per delivery policy. Each has a
//! fast and a slow subscriber, so the difference between the policies shows
//! up in what the slow one receives.
//!
//! ## Run
//! ```bash
//! RUST_LOG=fanout=debug cargo run --example fanout_demo
//! ```

use std::time::Duration;

use fanout::{BroadcastStats, Broadcaster, BroadcasterConfig, DeliveryPolicy, Subscription};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const VALUES: u32 = 20;

fn spawn_reader(
    label: String,
    mut sub: Subscription<u32>,
    delay: Duration,
) -> tokio::task::JoinHandle<Vec<u32>> {
    tokio::spawn(async move {
        let mut got = Vec::new();
        while let Some(v) = sub.recv().await {
            got.push(v);
            tokio::time::sleep(delay).await;
        }
        println!("[{label}] closed after {} values: {got:?}", got.len());
        got
    })
}

fn print_stats(policy: DeliveryPolicy, s: BroadcastStats) {
    println!();
    println!("{policy}:");
    println!(" ├─► Received:  {}", s.received);
    println!(" ├─► Delivered: {}", s.delivered);
    println!(" ├─► Skipped:   {}", s.skipped);
    println!(" └─► Evicted:   {}", s.evicted);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fanout=info".parse()?),
        )
        .init();

    let token = CancellationToken::new();
    let mut inputs = Vec::new();
    let mut broadcasters = Vec::new();
    let mut readers = Vec::new();

    for policy in DeliveryPolicy::ALL {
        let (tx, rx) = mpsc::channel(4);
        let cfg = BroadcasterConfig::default().capacity(2).policy(policy);
        let b = Broadcaster::new(&token, rx, cfg)?;

        let fast = b.subscribe().await?;
        let slow = b.subscribe().await?;
        readers.push(spawn_reader(format!("{policy}/fast"), fast, Duration::ZERO));
        readers.push(spawn_reader(
            format!("{policy}/slow"),
            slow,
            Duration::from_millis(30),
        ));

        inputs.push(tx);
        broadcasters.push(b);
    }

    for i in 0..VALUES {
        for tx in &inputs {
            tx.send(i).await?;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    drop(inputs);

    for b in &broadcasters {
        b.stopped().await;
    }
    for r in readers {
        r.await?;
    }
    for b in &broadcasters {
        print_stats(b.policy(), b.stats());
    }
    Ok(())
}
