//! Operation log demo
//!
//! Drives oplog-core with a small concurrent workload: a pool of worker
//! threads processes numbered orders under a marked operation, odd order ids
//! fail a business rule, and finalized records stream through a queued
//! reporter onto the console.
//!
//! # Usage
//!
//! ```bash
//! # Run with the defaults: 3 workers, 5 orders
//! oplog-demo
//!
//! # Larger workload with a tighter reporter queue
//! oplog-demo --workers 8 --tasks 50 --queue-capacity 16
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use clap::Parser;

use oplog_core::{
    ConsoleReporter, CurrentOperation, Interceptor, OperationDescriptor, OperationLevel,
    QueuedReporter, StackSnapshot,
};

#[derive(Parser)]
#[command(name = "oplog-demo")]
#[command(about = "Operation log demo - concurrent order processing under a queued reporter")]
#[command(version)]
struct Cli {
    /// Number of worker threads
    #[arg(short, long, default_value = "3", env = "OPLOG_DEMO_WORKERS")]
    workers: usize,

    /// Number of orders to process across the workers
    #[arg(short, long, default_value = "5", env = "OPLOG_DEMO_TASKS")]
    tasks: u32,

    /// Reporter queue capacity
    #[arg(long, default_value = "1000", env = "OPLOG_QUEUE_CAPACITY")]
    queue_capacity: usize,
}

static ORDER_DESCRIPTOR: OnceLock<OperationDescriptor> = OnceLock::new();

/// Declared once, shared by every order the process handles.
fn order_descriptor() -> &'static OperationDescriptor {
    ORDER_DESCRIPTOR.get_or_init(|| {
        OperationDescriptor::builder("order-processing")
            .level(OperationLevel::Info)
            .description("process one demo order")
            .tags(["demo", "run"])
            .build()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let queued =
        QueuedReporter::with_capacity(Arc::new(ConsoleReporter::new()), cli.queue_capacity)?;
    let interceptor = Interceptor::new(Arc::new(queued));

    tracing::info!(
        workers = cli.workers,
        tasks = cli.tasks,
        queue_capacity = cli.queue_capacity,
        "starting demo workload"
    );

    let next_order = Arc::new(AtomicU32::new(0));
    let total = cli.tasks;
    let handles: Vec<_> = (0..cli.workers)
        .map(|worker| {
            let interceptor = interceptor.clone();
            let next_order = next_order.clone();
            thread::spawn(move || loop {
                let order = next_order.fetch_add(1, Ordering::Relaxed);
                if order >= total {
                    break;
                }
                tracing::debug!(worker, order, "worker picked up an order");
                run_order(&interceptor, order);
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("demo worker panicked");
        }
    }

    // Let the queued reporter drain before the process ends.
    tokio::time::sleep(Duration::from_millis(300)).await;
    tracing::info!("demo workload complete");
    Ok(())
}

/// One marked operation per order; the record reports whichever way it ends.
fn run_order(interceptor: &Interceptor, order: u32) {
    let outcome = interceptor.observe_result(order_descriptor(), || process_order(order));
    match outcome {
        Ok(total) => tracing::debug!(order, total, "order processed"),
        Err(err) => tracing::warn!(order, error = %err, "order rejected"),
    }
}

fn process_order(order: u32) -> anyhow::Result<u32> {
    tracing::info!(order, "order step 1");
    CurrentOperation::annotate("==>1");
    if order % 2 == 1 {
        let message = format!("business rule rejected order {order}");
        CurrentOperation::annotate(message.clone());
        anyhow::bail!(message);
    }
    verify_stock(order)?;
    tracing::info!(order, "order step 2");
    CurrentOperation::annotate("==>2");
    Ok(order * 2)
}

/// Even orders double-check stock on a short-lived helper thread. The helper
/// reads the submitting operation's record through a carried snapshot; its
/// own writes would stay in the carried copy.
fn verify_stock(order: u32) -> anyhow::Result<()> {
    let snapshot = StackSnapshot::capture();
    let helper = thread::spawn(move || {
        snapshot.apply(|| {
            let submitter = CurrentOperation::get();
            tracing::debug!(
                order,
                operation_id = %submitter.id(),
                "stock check sees the submitting operation"
            );
        });
    });
    helper
        .join()
        .map_err(|_| anyhow::anyhow!("stock check helper panicked"))
}
