//! Record sinks and the queue that feeds them.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::{ReporterError, ReporterResult};
use crate::level::OperationLevel;
use crate::record::OperationRecord;

/// Queue capacity used by [`QueuedReporter::new`].
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Environment variable overriding the queue capacity in
/// [`QueuedReporter::from_env`].
pub const QUEUE_CAPACITY_ENV: &str = "OPLOG_QUEUE_CAPACITY";

/// Destination for finalized records.
///
/// `append` is fire-and-forget: it must return promptly and keep every
/// internal failure to itself. A record handed over here is out of the
/// operation's hands; nothing a reporter does may disturb the code that
/// produced the record.
pub trait OperationReporter: Send + Sync {
    fn append(&self, record: OperationRecord);
}

/// Logs each record through `tracing` at the record's own level.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl OperationReporter for ConsoleReporter {
    fn append(&self, record: OperationRecord) {
        match record.level() {
            OperationLevel::Trace => tracing::trace!(%record, "operation completed"),
            OperationLevel::Debug => tracing::debug!(%record, "operation completed"),
            OperationLevel::Info => tracing::info!(%record, "operation completed"),
            OperationLevel::Warn => tracing::warn!(%record, "operation completed"),
            OperationLevel::Error => tracing::error!(%record, "operation completed"),
        }
    }
}

/// Collects records in memory, in arrival order.
///
/// The capture sink for tests and examples: run an operation against it,
/// then assert on what arrived.
#[derive(Debug, Default)]
pub struct InMemoryReporter {
    records: Mutex<Vec<OperationRecord>>,
}

impl InMemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything appended so far.
    pub fn records(&self) -> Vec<OperationRecord> {
        self.records.lock().map(|records| records.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OperationReporter for InMemoryReporter {
    fn append(&self, record: OperationRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Puts a bounded queue between record completion and a possibly slow sink.
///
/// `append` hands the record to the queue and returns; a background task
/// drains the queue onto the inner reporter. When the queue is full the
/// record is dropped with a warning rather than blocking the operation that
/// finished it. Delivery order follows queue order; records from different
/// threads interleave in arrival order.
pub struct QueuedReporter {
    sender: mpsc::Sender<OperationRecord>,
}

impl QueuedReporter {
    /// Queue of [`DEFAULT_QUEUE_CAPACITY`] records in front of `inner`.
    ///
    /// Spawns the drain task on the current Tokio runtime; fails with
    /// [`ReporterError::NoRuntime`] when called outside one. The reporter
    /// itself can then be handed to plain threads.
    pub fn new(inner: Arc<dyn OperationReporter>) -> ReporterResult<Self> {
        Self::with_capacity(inner, DEFAULT_QUEUE_CAPACITY)
    }

    /// Like [`new`](Self::new) with an explicit queue capacity.
    pub fn with_capacity(
        inner: Arc<dyn OperationReporter>,
        capacity: usize,
    ) -> ReporterResult<Self> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| ReporterError::NoRuntime)?;
        // The channel requires a capacity of at least one.
        let (sender, mut receiver) = mpsc::channel::<OperationRecord>(capacity.max(1));
        handle.spawn(async move {
            while let Some(record) = receiver.recv().await {
                let record_id = record.id();
                // A panicking sink must not take the drain loop with it.
                if panic::catch_unwind(AssertUnwindSafe(|| inner.append(record))).is_err() {
                    tracing::error!(%record_id, "reporter sink panicked, record dropped");
                } else {
                    tracing::debug!(%record_id, "record delivered");
                }
            }
        });
        Ok(Self { sender })
    }

    /// Like [`new`](Self::new), with the capacity taken from
    /// [`QUEUE_CAPACITY_ENV`] when that is set to a valid number.
    pub fn from_env(inner: Arc<dyn OperationReporter>) -> ReporterResult<Self> {
        let capacity = std::env::var(QUEUE_CAPACITY_ENV)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_QUEUE_CAPACITY);
        Self::with_capacity(inner, capacity)
    }

    fn enqueue(&self, record: OperationRecord) -> ReporterResult<()> {
        self.sender.try_send(record).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => ReporterError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => ReporterError::QueueClosed,
        })
    }
}

impl OperationReporter for QueuedReporter {
    fn append(&self, record: OperationRecord) {
        let record_id = record.id();
        if let Err(err) = self.enqueue(record) {
            tracing::warn!(%record_id, error = %err, "record dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::OperationDescriptor;
    use std::time::Duration;

    fn sample_record(op_type: &str) -> OperationRecord {
        OperationRecord::from_descriptor(
            &OperationDescriptor::builder(op_type).tag("reporter-test").build(),
        )
    }

    async fn wait_for_len(sink: &InMemoryReporter, len: usize) {
        for _ in 0..100 {
            if sink.len() >= len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[test]
    fn test_in_memory_reporter_keeps_arrival_order() {
        let sink = InMemoryReporter::new();
        let first = sample_record("first");
        let second = sample_record("second");
        let first_id = first.id();
        let second_id = second.id();

        sink.append(first);
        sink.append(second);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), first_id);
        assert_eq!(records[1].id(), second_id);
    }

    #[test]
    fn test_console_reporter_accepts_records_without_a_subscriber() {
        ConsoleReporter::new().append(sample_record("console"));
    }

    #[tokio::test]
    async fn test_queued_reporter_delivers_to_the_inner_sink() {
        let sink = Arc::new(InMemoryReporter::new());
        let queued = QueuedReporter::new(sink.clone()).unwrap();

        let record = sample_record("queued");
        let record_id = record.id();
        queued.append(record);

        wait_for_len(&sink, 1).await;
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), record_id);
    }

    #[tokio::test]
    async fn test_full_queue_drops_newest_instead_of_blocking() {
        // Single-threaded test runtime: the drain task cannot run until the
        // first await below, so the queue genuinely fills.
        let sink = Arc::new(InMemoryReporter::new());
        let queued = QueuedReporter::with_capacity(sink.clone(), 1).unwrap();

        let kept = sample_record("kept");
        let kept_id = kept.id();
        queued.append(kept);
        queued.append(sample_record("dropped"));
        queued.append(sample_record("also-dropped"));

        wait_for_len(&sink, 1).await;
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), kept_id);
    }

    #[test]
    fn test_construction_outside_a_runtime_fails_cleanly() {
        let sink = Arc::new(InMemoryReporter::new());
        let result = QueuedReporter::new(sink);
        assert_eq!(result.err(), Some(ReporterError::NoRuntime));
    }

    #[test]
    fn test_append_after_runtime_shutdown_is_contained() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let sink = Arc::new(InMemoryReporter::new());
        let queued =
            runtime.block_on(async { QueuedReporter::new(sink.clone()).unwrap() });
        drop(runtime);

        queued.append(sample_record("late"));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_panicking_sink_does_not_stop_the_drain() {
        use std::sync::atomic::{AtomicBool, Ordering};

        struct PanickyOnFirst {
            inner: Arc<InMemoryReporter>,
            fired: AtomicBool,
        }

        impl OperationReporter for PanickyOnFirst {
            fn append(&self, record: OperationRecord) {
                if !self.fired.swap(true, Ordering::SeqCst) {
                    panic!("sink failure");
                }
                self.inner.append(record);
            }
        }

        let sink = Arc::new(InMemoryReporter::new());
        let flaky =
            Arc::new(PanickyOnFirst { inner: sink.clone(), fired: AtomicBool::new(false) });
        let queued = QueuedReporter::new(flaky).unwrap();

        queued.append(sample_record("eaten-by-panic"));
        let survivor = sample_record("survivor");
        let survivor_id = survivor.id();
        queued.append(survivor);

        wait_for_len(&sink, 1).await;
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), survivor_id);
    }
}
