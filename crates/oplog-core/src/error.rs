//! Errors raised inside the reporting pipeline.

use thiserror::Error;

/// Failures on the reporting side of the system.
///
/// These never cross into business code. The interceptor contains them at
/// the reporter boundary and logs them; they surface as return values only
/// from reporter constructors, where the caller owns the setup.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterError {
    /// The queue is at capacity and the record was dropped, not blocked on.
    #[error("reporter queue is full")]
    QueueFull,

    /// The drain task is gone and the queue no longer accepts records.
    #[error("reporter queue is closed")]
    QueueClosed,

    /// Queued reporting spawns a drain task and needs a Tokio runtime to
    /// put it on.
    #[error("no tokio runtime available to spawn the reporter drain task")]
    NoRuntime,
}

/// Convenience alias for reporter-side results.
pub type ReporterResult<T> = std::result::Result<T, ReporterError>;
