//! # oplog-core
//!
//! Operation logging with thread-scoped record correlation.
//!
//! A marked operation gets an [`OperationRecord`] when it is entered. While
//! it runs, code anywhere below it can annotate that record through
//! [`CurrentOperation`] without passing anything down the call chain. When
//! the operation exits, on any path, the record is finalized with the
//! outcome and handed to an [`OperationReporter`], and reporting can never
//! disturb the operation itself.
//!
//! ## Frame stacks
//!
//! Records of in-flight operations live on a per-thread [`FrameStack`].
//! Nested operations stack up, so the innermost one is always what
//! [`CurrentOperation`] resolves to:
//!
//! ```text
//! thread A                       thread B
//! ┌──────────────────┐           ┌──────────────────┐
//! │ inner record   ◄─┼─ current  │ worker record  ◄─┼─ current
//! │ outer record     │           └──────────────────┘
//! └──────────────────┘
//! ```
//!
//! Threads never share frames. Hand-offs to workers are explicit: capture a
//! [`StackSnapshot`] where the work is submitted and apply it where the
//! work runs.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use oplog_core::{CurrentOperation, InMemoryReporter, Interceptor, OperationDescriptor};
//!
//! let sink = Arc::new(InMemoryReporter::new());
//! let interceptor = Interceptor::new(sink.clone());
//!
//! let descriptor = OperationDescriptor::builder("import")
//!     .description("nightly data import")
//!     .tag("batch")
//!     .build();
//!
//! let imported = interceptor.observe(&descriptor, || {
//!     CurrentOperation::annotate("starting");
//!     42
//! });
//!
//! assert_eq!(imported, 42);
//! let records = sink.records();
//! assert!(records[0].success());
//! assert_eq!(records[0].annotations(), ["starting"]);
//! ```
//!
//! For deployments, put a [`QueuedReporter`] in front of the real sink so
//! operations finish without waiting on it.

pub mod current;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod interceptor;
pub mod level;
pub mod propagate;
pub mod record;
pub mod reporter;
pub mod stack;

pub use current::CurrentOperation;
pub use descriptor::{OperationDescriptor, OperationDescriptorBuilder};
pub use error::{ReporterError, ReporterResult};
pub use host::origin_host;
pub use interceptor::Interceptor;
pub use level::OperationLevel;
pub use propagate::StackSnapshot;
pub use record::OperationRecord;
pub use reporter::{
    ConsoleReporter, InMemoryReporter, OperationReporter, QueuedReporter,
    DEFAULT_QUEUE_CAPACITY, QUEUE_CAPACITY_ENV,
};
pub use stack::FrameStack;
