//! Transparent access to the innermost live record.

use crate::record::OperationRecord;
use crate::stack::FrameStack;

/// Forwarding handle over the calling thread's innermost live record.
///
/// Business code deep inside an operation uses this to annotate the record
/// without threading a reference through every call. Each call re-resolves
/// the top of the frame stack, so after a nested operation starts or ends
/// the handle follows along on its own.
///
/// On a thread with no operation in flight the handle is inert: writes land
/// nowhere and reads come back defaulted. No call here ever panics.
pub struct CurrentOperation;

impl CurrentOperation {
    /// Append a free-form annotation to the innermost record.
    pub fn annotate(message: impl Into<String>) {
        FrameStack::with_top(|top| {
            if let Some(record) = top {
                record.push_annotation(message);
            }
        });
    }

    /// Add a tag to the innermost record.
    pub fn add_tag(tag: impl Into<String>) {
        FrameStack::with_top(|top| {
            if let Some(record) = top {
                record.push_tag(tag);
            }
        });
    }

    /// Snapshot of the innermost record, or a detached default when idle.
    ///
    /// The snapshot is a copy taken now; it does not follow later writes.
    pub fn get() -> OperationRecord {
        FrameStack::with_top(|top| match top {
            Some(record) => record.clone(),
            None => OperationRecord::detached(),
        })
    }

    /// Whether a live record currently backs the handle.
    pub fn is_active() -> bool {
        FrameStack::with_top(|top| top.is_some())
    }
}
