//! Thread-local stack of live operation records.

use std::cell::RefCell;

use uuid::Uuid;

use crate::descriptor::OperationDescriptor;
use crate::record::OperationRecord;

thread_local! {
    static FRAMES: RefCell<Vec<OperationRecord>> = const { RefCell::new(Vec::new()) };
}

/// The calling thread's stack of in-flight operation records.
///
/// Every OS thread owns an independent stack and nothing is shared across
/// threads, so access takes no locks. Frames nest strictly: entering a
/// marked operation pushes, leaving it pops, and the top is always the
/// innermost live operation. All functions act on the caller's thread.
pub struct FrameStack;

impl FrameStack {
    /// Build a record from the descriptor and push it as the innermost
    /// frame. Returns the new record's id so callers can check pairing at
    /// pop time.
    pub fn push(descriptor: &OperationDescriptor) -> Uuid {
        let record = OperationRecord::from_descriptor(descriptor);
        let id = record.id();
        FRAMES.with(|frames| frames.borrow_mut().push(record));
        id
    }

    /// Remove and return the innermost frame.
    ///
    /// Popping an empty stack is a pairing bug in the caller, but a
    /// harmless one: it logs a warning and returns `None` instead of
    /// panicking. When the last frame leaves, the backing allocation is
    /// released so pooled threads carry nothing between tasks.
    pub fn pop() -> Option<OperationRecord> {
        let record = FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            let record = frames.pop();
            if frames.is_empty() && frames.capacity() > 0 {
                *frames = Vec::new();
            }
            record
        });
        // Warn after the borrow is released; a subscriber may re-enter
        // the stack.
        if record.is_none() {
            tracing::warn!("pop on an empty operation frame stack");
        }
        record
    }

    /// Number of live frames on the calling thread.
    pub fn depth() -> usize {
        FRAMES.with(|frames| frames.borrow().len())
    }

    /// Run `f` against the innermost record, or with `None` when the stack
    /// is empty.
    pub(crate) fn with_top<R>(f: impl FnOnce(Option<&mut OperationRecord>) -> R) -> R {
        FRAMES.with(|frames| f(frames.borrow_mut().last_mut()))
    }

    /// Clone of all live frames, outermost first.
    pub(crate) fn cloned_frames() -> Vec<OperationRecord> {
        FRAMES.with(|frames| frames.borrow().clone())
    }

    /// Lay pre-built records on top of the stack, in the given order.
    pub(crate) fn seed(records: Vec<OperationRecord>) {
        FRAMES.with(|frames| frames.borrow_mut().extend(records));
    }

    /// Discard frames above `depth` without finalizing or reporting them.
    pub(crate) fn truncate(depth: usize) {
        FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            frames.truncate(depth);
            if frames.is_empty() && frames.capacity() > 0 {
                *frames = Vec::new();
            }
        });
    }

    #[cfg(test)]
    fn backing_capacity() -> usize {
        FRAMES.with(|frames| frames.borrow().capacity())
    }
}
