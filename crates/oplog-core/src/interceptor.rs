//! Entry and exit wrapping for marked operations.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use uuid::Uuid;

use crate::descriptor::OperationDescriptor;
use crate::reporter::OperationReporter;
use crate::stack::FrameStack;

/// Runs marked operations under a record: push on entry, pop, finalize and
/// report on exit.
///
/// One interceptor fronts one reporter. It is cheap to clone and safe to
/// share across worker threads; every clone reports into the same sink
/// while each thread keeps its own frame stack.
#[derive(Clone)]
pub struct Interceptor {
    reporter: Arc<dyn OperationReporter>,
}

impl Interceptor {
    pub fn new(reporter: Arc<dyn OperationReporter>) -> Self {
        Self { reporter }
    }

    /// Run `op` under a fresh record built from `descriptor`.
    ///
    /// The record is pushed before `op` starts and popped, finalized and
    /// reported on every exit path, unwinding included. Success means `op`
    /// returned normally; a panic marks the record failed and then
    /// continues unwinding with its payload untouched.
    pub fn observe<T>(&self, descriptor: &OperationDescriptor, op: impl FnOnce() -> T) -> T {
        let mut guard = FrameGuard::enter(self, descriptor);
        let output = op();
        guard.success = true;
        output
    }

    /// Like [`observe`](Self::observe) for fallible operations.
    ///
    /// `Err` finalizes the record as failed, and the error itself goes back
    /// to the caller unchanged: never wrapped, swallowed or replaced.
    pub fn observe_result<T, E>(
        &self,
        descriptor: &OperationDescriptor,
        op: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut guard = FrameGuard::enter(self, descriptor);
        let output = op();
        guard.success = output.is_ok();
        output
    }
}

/// Pops, finalizes and reports exactly one frame when dropped, however the
/// wrapped scope exits.
struct FrameGuard<'a> {
    interceptor: &'a Interceptor,
    frame: Uuid,
    success: bool,
}

impl<'a> FrameGuard<'a> {
    fn enter(interceptor: &'a Interceptor, descriptor: &OperationDescriptor) -> Self {
        Self {
            interceptor,
            frame: FrameStack::push(descriptor),
            success: false,
        }
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        // Strict nesting makes the top of the stack our frame. An empty
        // stack here means something else already drained it; there is
        // nothing of ours left to finalize.
        let Some(mut record) = FrameStack::pop() else {
            return;
        };
        if record.id() != self.frame {
            tracing::warn!(
                expected = %self.frame,
                popped = %record.id(),
                "frame pairing violated, finalizing the popped record"
            );
        }
        record.finalize(self.success);
        // Reporter failures stay on the reporter's side of the boundary. A
        // panic let through here while we are already unwinding would
        // abort the process.
        let reporter = Arc::clone(&self.interceptor.reporter);
        if panic::catch_unwind(AssertUnwindSafe(move || reporter.append(record))).is_err() {
            tracing::error!("operation reporter panicked, record dropped");
        }
    }
}
