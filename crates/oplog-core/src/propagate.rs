//! Deliberate hand-off of frame context to other threads.

use crate::record::OperationRecord;
use crate::stack::FrameStack;

/// A copy of one thread's live frames, taken where work is handed off.
///
/// Frame stacks never cross thread boundaries on their own: a freshly
/// spawned worker starts empty, with an inert current-operation handle. To
/// let carried work read the submitting operation's records, capture a
/// snapshot at the submission site, send it along with the work, and run
/// the work inside [`apply`](Self::apply).
///
/// The snapshot holds copies made at capture time. The originals keep
/// changing on the submitting thread, and worker-side writes stay in the
/// worker's copies; seeded frames are context, not live operations, and are
/// never finalized or reported.
#[derive(Debug, Clone)]
pub struct StackSnapshot {
    frames: Vec<OperationRecord>,
}

impl StackSnapshot {
    /// Copy the calling thread's live frames, outermost first.
    pub fn capture() -> Self {
        Self { frames: FrameStack::cloned_frames() }
    }

    /// Number of captured frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Run `f` with the captured frames laid on top of the calling thread's
    /// stack, then discard them.
    ///
    /// Inside `f` the current-operation handle resolves to the innermost
    /// captured frame; operations started inside `f` nest above it as
    /// usual. The seeds are removed when `f` exits, unwinding included, and
    /// are not reported.
    pub fn apply<R>(&self, f: impl FnOnce() -> R) -> R {
        let base = FrameStack::depth();
        FrameStack::seed(self.frames.clone());
        let _restore = RestoreDepth { base, expected: base + self.frames.len() };
        f()
    }
}

/// Puts the stack back to its pre-seed depth when dropped, even if the
/// carried work unwinds.
struct RestoreDepth {
    base: usize,
    expected: usize,
}

impl Drop for RestoreDepth {
    fn drop(&mut self) {
        let depth = FrameStack::depth();
        if depth != self.expected {
            tracing::warn!(
                expected = self.expected,
                found = depth,
                "unbalanced frame stack after carried work"
            );
        }
        FrameStack::truncate(self.base);
    }
}
