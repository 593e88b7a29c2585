//! CompletionBarrier - counts dispatch tasks that have not finished yet

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Per-batch completion counter
///
/// Starts with one internal token owned by the launcher, so the count cannot
/// touch zero while tasks are still being spawned. [`seal`](Self::seal) gives
/// that token back; after sealing, the count reaches zero exactly once, when
/// the last [`CompletionGuard`] is dropped.
#[derive(Debug)]
pub struct CompletionBarrier {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Unfinished guards, plus one until sealed
    pending: AtomicUsize,
    /// Guards released so far
    signals: AtomicUsize,
    /// Times the count dropped to zero
    drained: AtomicUsize,
    sealed: AtomicBool,
    notify: Notify,
}

impl Inner {
    fn release(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.drained.fetch_add(1, Ordering::AcqRel);
            self.notify.notify_waiters();
        }
    }
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: AtomicUsize::new(1),
                signals: AtomicUsize::new(0),
                drained: AtomicUsize::new(0),
                sealed: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Register one task; the returned guard signals completion when dropped
    pub fn enter(&self) -> CompletionGuard {
        debug_assert!(
            !self.inner.sealed.load(Ordering::Acquire),
            "task entered a sealed barrier"
        );
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        CompletionGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Stop accepting tasks. Idempotent.
    pub fn seal(&self) {
        if !self.inner.sealed.swap(true, Ordering::AcqRel) {
            self.inner.release();
        }
    }

    /// Wait until every registered task has signalled
    ///
    /// Seals the barrier first.
    pub async fn wait(&self) {
        self.seal();
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before checking, so a release between the check and
            // the await is not lost.
            notified.as_mut().enable();
            if self.inner.pending.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Tasks registered but not yet finished
    pub fn pending(&self) -> usize {
        let raw = self.inner.pending.load(Ordering::Acquire);
        if self.inner.sealed.load(Ordering::Acquire) {
            raw
        } else {
            raw.saturating_sub(1)
        }
    }

    /// Completion signals received
    pub fn signals(&self) -> usize {
        self.inner.signals.load(Ordering::Acquire)
    }

    /// Times the count has reached zero
    pub fn drained(&self) -> usize {
        self.inner.drained.load(Ordering::Acquire)
    }
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion token held by one dispatch task
///
/// Signals the barrier exactly once, on drop, including during unwinding.
#[derive(Debug)]
#[must_use = "dropping the guard signals completion immediately"]
pub struct CompletionGuard {
    inner: Arc<Inner>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.inner.signals.fetch_add(1, Ordering::AcqRel);
        self.inner.release();
    }
}
