//! Multi-producer multi-consumer (MPMC) blocking queue.
//!
//! A mutex-guarded FIFO queue for any number of producer and consumer
//! threads. Consumers can poll, block, or block with a timeout; producers
//! never block — a bounded queue rejects pushes at capacity instead.
//!
//! Every operation serializes on one internal mutex, so no caller ever
//! observes a torn state. Waiting happens only inside [`BlockingQueue::take`]
//! and [`BlockingQueue::take_timeout`] on an empty queue, and always
//! re-checks the queue after waking — spurious wakeups are harmless.
//!
//! # Shutdown
//!
//! [`BlockingQueue::unblock`] permanently switches the queue out of blocking
//! mode: every waiting consumer wakes up and returns `None`, and future
//! `take` calls on an empty queue return `None` immediately. Elements already
//! queued are unaffected and can still be drained.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use handoff::mpmc::BlockingQueue;
//!
//! let queue = Arc::new(BlockingQueue::bounded(128));
//!
//! let workers: Vec<_> = (0..4)
//!     .map(|_| {
//!         let queue = Arc::clone(&queue);
//!         thread::spawn(move || {
//!             let mut handled = 0;
//!             while queue.take().is_some() {
//!                 handled += 1;
//!             }
//!             handled
//!         })
//!     })
//!     .collect();
//!
//! for i in 0..100 {
//!     queue.push(i).unwrap();
//! }
//! queue.unblock();
//!
//! let total: u32 = workers.into_iter().map(|w| w.join().unwrap()).sum();
//! assert_eq!(total, 100);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::Full;

/// An optionally-bounded FIFO queue with synchronized access to all methods.
///
/// Supports multiple producers and multiple consumers; share it between
/// threads with `Arc`. Consumers block on [`take`](Self::take) from an empty
/// queue until an element arrives or the queue is
/// [unblocked](Self::unblock).
pub struct BlockingQueue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    /// Bound on queue length; 0 means unbounded.
    max_size: usize,
}

struct Inner<T> {
    items: VecDeque<T>,
    /// Starts `true`; `unblock` clears it, permanently.
    blocking: bool,
}

impl<T> BlockingQueue<T> {
    /// Creates a queue with no bound on its length.
    pub fn unbounded() -> Self {
        Self::bounded(0)
    }

    /// Creates a queue holding at most `max_size` elements.
    ///
    /// A `max_size` of 0 means unbounded.
    pub fn bounded(max_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                blocking: true,
            }),
            not_empty: Condvar::new(),
            max_size,
        }
    }

    // A poisoned mutex only means some other thread panicked mid-operation;
    // the deque itself is never left inconsistent, so keep going.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attempts to append a value at the tail of the queue.
    ///
    /// Never blocks. Waiting consumers are woken when the queue transitions
    /// from empty to non-empty.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the queue is bounded and at capacity;
    /// the queue is untouched and the value is handed back.
    pub fn push(&self, value: T) -> Result<(), Full<T>> {
        let mut inner = self.lock();

        if self.max_size != 0 && inner.items.len() >= self.max_size {
            return Err(Full(value));
        }

        let was_empty = inner.items.is_empty();
        inner.items.push_back(value);
        if was_empty {
            // Wake everyone: a single wake can land on a waiter that is
            // about to time out, and the element would sit unclaimed.
            self.not_empty.notify_all();
        }

        Ok(())
    }

    /// Appends as many values from `values` as capacity allows, in order.
    ///
    /// One lock acquisition for the whole batch; returns the number actually
    /// appended. Waiting consumers are woken once if the batch made the
    /// queue non-empty.
    pub fn push_all<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let mut inner = self.lock();

        let was_empty = inner.items.is_empty();
        let mut appended = 0;
        for value in values {
            if self.max_size != 0 && inner.items.len() >= self.max_size {
                break;
            }
            inner.items.push_back(value);
            appended += 1;
        }
        if was_empty && appended > 0 {
            self.not_empty.notify_all();
        }

        appended
    }

    /// Attempts to pop the head of the queue.
    ///
    /// Returns immediately: `None` on an empty queue, never waits.
    pub fn pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Pops and visits every queued element until the queue is empty.
    ///
    /// The lock is held for the whole drain, so the visitor must not block
    /// and must not touch this queue. Returns the number of elements
    /// visited.
    pub fn drain_with<F>(&self, mut f: F) -> usize
    where
        F: FnMut(T),
    {
        let mut inner = self.lock();

        let mut count = 0;
        while let Some(value) = inner.items.pop_front() {
            f(value);
            count += 1;
        }
        count
    }

    /// Pops the head of the queue, waiting as long as it takes.
    ///
    /// Blocks while the queue is empty and still in blocking mode. Returns
    /// `None` only after [`unblock`](Self::unblock): either the queue was
    /// already unblocked and empty, or it became so while waiting.
    pub fn take(&self) -> Option<T> {
        let mut inner = self.lock();

        loop {
            if let Some(value) = inner.items.pop_front() {
                return Some(value);
            }
            if !inner.blocking {
                return None;
            }
            inner = self
                .not_empty
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Pops the head of the queue, waiting up to `timeout`.
    ///
    /// Like [`take`](Self::take), but also returns `None` once `timeout` has
    /// elapsed with the queue still empty. An element arriving earlier is
    /// returned as soon as it arrives.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.lock();

        loop {
            if let Some(value) = inner.items.pop_front() {
                return Some(value);
            }
            if !inner.blocking {
                return None;
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }

    /// Permanently takes the queue out of blocking mode.
    ///
    /// Every consumer currently waiting in [`take`](Self::take) or
    /// [`take_timeout`](Self::take_timeout) on an empty queue wakes up and
    /// returns `None`, and future takes on an empty queue return `None`
    /// immediately. Elements already queued stay queued and can still be
    /// popped or taken; only empty-queue waiting is disabled, forever.
    pub fn unblock(&self) {
        let mut inner = self.lock();

        inner.blocking = false;
        if inner.items.is_empty() {
            self.not_empty.notify_all();
        }
    }

    /// Returns `true` while the queue is still in blocking mode.
    pub fn is_blocking(&self) -> bool {
        self.lock().blocking
    }

    /// Calls `f` with a borrow of the head element, or `None` if the queue
    /// is empty.
    ///
    /// The lock is held while `f` runs, so keep it short and do not touch
    /// this queue from inside it.
    ///
    /// # Example
    ///
    /// ```
    /// use handoff::mpmc::BlockingQueue;
    ///
    /// let queue = BlockingQueue::unbounded();
    /// queue.push("front").unwrap();
    /// queue.push("back").unwrap();
    ///
    /// assert_eq!(queue.peek(|head| head.copied()), Some("front"));
    /// ```
    pub fn peek<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.lock().items.front())
    }

    /// Returns the number of elements currently queued.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Returns `true` if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Returns `true` if the queue is bounded and at capacity.
    ///
    /// Always `false` for an unbounded queue.
    pub fn is_full(&self) -> bool {
        self.max_size != 0 && self.lock().items.len() >= self.max_size
    }

    /// Returns the bound on the queue length, or `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        (self.max_size != 0).then_some(self.max_size)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("BlockingQueue")
            .field("len", &inner.items.len())
            .field("capacity", &self.capacity())
            .field("blocking", &inner.blocking)
            .finish_non_exhaustive()
    }
}
