//! Single-producer single-consumer (SPSC) bounded queue.
//!
//! A lock-free ring buffer for exactly one writer thread and one reader
//! thread. Neither side ever blocks or waits for the other: every operation
//! returns immediately with its outcome.
//!
//! # Example
//!
//! ```
//! use handoff::spsc;
//!
//! let (mut tx, mut rx) = spsc::ring_buffer::<u64>(1024);
//!
//! tx.push(1).unwrap();
//! tx.push(2).unwrap();
//!
//! assert_eq!(rx.pop(), Some(1));
//! assert_eq!(rx.pop(), Some(2));
//! assert_eq!(rx.pop(), None);
//! ```
//!
//! # Capacity
//!
//! A queue built with `ring_buffer(n)` holds exactly `n` elements before
//! [`Producer::push`] reports full. Internally `n + 1` slots are allocated
//! and one is always kept empty — with only two cursors, the spare slot is
//! what distinguishes a full queue from an empty one.
//!
//! # Performance Notes
//!
//! Each operation touches the two cursors and nothing else:
//!
//! - One Relaxed load of the caller's own cursor (no one else writes it)
//! - One Acquire load of the other side's cursor (observes its progress)
//! - One Release store to publish (makes the slot write/reuse visible)
//!
//! There is no compare-and-swap anywhere, and the cursors live on separate
//! cache lines so the producer and consumer never contend on one.
//!
//! Elements are observed in exactly the order they were pushed; the
//! acquire/release handshake on the cursors is the only synchronization and
//! is what makes the slot contents visible across threads.

mod ring;

use std::fmt;
use std::sync::Arc;

use ring::RingBuffer;

use crate::Full;

/// Creates a new SPSC queue holding up to `capacity` elements.
///
/// Returns a `(Producer, Consumer)` pair. Each handle can move to its own
/// thread; the pair shares one fixed allocation that is freed when both
/// handles are gone, after dropping any elements still queued.
///
/// # Panics
///
/// Panics if `capacity` is 0.
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use handoff::spsc;
///
/// let (mut tx, mut rx) = spsc::ring_buffer::<u64>(64);
///
/// let producer = thread::spawn(move || {
///     for i in 0..100 {
///         while tx.push(i).is_err() {
///             std::hint::spin_loop();
///         }
///     }
/// });
///
/// for i in 0..100 {
///     let value = loop {
///         match rx.pop() {
///             Some(v) => break v,
///             None => std::hint::spin_loop(),
///         }
///     };
///     assert_eq!(value, i);
/// }
///
/// producer.join().unwrap();
/// ```
pub fn ring_buffer<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    assert!(capacity > 0, "capacity must be non-zero");

    let ring = Arc::new(RingBuffer::new(capacity));

    (
        Producer {
            ring: Arc::clone(&ring),
        },
        Consumer { ring },
    )
}

/// The writing half of an SPSC queue.
///
/// Owned by exactly one thread at a time; all mutation goes through
/// `&mut self`, so a second producer cannot exist.
pub struct Producer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Producer<T> {
    /// Attempts to push a value onto the queue.
    ///
    /// Never blocks. On success the element becomes visible to the consumer
    /// before the call returns.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if the queue is full; the queue is
    /// untouched and the value is handed back.
    ///
    /// # Example
    ///
    /// ```
    /// use handoff::{spsc, Full};
    ///
    /// let (mut tx, _rx) = spsc::ring_buffer::<u32>(2);
    ///
    /// assert!(tx.push(1).is_ok());
    /// assert!(tx.push(2).is_ok());
    /// assert_eq!(tx.push(3), Err(Full(3)));
    /// ```
    #[inline]
    #[must_use = "push returns Err if full, which should be handled"]
    pub fn push(&mut self, value: T) -> Result<(), Full<T>> {
        let write = self.ring.write_relaxed();
        let next = self.ring.advance(write);

        if next == self.ring.read_acquire() {
            return Err(Full(value));
        }

        // Safety: [write] is outside the published range [read, write), and
        // we are the only producer.
        unsafe { self.ring.write_slot(write, value) };
        self.ring.publish_write(next);

        Ok(())
    }

    /// Returns the number of elements the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns `true` if the queue is full.
    ///
    /// A snapshot: the consumer may free a slot immediately after.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns `true` if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns the number of elements currently queued.
    ///
    /// An approximation by design: the consumer may be popping concurrently,
    /// so the true size can only be smaller than reported here by the time
    /// the caller acts on it. Always within `0..=capacity`.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

/// The reading half of an SPSC queue.
///
/// Owned by exactly one thread at a time; consuming goes through
/// `&mut self`, so a second consumer cannot exist.
pub struct Consumer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Consumer<T> {
    /// Attempts to pop the front element off the queue.
    ///
    /// Never blocks; returns `None` if the queue is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use handoff::spsc;
    ///
    /// let (mut tx, mut rx) = spsc::ring_buffer::<u32>(8);
    ///
    /// assert_eq!(rx.pop(), None);
    /// tx.push(42).unwrap();
    /// assert_eq!(rx.pop(), Some(42));
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let read = self.ring.read_relaxed();

        if read == self.ring.write_acquire() {
            return None;
        }

        // Safety: [read] is inside the published range [read, write); the
        // slot is live and we are the only consumer.
        let value = unsafe { self.ring.read_slot(read) };
        self.ring.publish_read(self.ring.advance(read));

        Some(value)
    }

    /// Borrows the front element without consuming it.
    ///
    /// Returns `None` if the queue is empty. The borrow ends before the next
    /// [`pop`](Self::pop) can run.
    ///
    /// # Example
    ///
    /// ```
    /// use handoff::spsc;
    ///
    /// let (mut tx, mut rx) = spsc::ring_buffer::<String>(8);
    ///
    /// tx.push("front".to_owned()).unwrap();
    /// assert_eq!(rx.peek().map(String::as_str), Some("front"));
    /// assert_eq!(rx.pop().as_deref(), Some("front"));
    /// ```
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        let read = self.ring.read_relaxed();

        if read == self.ring.write_acquire() {
            return None;
        }

        // Safety: slot is live (same check as pop) and stays live for the
        // borrow: only pop retires it, and pop needs &mut self.
        Some(unsafe { self.ring.slot_ref(read) })
    }

    /// Returns the number of elements the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Returns `true` if the queue is empty.
    ///
    /// A snapshot: the producer may publish an element immediately after.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns `true` if the queue is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns the number of elements currently queued.
    ///
    /// An approximation by design: the producer may be pushing concurrently,
    /// so the true size can only be larger than reported here by the time
    /// the caller acts on it. Always within `0..=capacity`.
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
