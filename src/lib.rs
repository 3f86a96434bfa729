//! # handoff
//!
//! Queue primitives for handing values between threads.
//!
//! ## Features
//!
//! - **[`spsc`]**: bounded lock-free single-producer single-consumer ring
//!   buffer — one atomic store to publish, no locks, no waiting
//! - **[`mpmc`]**: growable, optionally-bounded blocking queue for any number
//!   of producers and consumers, with timed waits and a cooperative shutdown
//!   signal
//!
//! The two are independent; pick by topology. The ring buffer is the fast
//! path for a dedicated pair of threads, the blocking queue is the workhorse
//! for thread pools that want to sleep while idle.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use handoff::mpmc::BlockingQueue;
//!
//! let queue = Arc::new(BlockingQueue::unbounded());
//!
//! let worker = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         let mut sum = 0u64;
//!         while let Some(n) = queue.take() {
//!             sum += n;
//!         }
//!         sum
//!     })
//! };
//!
//! for i in 1..=10 {
//!     queue.push(i).unwrap();
//! }
//! queue.unblock();
//!
//! assert_eq!(worker.join().unwrap(), 55);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use std::fmt;

pub mod mpmc;
pub mod spsc;

/// Error returned when pushing into a full queue.
///
/// Carries the rejected value so nothing is lost; the push had no other
/// effect.
///
/// # Example
///
/// ```
/// use handoff::spsc;
///
/// let (mut tx, _rx) = spsc::ring_buffer::<u32>(1);
///
/// tx.push(1).unwrap();
/// let err = tx.push(2).unwrap_err();
/// assert_eq!(err.into_inner(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that couldn't be pushed.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}
