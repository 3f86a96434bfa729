//! The underlying ring buffer storage for the SPSC queue.
//!
//! A single contiguous allocation of `capacity + 1` uninitialized slots plus
//! two cache-line padded cursors:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ read (cache-line padded) - consumer position          │
//! ├───────────────────────────────────────────────────────┤
//! │ write (cache-line padded) - producer position         │
//! ├───────────────────────────────────────────────────────┤
//! │ Buffer: [T; capacity + 1]                             │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Live elements occupy the circular range `[read, write)`. Cursors wrap
//! modulo the slot count; one slot always stays empty so that
//! `write == read` means empty and `advance(write) == read` means full
//! without tracking a separate length.

use std::mem::ManuallyDrop;
use std::ptr;

#[cfg(loom)]
use loom::sync::atomic::{AtomicUsize, Ordering};
#[cfg(not(loom))]
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

/// The backing storage shared by a [`Producer`](super::Producer) /
/// [`Consumer`](super::Consumer) pair.
///
/// Each cursor has exactly one writer: the producer publishes `write` with
/// Release and observes `read` with Acquire; the consumer does the mirror
/// image. A cursor's owner may re-read it Relaxed.
pub(super) struct RingBuffer<T> {
    /// Consumer's position. Updated by the consumer, observed by the producer.
    read: CachePadded<AtomicUsize>,
    /// Producer's position. Updated by the producer, observed by the consumer.
    write: CachePadded<AtomicUsize>,

    buffer: *mut T,

    /// Allocated slot count: requested capacity + 1.
    slots: usize,
}

// Safety: the cursor handshake synchronizes all slot access; the buffer is
// only touched through the unsafe slot methods whose contracts restrict each
// slot to one side at a time.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Allocates storage for `capacity` elements (`capacity + 1` slots).
    pub(super) fn new(capacity: usize) -> Self {
        let slots = capacity + 1;

        // Uninitialized Vec allocation - guarantees alignment, freed by
        // reconstructing it in Drop.
        let mut storage = ManuallyDrop::new(Vec::<T>::with_capacity(slots));
        let buffer = storage.as_mut_ptr();

        Self {
            read: CachePadded::new(AtomicUsize::new(0)),
            write: CachePadded::new(AtomicUsize::new(0)),
            buffer,
            slots,
        }
    }

    /// Usable capacity: one slot fewer than allocated.
    #[inline]
    pub(super) fn capacity(&self) -> usize {
        self.slots - 1
    }

    /// Advances an index by one, wrapping at the slot count.
    #[inline]
    pub(super) fn advance(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots { 0 } else { next }
    }

    // === Snapshots (both cursors Acquire) ===

    /// Number of live elements: `(write - read) mod slots`.
    pub(super) fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        if write >= read {
            write - read
        } else {
            write + self.slots - read
        }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    pub(super) fn is_full(&self) -> bool {
        let next = self.advance(self.write.load(Ordering::Acquire));
        next == self.read.load(Ordering::Acquire)
    }

    // === Cursor operations ===

    /// Observes the consumer's progress. Producer side.
    #[inline]
    pub(super) fn read_acquire(&self) -> usize {
        self.read.load(Ordering::Acquire)
    }

    /// Re-reads the consumer's own cursor. Consumer side only.
    #[inline]
    pub(super) fn read_relaxed(&self) -> usize {
        self.read.load(Ordering::Relaxed)
    }

    /// Observes the producer's progress. Consumer side.
    #[inline]
    pub(super) fn write_acquire(&self) -> usize {
        self.write.load(Ordering::Acquire)
    }

    /// Re-reads the producer's own cursor. Producer side only.
    #[inline]
    pub(super) fn write_relaxed(&self) -> usize {
        self.write.load(Ordering::Relaxed)
    }

    /// Publishes a freed slot to the producer.
    #[inline]
    pub(super) fn publish_read(&self, next: usize) {
        self.read.store(next, Ordering::Release);
    }

    /// Publishes a written slot to the consumer.
    #[inline]
    pub(super) fn publish_write(&self, next: usize) {
        self.write.store(next, Ordering::Release);
    }

    // === Slot operations ===

    /// Moves `value` into the slot at `index`.
    ///
    /// # Safety
    ///
    /// `index` must be the producer's current write position and the slot
    /// must not be published yet.
    #[inline]
    pub(super) unsafe fn write_slot(&self, index: usize, value: T) {
        unsafe { self.buffer.add(index).write(value) };
    }

    /// Moves the value out of the slot at `index`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `index` must be the consumer's current read position and lie in the
    /// published range `[read, write)`.
    #[inline]
    pub(super) unsafe fn read_slot(&self, index: usize) -> T {
        unsafe { self.buffer.add(index).read() }
    }

    /// Borrows the value in the slot at `index` without consuming it.
    ///
    /// # Safety
    ///
    /// Same contract as [`read_slot`](Self::read_slot); the borrow must end
    /// before the slot is consumed.
    #[inline]
    pub(super) unsafe fn slot_ref(&self, index: usize) -> &T {
        unsafe { &*self.buffer.add(index) }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Sole owner at this point, so Relaxed loads suffice.
        let mut read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Relaxed);

        while read != write {
            unsafe { ptr::drop_in_place(self.buffer.add(read)) };
            read = self.advance(read);
        }

        // Reconstruct the Vec (length 0: live elements were just dropped)
        // to free the allocation.
        unsafe {
            let _ = Vec::from_raw_parts(self.buffer, 0, self.slots);
        }
    }
}
