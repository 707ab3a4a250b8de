//! Fixed-capacity SPSC ring channel.
//!
//! The transport primitive under the visualization and input channels. One
//! thread pushes, one thread pops, nothing ever blocks or allocates after
//! construction.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Single-producer single-consumer circular queue with capacity fixed at
/// compile time.
///
/// One slot stays reserved to disambiguate full from empty, so at most
/// `N - 1` items are held. When full, `push` drops the newest item and
/// returns `false`; it never blocks.
///
/// The SPSC discipline is a contract, not something the type detects: for the
/// channel's whole lifetime exactly one thread may call [`push`](Self::push)
/// and exactly one thread may call [`pop`](Self::pop). The
/// [`Bridge`](crate::Bridge) handles enforce this structurally; use the raw
/// type only where you can uphold the contract yourself.
pub struct RingChannel<T: Copy, const N: usize> {
    slots: [UnsafeCell<MaybeUninit<T>>; N],
    /// Next slot to pop. Written only by the consumer.
    head: AtomicUsize,
    /// Next slot to fill. Written only by the producer.
    tail: AtomicUsize,
}

// SAFETY: slot payloads are published with a Release store of `tail` and read
// only after an Acquire load of the same index, so the consumer never observes
// a partially written item. Each index is written by exactly one side. Cross-
// thread use beyond one producer plus one consumer violates the documented
// contract.
unsafe impl<T: Copy + Send, const N: usize> Send for RingChannel<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Sync for RingChannel<T, N> {}

impl<T: Copy, const N: usize> RingChannel<T, N> {
    pub fn new() -> Self {
        assert!(N >= 2, "ring capacity must be at least 2");
        Self {
            slots: std::array::from_fn(|_| UnsafeCell::new(MaybeUninit::uninit())),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Usable capacity: `N - 1`, one slot is reserved.
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Append an item. Producer side only.
    ///
    /// Returns `false` and discards `item` when the channel is full.
    #[inline]
    pub fn push(&self, item: T) -> bool {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) % N;

        if next == self.head.load(Ordering::Acquire) {
            return false;
        }

        // SAFETY: `tail` is owned by the producer and the slot at `tail` is
        // outside the consumer's visible range until the store below.
        unsafe { (*self.slots[tail].get()).write(item) };

        self.tail.store(next, Ordering::Release);
        true
    }

    /// Take the oldest item, if any. Consumer side only.
    #[inline]
    pub fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);

        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the Acquire load above proves the producer published this
        // slot; the producer will not touch it again until `head` advances.
        let item = unsafe { (*self.slots[head].get()).assume_init_read() };

        self.head.store((head + 1) % N, Ordering::Release);
        Some(item)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// Number of items currently held.
    ///
    /// Exact only from the producer or consumer thread. From any other
    /// thread the two index loads can interleave with concurrent updates and
    /// misreport occupancy.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (tail + N - head) % N
    }

    /// Reset to empty. `&mut self` guarantees no concurrent access.
    pub fn clear(&mut self) {
        *self.head.get_mut() = 0;
        *self.tail.get_mut() = 0;
    }
}

impl<T: Copy, const N: usize> Default for RingChannel<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
