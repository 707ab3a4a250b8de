//! Latest-wins viewport size negotiation, presentation thread to render
//! thread.

use crate::lockfree::AtomicFlag;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// A single coalescing slot for viewport resize requests. Not a queue: an
/// unconsumed earlier request is silently replaced by a newer one; only the
/// state at read time matters.
///
/// Width and height are packed into one atomic word so the pair can never
/// tear: a reader always sees a width/height combination that was actually
/// requested together.
pub struct SizeRequestChannel {
    /// `width << 32 | height`.
    pending: AtomicU64,
    dirty: AtomicFlag,
}

#[inline]
fn pack(width: u32, height: u32) -> u64 {
    (u64::from(width) << 32) | u64::from(height)
}

#[inline]
fn unpack(packed: u64) -> (u32, u32) {
    ((packed >> 32) as u32, packed as u32)
}

impl SizeRequestChannel {
    pub fn new(initial_width: u32, initial_height: u32) -> Self {
        Self {
            pending: AtomicU64::new(pack(initial_width, initial_height)),
            dirty: AtomicFlag::new(false),
        }
    }

    /// Record the requested size and mark it pending. Presentation thread.
    ///
    /// Zero dimensions are rejected as a no-op.
    pub fn set(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!(width, height, "size request rejected: empty dimensions");
            return;
        }
        self.pending.store(pack(width, height), Ordering::Release);
        self.dirty.set(true);
    }

    /// Consume the pending request, or `None` when nothing changed since the
    /// last take. Render thread.
    ///
    /// The flag is cleared with a swap *before* the size is loaded: a `set`
    /// racing with this call either lands before the swap (its size is the
    /// one returned) or after it (the flag is re-raised and the request is
    /// picked up by the next take). A request is never lost.
    pub fn take_if_changed(&self) -> Option<(u32, u32)> {
        if !self.dirty.swap(false) {
            return None;
        }
        Some(unpack(self.pending.load(Ordering::Acquire)))
    }

    /// Read the most recent size without consuming the pending flag.
    pub fn peek(&self) -> (u32, u32) {
        unpack(self.pending.load(Ordering::Acquire))
    }
}
