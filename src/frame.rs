//! Double-buffered frame transport, render thread to presentation thread.
//!
//! The one channel in the crate that takes a lock. That is deliberate: only
//! the render and presentation threads meet here, neither has a hard
//! deadline, and the critical section is bounded to a buffer-role swap plus a
//! conditional reallocation. This path must never be reached from the audio
//! thread.

use crate::lockfree::AtomicFlag;
use parking_lot::Mutex;
use std::cell::UnsafeCell;
use tracing::warn;

/// Tightly packed RGBA8, row-major, top-to-bottom.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Default)]
struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * BYTES_PER_PIXEL
    }
}

/// Two pixel buffers whose roles alternate: the render thread fills the
/// inactive one, the presentation thread owns the active one. Dimensions
/// travel with the pixels, so a reader never pairs pixels from one size with
/// dimensions from another.
///
/// The render side ([`submit`](Self::submit)) is safe and belongs to the
/// single render thread. The consumer side
/// ([`acquire_latest`](Self::acquire_latest), [`data`](Self::data),
/// [`width`](Self::width), [`height`](Self::height)) is `unsafe`: those four
/// calls must stay on one thread, and a slice returned by `data` must not be
/// held across an `acquire_latest`.
/// [`PresentationHandle`](crate::PresentationHandle) wraps the consumer side
/// in a safe borrow-checked surface; prefer it unless you manage thread roles
/// yourself.
pub struct FrameChannel {
    /// Inactive buffer, filled by the render thread.
    back: Mutex<PixelBuffer>,
    /// Raised by `submit`, cleared by `acquire_latest`.
    ready: AtomicFlag,
    /// Active buffer, owned by the presentation thread between acquires.
    front: UnsafeCell<PixelBuffer>,
}

// SAFETY: `front` is touched only by `acquire_latest`/`data`/`width`/`height`,
// whose `unsafe` contract restricts them to one thread; `submit` works solely
// on the mutex-guarded back buffer and the ready flag. The Release store of
// `ready` in `submit` pairs with the Acquire check in `acquire_latest`, and
// the handoff of the pixel payload itself happens under the mutex.
unsafe impl Sync for FrameChannel {}
unsafe impl Send for FrameChannel {}

impl FrameChannel {
    pub fn new() -> Self {
        Self {
            back: Mutex::new(PixelBuffer::default()),
            ready: AtomicFlag::new(false),
            front: UnsafeCell::new(PixelBuffer::default()),
        }
    }

    /// Publish a rendered frame. Render thread, once per frame.
    ///
    /// Rejects zero dimensions or a pixel slice that does not match
    /// `width * height * 4` bytes, as a no-op returning `false`. Otherwise
    /// copies the pixels into the inactive buffer (reallocating only when the
    /// byte size changed) and raises the ready flag.
    pub fn submit(&self, pixels: &[u8], width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            warn!(width, height, "frame submit rejected: empty dimensions");
            return false;
        }

        let byte_len = PixelBuffer::byte_len(width, height);
        if pixels.len() != byte_len {
            warn!(
                width,
                height,
                expected = byte_len,
                got = pixels.len(),
                "frame submit rejected: pixel byte length mismatch"
            );
            return false;
        }

        let mut back = self.back.lock();
        if back.pixels.len() != byte_len {
            back.pixels.resize(byte_len, 0);
        }
        back.pixels.copy_from_slice(pixels);
        back.width = width;
        back.height = height;
        self.ready.set(true);
        true
    }

    /// Swap in the newest frame if one is pending. Presentation thread, once
    /// per display refresh.
    ///
    /// Returns `false` when no new frame arrived; the previously acquired
    /// frame stays untouched, so a missed frame never blanks the display.
    /// The swap is O(1): buffer roles flip, no pixels are copied.
    ///
    /// # Safety
    ///
    /// The caller must be the sole consumer thread, and no slice returned by
    /// [`data`](Self::data) may be live across this call: the swap mutates
    /// the buffer that slice points into.
    pub unsafe fn acquire_latest(&self) -> bool {
        if !self.ready.get() {
            return false;
        }

        let mut back = self.back.lock();

        // SAFETY: the caller upholds the consumer contract above.
        let front = unsafe { &mut *self.front.get() };

        std::mem::swap(&mut front.pixels, &mut back.pixels);
        front.width = back.width;
        front.height = back.height;

        self.ready.set(false);
        true
    }

    /// Pixels of the last acquired frame; empty before the first acquire.
    ///
    /// # Safety
    ///
    /// Sole consumer thread only; the slice is invalidated by the next
    /// [`acquire_latest`](Self::acquire_latest) and must not outlive it.
    #[inline]
    pub unsafe fn data(&self) -> &[u8] {
        // SAFETY: the caller upholds the consumer contract.
        unsafe { &(*self.front.get()).pixels }
    }

    /// Width of the last acquired frame; 0 before the first acquire.
    ///
    /// # Safety
    ///
    /// Sole consumer thread only.
    #[inline]
    pub unsafe fn width(&self) -> u32 {
        // SAFETY: the caller upholds the consumer contract.
        unsafe { (*self.front.get()).width }
    }

    /// Height of the last acquired frame; 0 before the first acquire.
    ///
    /// # Safety
    ///
    /// Sole consumer thread only.
    #[inline]
    pub unsafe fn height(&self) -> u32 {
        // SAFETY: the caller upholds the consumer contract.
        unsafe { (*self.front.get()).height }
    }
}

impl Default for FrameChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32, seed: u8) -> Vec<u8> {
        (0..PixelBuffer::byte_len(width, height))
            .map(|i| (i as u8).wrapping_add(seed))
            .collect()
    }

    // Single-threaded tests trivially satisfy the consumer contract: one
    // thread, no `data` slice held across an acquire.

    #[test]
    fn test_submit_then_acquire() {
        let frames = FrameChannel::new();
        let pixels = gradient(64, 32, 0);

        assert!(frames.submit(&pixels, 64, 32));
        unsafe {
            assert!(frames.acquire_latest());
            assert_eq!(frames.width(), 64);
            assert_eq!(frames.height(), 32);
            assert_eq!(frames.data(), pixels.as_slice());
        }
    }

    #[test]
    fn test_missed_frame_keeps_previous() {
        let frames = FrameChannel::new();
        let pixels = gradient(8, 8, 7);

        assert!(frames.submit(&pixels, 8, 8));
        unsafe {
            assert!(frames.acquire_latest());

            // No new submit: acquire reports nothing, prior frame untouched.
            assert!(!frames.acquire_latest());
            assert_eq!(frames.width(), 8);
            assert_eq!(frames.height(), 8);
            assert_eq!(frames.data(), pixels.as_slice());
        }
    }

    #[test]
    fn test_latest_submit_wins() {
        let frames = FrameChannel::new();
        let first = gradient(4, 4, 1);
        let second = gradient(4, 4, 2);

        assert!(frames.submit(&first, 4, 4));
        assert!(frames.submit(&second, 4, 4));
        unsafe {
            assert!(frames.acquire_latest());
            assert_eq!(frames.data(), second.as_slice());
        }
    }

    #[test]
    fn test_submit_leaves_acquired_frame_untouched() {
        let frames = FrameChannel::new();
        let first = gradient(4, 4, 1);
        let second = gradient(4, 4, 9);

        assert!(frames.submit(&first, 4, 4));
        unsafe {
            assert!(frames.acquire_latest());
        }

        // Producer activity alone never writes the acquired buffer; only an
        // acquire swaps it out.
        assert!(frames.submit(&second, 4, 4));
        unsafe {
            assert_eq!(frames.data(), first.as_slice());
            assert!(frames.acquire_latest());
            assert_eq!(frames.data(), second.as_slice());
        }
    }

    #[test]
    fn test_dimension_change_travels_with_pixels() {
        let frames = FrameChannel::new();

        let big = gradient(16, 8, 3);
        assert!(frames.submit(&big, 16, 8));
        unsafe {
            assert!(frames.acquire_latest());
            assert_eq!((frames.width(), frames.height()), (16, 8));
            assert_eq!(frames.data().len(), big.len());
        }

        let small = gradient(2, 2, 4);
        assert!(frames.submit(&small, 2, 2));
        unsafe {
            assert!(frames.acquire_latest());
            assert_eq!((frames.width(), frames.height()), (2, 2));
            assert_eq!(frames.data(), small.as_slice());
        }
    }

    #[test]
    fn test_invalid_submits_rejected() {
        let frames = FrameChannel::new();
        let pixels = gradient(4, 4, 0);

        assert!(!frames.submit(&pixels, 0, 4));
        assert!(!frames.submit(&pixels, 4, 0));
        // Byte length that disagrees with the dimensions.
        assert!(!frames.submit(&pixels, 8, 8));

        // Nothing was published.
        unsafe {
            assert!(!frames.acquire_latest());
            assert_eq!(frames.width(), 0);
            assert_eq!(frames.height(), 0);
            assert!(frames.data().is_empty());
        }
    }
}
