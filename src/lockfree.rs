//! Lock-free primitives shared by the channels.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache-line aligned atomic f32.
///
/// One cell per parameter; writers and readers never share a line.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFloat {
    value: AtomicF32,
}

impl AtomicFloat {
    pub fn new(value: f32) -> Self {
        Self {
            value: AtomicF32::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.value.store(value, Ordering::Release);
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Cache-line aligned atomic bool.
#[derive(Debug)]
#[repr(align(64))]
pub struct AtomicFlag {
    value: AtomicBool,
}

impl AtomicFlag {
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: bool) -> bool {
        self.value.swap(value, Ordering::AcqRel)
    }
}

impl Clone for AtomicFlag {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl Default for AtomicFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_float() {
        let val = AtomicFloat::new(1.0);
        assert_eq!(val.get(), 1.0);
        val.set(2.5);
        assert_eq!(val.get(), 2.5);
    }

    #[test]
    fn test_atomic_flag_swap() {
        let flag = AtomicFlag::new(false);
        assert!(!flag.swap(true));
        assert!(flag.get());
        assert!(flag.swap(false));
        assert!(!flag.get());
    }
}
