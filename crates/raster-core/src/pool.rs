//! Memory accounting and scratch-buffer reuse.
//!
//! A [`BufferPool`] hands out two kinds of scoped resources:
//!
//! - [`Reservation`] - a byte budget claim for a buffer the caller
//!   allocates itself (destination frames)
//! - [`Scratch`] - a reusable `Vec<Vec4>` for per-row float work
//!
//! Both give their bytes back when dropped, so early returns and `?`
//! never leak budget. Scratch vectors go back to a free list and are
//! handed out again by later requests.
//!
//! # Example
//!
//! ```rust
//! use raster_core::BufferPool;
//!
//! let pool = BufferPool::with_budget(1 << 20);
//! {
//!     let mut scratch = pool.scratch(256).unwrap();
//!     scratch[0] = [1.0, 0.0, 0.0, 1.0];
//!     assert!(pool.in_use() >= 256 * 16);
//! }
//! assert_eq!(pool.in_use(), 0);
//! assert_eq!(pool.cached(), 1);
//! ```

use crate::{Error, Result, Vec4};
use std::ops::{Deref, DerefMut};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Upper bound on scratch vectors kept for reuse.
const MAX_CACHED: usize = 64;

/// Byte budget and scratch free list shared by processing calls.
///
/// `BufferPool` is `Sync`; share it between threads by reference or
/// through an `Arc`.
#[derive(Debug, Default)]
pub struct BufferPool {
    budget: Option<usize>,
    in_use: AtomicUsize,
    free: Mutex<Vec<Vec<Vec4>>>,
}

impl BufferPool {
    /// Creates a pool without a byte budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool that refuses to exceed `bytes` in use.
    pub fn with_budget(bytes: usize) -> Self {
        Self {
            budget: Some(bytes),
            ..Self::default()
        }
    }

    /// The byte budget, if any.
    #[inline]
    pub fn budget(&self) -> Option<usize> {
        self.budget
    }

    /// Bytes currently claimed by live reservations and scratch buffers.
    #[inline]
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Acquire)
    }

    /// Number of scratch vectors waiting on the free list.
    pub fn cached(&self) -> usize {
        self.free.lock().map(|free| free.len()).unwrap_or(0)
    }

    /// Claims `bytes` of the budget until the returned guard drops.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the claim would exceed the
    /// budget. Nothing is claimed in that case.
    pub fn reserve(&self, bytes: usize) -> Result<Reservation<'_>> {
        self.claim(bytes)?;
        Ok(Reservation { pool: self, bytes })
    }

    /// Returns a zeroed scratch buffer of exactly `len` vectors.
    ///
    /// Reuses a cached vector with enough capacity when one is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if the budget would be exceeded or
    /// the system allocator refuses the request.
    pub fn scratch(&self, len: usize) -> Result<Scratch<'_>> {
        let bytes = len
            .checked_mul(std::mem::size_of::<Vec4>())
            .ok_or_else(|| Error::allocation_failed(usize::MAX, "scratch size overflows usize"))?;
        self.claim(bytes)?;

        let mut buf = self.take_cached(len).unwrap_or_default();
        buf.clear();
        if let Err(e) = buf.try_reserve_exact(len) {
            self.release(bytes);
            return Err(Error::allocation_failed(bytes, e.to_string()));
        }
        buf.resize(len, [0.0; 4]);

        Ok(Scratch {
            pool: self,
            buf,
            bytes,
        })
    }

    fn take_cached(&self, len: usize) -> Option<Vec<Vec4>> {
        let mut free = self.free.lock().ok()?;
        let idx = free.iter().position(|v| v.capacity() >= len)?;
        Some(free.swap_remove(idx))
    }

    fn claim(&self, bytes: usize) -> Result<()> {
        let budget = self.budget.unwrap_or(usize::MAX);
        self.in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(bytes).filter(|total| *total <= budget)
            })
            .map(|_| ())
            .map_err(|used| match self.budget {
                Some(budget) => Error::allocation_failed(
                    bytes,
                    format!("pool budget of {} bytes exceeded ({} in use)", budget, used),
                ),
                None => Error::allocation_failed(
                    bytes,
                    format!("byte count overflows usize ({} in use)", used),
                ),
            })
    }

    fn release(&self, bytes: usize) {
        self.in_use.fetch_sub(bytes, Ordering::AcqRel);
    }

    fn recycle(&self, buf: Vec<Vec4>) {
        if let Ok(mut free) = self.free.lock() {
            if free.len() < MAX_CACHED {
                free.push(buf);
            }
        }
    }
}

/// Scoped claim on a [`BufferPool`] budget.
#[derive(Debug)]
#[must_use = "the claim is released as soon as the reservation drops"]
pub struct Reservation<'a> {
    pool: &'a BufferPool,
    bytes: usize,
}

impl Reservation<'_> {
    /// Bytes held by this reservation.
    #[inline]
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.pool.release(self.bytes);
    }
}

/// Scoped scratch buffer of float vectors.
///
/// Derefs to `[Vec4]` of the requested length.
#[derive(Debug)]
pub struct Scratch<'a> {
    pool: &'a BufferPool,
    buf: Vec<Vec4>,
    bytes: usize,
}

impl Deref for Scratch<'_> {
    type Target = [Vec4];

    #[inline]
    fn deref(&self) -> &[Vec4] {
        &self.buf
    }
}

impl DerefMut for Scratch<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [Vec4] {
        &mut self.buf
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        trace!(len = self.buf.len(), "scratch returned to pool");
        self.pool.release(self.bytes);
        self.pool.recycle(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_releases_on_drop() {
        let pool = BufferPool::with_budget(1000);
        {
            let r = pool.reserve(600).unwrap();
            assert_eq!(r.bytes(), 600);
            assert_eq!(pool.in_use(), 600);
        }
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_budget_exceeded() {
        let pool = BufferPool::with_budget(1000);
        let _a = pool.reserve(600).unwrap();
        let err = pool.reserve(600).unwrap_err();
        assert!(err.is_allocation_error());
        assert_eq!(pool.in_use(), 600);
    }

    #[test]
    fn test_scratch_counts_against_budget() {
        let pool = BufferPool::with_budget(64);
        let s = pool.scratch(4).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(pool.in_use(), 64);
        assert!(pool.scratch(1).is_err());
        drop(s);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_scratch_is_reused_and_zeroed() {
        let pool = BufferPool::new();
        {
            let mut s = pool.scratch(32).unwrap();
            s[5] = [9.0; 4];
        }
        assert_eq!(pool.cached(), 1);
        let s = pool.scratch(16).unwrap();
        assert_eq!(pool.cached(), 0);
        assert_eq!(s.len(), 16);
        assert!(s.iter().all(|v| *v == [0.0; 4]));
    }

    #[test]
    fn test_unbounded_pool() {
        let pool = BufferPool::new();
        assert_eq!(pool.budget(), None);
        let _r = pool.reserve(usize::MAX / 2).unwrap();
        assert_eq!(pool.in_use(), usize::MAX / 2);
    }

    #[test]
    fn test_unbounded_pool_overflow() {
        let pool = BufferPool::new();
        let first = pool.reserve(usize::MAX / 2 + 1).unwrap();
        let err = pool.reserve(usize::MAX / 2 + 1).unwrap_err();
        assert!(err.is_allocation_error());
        assert_eq!(pool.in_use(), usize::MAX / 2 + 1);
        drop(first);
        assert_eq!(pool.in_use(), 0);
    }
}
