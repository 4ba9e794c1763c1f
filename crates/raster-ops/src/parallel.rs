//! Row-parallel work distribution using Rayon.
//!
//! A rectangle's rows are split into contiguous, disjoint [`RowBand`]s
//! before any work starts. Each band gets its own mutable slice of the
//! destination rows and its own scratch buffer from a [`BufferPool`], so
//! workers never share writable memory and need no locks.
//!
//! The partition is static: per-row cost is uniform, so there is nothing
//! for work stealing to balance.
//!
//! `Threads(n)` runs on the pool passed in, normally the one a
//! [`ProcessorConfig`](crate::ProcessorConfig) built once up front. Without
//! a matching pool a temporary one is started for the call.
//!
//! # Example
//!
//! ```rust
//! use raster_core::{BufferPool, Frame, Luma, Rect};
//! use raster_ops::parallel::{run_bands, Parallelism};
//!
//! let mut frame: Frame<Luma<u8>> = Frame::new(16, 16);
//! let rect = Rect::new(0, 4, 16, 8);
//! let pool = BufferPool::new();
//!
//! let rows = frame.rows_mut(4..12);
//! run_bands(rows, 16, rect, Parallelism::Sequential, None, &pool, |_band, rows, _scratch| {
//!     rows.fill(Luma::new(1));
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(frame.pixel(0, 4), Luma::new(1));
//! assert_eq!(frame.pixel(0, 3), Luma::new(0));
//! ```

use crate::OpsResult;
use raster_core::{BufferPool, Rect, Vec4, VectorPixel};
use rayon::ThreadPool;
use rayon::prelude::*;
use std::ops::Range;
use tracing::{debug, trace};

/// How many workers process the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// One band, processed on the calling thread.
    Sequential,
    /// One band per thread of the current Rayon pool.
    #[default]
    Auto,
    /// A dedicated pool of `n` threads, one band per thread.
    Threads(usize),
}

impl Parallelism {
    /// Number of bands this setting splits work into.
    pub fn threads(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Auto => rayon::current_num_threads(),
            Self::Threads(n) => (*n).max(1),
        }
    }
}

/// Contiguous run of rows handled by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// Position of the band in the partition.
    pub index: usize,
    /// First row (absolute frame coordinate).
    pub y_start: u32,
    /// One past the last row.
    pub y_end: u32,
    /// First column of the processed rectangle.
    pub x: u32,
    /// Width of the processed rectangle.
    pub width: u32,
}

impl RowBand {
    /// Number of rows in the band.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.y_end - self.y_start
    }

    /// Row range of the band.
    #[inline]
    pub fn row_range(&self) -> Range<u32> {
        self.y_start..self.y_end
    }

    /// Column range of the band within a full-width row.
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        self.x as usize..(self.x + self.width) as usize
    }
}

/// Splits the rows of `rect` into at most `bands` contiguous bands.
///
/// Bands cover every row exactly once, in order, and their heights differ
/// by at most one. An empty rectangle yields no bands.
///
/// ```rust
/// use raster_core::Rect;
/// use raster_ops::parallel::partition;
///
/// let bands = partition(Rect::new(0, 10, 8, 10), 3);
/// let heights: Vec<u32> = bands.iter().map(|b| b.rows()).collect();
/// assert_eq!(heights, vec![4, 3, 3]);
/// assert_eq!(bands[0].y_start, 10);
/// assert_eq!(bands[2].y_end, 20);
/// ```
pub fn partition(rect: Rect, bands: usize) -> Vec<RowBand> {
    if rect.is_empty() {
        return Vec::new();
    }
    let count = bands.clamp(1, rect.height as usize) as u32;
    let base = rect.height / count;
    let extra = rect.height % count;

    let mut y = rect.y;
    (0..count)
        .map(|i| {
            let rows = base + u32::from(i < extra);
            let band = RowBand {
                index: i as usize,
                y_start: y,
                y_end: y + rows,
                x: rect.x,
                width: rect.width,
            };
            y += rows;
            band
        })
        .collect()
}

/// Runs `worker` once per band of `rect` and waits for all of them.
///
/// `rows` must hold exactly the full-width rows `rect.y..rect.bottom()` of
/// a frame `frame_width` pixels wide. Each call receives its band, the
/// band's rows (still full width, see [`RowBand::columns`]) and a scratch
/// buffer of `rect.width` vectors that it may reuse for every row.
///
/// For [`Parallelism::Threads`] the bands run on `workers` when it has
/// exactly that many threads, otherwise on a pool built for this call.
///
/// # Errors
///
/// Returns the first error reported by a worker, a scratch allocation
/// failure, or a thread-pool build failure. Bands that did not run yet
/// are skipped once an error occurs.
pub fn run_bands<P, F>(
    rows: &mut [P],
    frame_width: u32,
    rect: Rect,
    parallelism: Parallelism,
    workers: Option<&ThreadPool>,
    pool: &BufferPool,
    worker: F,
) -> OpsResult<()>
where
    P: VectorPixel,
    F: Fn(&RowBand, &mut [P], &mut [Vec4]) -> OpsResult<()> + Sync,
{
    let width = frame_width as usize;
    debug_assert_eq!(rows.len(), rect.height as usize * width);

    let bands = partition(rect, parallelism.threads());
    debug!(bands = bands.len(), ?parallelism, %rect, "distributing rows");

    let mut jobs = Vec::with_capacity(bands.len());
    let mut rest = rows;
    for band in bands {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.rows() as usize * width);
        jobs.push((band, head));
        rest = tail;
    }

    let run = |(band, slice): (RowBand, &mut [P])| -> OpsResult<()> {
        let mut scratch = pool.scratch(band.width as usize)?;
        trace!(band = band.index, y_start = band.y_start, y_end = band.y_end, "band start");
        worker(&band, slice, &mut scratch)
    };

    match parallelism {
        Parallelism::Sequential => jobs.into_iter().try_for_each(run),
        Parallelism::Auto => jobs.into_par_iter().try_for_each(run),
        Parallelism::Threads(n) => {
            let n = n.max(1);
            match workers.filter(|w| w.current_num_threads() == n) {
                Some(workers) => workers.install(|| jobs.into_par_iter().try_for_each(run)),
                None => {
                    debug!(threads = n, "starting a pool for this call");
                    let workers = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                    workers.install(|| jobs.into_par_iter().try_for_each(run))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;
    use raster_core::{Frame, Luma};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_partition_covers_rows() {
        for height in 1..20u32 {
            for bands in 1..9 {
                let rect = Rect::new(3, 5, 4, height);
                let parts = partition(rect, bands);
                assert_eq!(parts.len(), bands.min(height as usize));
                assert_eq!(parts[0].y_start, 5);
                assert_eq!(parts.last().unwrap().y_end, 5 + height);
                for pair in parts.windows(2) {
                    assert_eq!(pair[0].y_end, pair[1].y_start);
                }
                let min = parts.iter().map(|b| b.rows()).min().unwrap();
                let max = parts.iter().map(|b| b.rows()).max().unwrap();
                assert!(max - min <= 1);
                assert!(parts.iter().all(|b| b.x == 3 && b.width == 4));
            }
        }
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition(Rect::new(0, 0, 0, 10), 4).is_empty());
        assert!(partition(Rect::new(0, 0, 10, 0), 4).is_empty());
    }

    #[test]
    fn test_partition_zero_bands_means_one() {
        let parts = partition(Rect::new(0, 0, 2, 6), 0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].rows(), 6);
    }

    #[test]
    fn test_parallelism_threads() {
        assert_eq!(Parallelism::Sequential.threads(), 1);
        assert_eq!(Parallelism::Threads(0).threads(), 1);
        assert_eq!(Parallelism::Threads(6).threads(), 6);
        assert!(Parallelism::Auto.threads() >= 1);
    }

    fn tag_bands(parallelism: Parallelism) -> Frame<Luma<u8>> {
        let mut frame: Frame<Luma<u8>> = Frame::new(6, 10);
        let rect = Rect::new(1, 2, 4, 7);
        let pool = BufferPool::new();
        let rows = frame.rows_mut(2..9);
        run_bands(rows, 6, rect, parallelism, None, &pool, |band, rows, scratch| {
            assert_eq!(scratch.len(), 4);
            assert_eq!(rows.len(), band.rows() as usize * 6);
            for row in rows.chunks_exact_mut(6) {
                for px in &mut row[band.columns()] {
                    px.l += 1 + band.index as u8;
                }
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(pool.in_use(), 0);
        frame
    }

    #[test]
    fn test_run_bands_writes_each_row_once() {
        for parallelism in [Parallelism::Sequential, Parallelism::Auto, Parallelism::Threads(3)] {
            let frame = tag_bands(parallelism);
            let bands = partition(Rect::new(1, 2, 4, 7), parallelism.threads());
            for (x, y, px) in frame.pixels() {
                let inside = (1..5).contains(&x) && (2..9).contains(&y);
                if !inside {
                    assert_eq!(px.l, 0);
                    continue;
                }
                let band = bands.iter().find(|b| b.row_range().contains(&y)).unwrap();
                assert_eq!(px.l, 1 + band.index as u8);
            }
        }
    }

    #[test]
    fn test_run_bands_propagates_error() {
        let mut frame: Frame<Luma<u8>> = Frame::new(4, 8);
        let pool = BufferPool::new();
        let calls = AtomicUsize::new(0);
        let result = run_bands(
            frame.rows_mut(0..8),
            4,
            Rect::from_size(4, 8),
            Parallelism::Sequential,
            None,
            &pool,
            |band, _rows, _scratch| {
                calls.fetch_add(1, Ordering::SeqCst);
                if band.index == 0 {
                    Err(OpsError::InvalidParameter("boom".into()))
                } else {
                    Ok(())
                }
            },
        );
        assert!(matches!(result, Err(OpsError::InvalidParameter(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_run_bands_scratch_budget() {
        let mut frame: Frame<Luma<u8>> = Frame::new(64, 2);
        let pool = BufferPool::with_budget(16);
        let result = run_bands(
            frame.rows_mut(0..2),
            64,
            Rect::from_size(64, 2),
            Parallelism::Sequential,
            None,
            &pool,
            |_band, _rows, _scratch| Ok(()),
        );
        assert!(result.unwrap_err().is_allocation_error());
    }

    fn band_thread_names(parallelism: Parallelism, workers: Option<&ThreadPool>) -> Vec<String> {
        let mut frame: Frame<Luma<u8>> = Frame::new(4, 12);
        let pool = BufferPool::new();
        let names = Mutex::new(Vec::new());
        let rows = frame.rows_mut(0..12);
        run_bands(rows, 4, Rect::from_size(4, 12), parallelism, workers, &pool, |_, _, _| {
            let name = std::thread::current().name().unwrap_or_default().to_string();
            names.lock().unwrap().push(name);
            Ok(())
        })
        .unwrap();
        names.into_inner().unwrap()
    }

    #[test]
    fn test_run_bands_uses_given_workers() {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(3)
            .thread_name(|i| format!("band-worker-{i}"))
            .build()
            .unwrap();
        let names = band_thread_names(Parallelism::Threads(3), Some(&workers));
        assert_eq!(names.len(), 3);
        assert!(names.iter().all(|n| n.starts_with("band-worker-")), "{names:?}");
    }

    #[test]
    fn test_run_bands_ignores_mismatched_workers() {
        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .thread_name(|i| format!("band-worker-{i}"))
            .build()
            .unwrap();
        let names = band_thread_names(Parallelism::Threads(4), Some(&workers));
        assert_eq!(names.len(), 4);
        assert!(names.iter().all(|n| !n.starts_with("band-worker-")), "{names:?}");
    }
}
