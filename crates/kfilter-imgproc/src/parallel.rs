use rayon::prelude::*;
use thiserror::Error;

use kfilter_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the per-pixel work of an operation is scheduled.
///
/// Every strategy returns only once all the pixels have been written, and all
/// of them produce the same output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool with one task per destination row.
    ///
    /// This is the most cache-friendly option for image filters.
    #[default]
    ParallelRows,

    /// Use the global Rayon thread pool with one task per destination pixel.
    ///
    /// This maximizes parallelism but has the highest scheduling overhead.
    ParallelElements,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run rows on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or to cap the number of workers.
    Fixed(usize),
}

/// Compute every pixel of `dst` with `f(col, row, pixel)` following `strategy`.
///
/// Each invocation of `f` receives exclusive access to the channels of one
/// destination pixel, so no synchronization is needed between workers. The
/// function blocks until every pixel has been processed.
///
/// # Arguments
///
/// * `dst` - The destination image.
/// * `strategy` - How the work is scheduled.
/// * `f` - The per-pixel kernel.
///
/// # Errors
///
/// Returns an error if a local thread pool is requested with zero threads or fails to build.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    strategy: ExecutionStrategy,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) -> Result<(), ParallelError>
where
    T: Send + Sync,
{
    let cols = dst.cols();
    let row_stride = C * cols;

    // a zero-width stride is rejected by the chunk iterators
    if row_stride == 0 || dst.rows() == 0 {
        if let ExecutionStrategy::Fixed(0) = strategy {
            return Err(ParallelError::InvalidThreadCount(0));
        }
        return Ok(());
    }

    let dst_slice = dst.as_slice_mut();

    let fill_row = |(row, dst_row): (usize, &mut [T])| {
        dst_row
            .chunks_exact_mut(C)
            .enumerate()
            .for_each(|(col, dst_pixel)| f(col, row, dst_pixel));
    };

    match strategy {
        ExecutionStrategy::Serial => {
            dst_slice
                .chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(fill_row);
        }
        ExecutionStrategy::ParallelRows => {
            dst_slice
                .par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(fill_row);
        }
        ExecutionStrategy::ParallelElements => {
            dst_slice
                .par_chunks_exact_mut(C)
                .enumerate()
                .for_each(|(idx, dst_pixel)| f(idx % cols, idx / cols, dst_pixel));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst_slice
                    .par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(fill_row);
            });
        }
    }

    Ok(())
}
