//! Error type shared by the three multiplication entry points.

use std::collections::TryReserveError;

use thiserror::Error;

/// Failures surfaced by [`direct_multiply`](crate::direct_multiply),
/// [`blocked_multiply`](crate::blocked_multiply) and
/// [`recursive_multiply`](crate::recursive_multiply).
///
/// Parameter violations are rejected before any arithmetic runs, so the
/// output buffer is untouched when one of those is returned. Allocation
/// failures can surface from inside the Strassen recursion, in which case
/// the output contents are unspecified.
#[derive(Debug, Error)]
pub enum Error {
    /// The worker budget must be at least one thread.
    #[error("thread count must be at least 1")]
    ZeroThreads,

    /// The blocked algorithm cannot step through the matrix in empty tiles.
    #[error("block size must be at least 1")]
    ZeroBlockSize,

    /// Strassen halves the dimension until it reaches 1x1, so the input
    /// size must be a power of two.
    #[error("matrix dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// An intermediate buffer for the recursion could not be allocated.
    #[error("failed to allocate an intermediate matrix buffer")]
    Allocation(#[from] TryReserveError),

    /// The worker pool for the requested thread count could not be built.
    #[error("failed to build the worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
