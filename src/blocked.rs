//! Cache-blocked multiplication.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::check_dims;

/// Blocked matrix multiplication: C += A × B
///
/// Walks the three loop dimensions in `block_size`-sized tiles so each
/// tile pair stays cache-resident while its partial products are
/// accumulated. Tiles that hang over the matrix edge are clipped, so any
/// `n` and `block_size` combination is fine; `block_size >= n` degenerates
/// to a single tile.
///
/// Unlike [`direct_multiply`](crate::direct_multiply), each output cell is
/// built up across several tile passes, so **`c` must be zeroed by the
/// caller first**. Anything already in `c` is accumulated into, which also
/// makes repeated calls sum their products.
///
/// Bands of `block_size` output rows are spread across a pool of `threads`
/// workers; each band is owned by exactly one worker, so the result is
/// identical for every thread count.
///
/// # Arguments
///
/// * `a` - Left matrix, `n`x`n`, row-major
/// * `b` - Right matrix, `n`x`n`, row-major
/// * `c` - Output matrix, `n`x`n`, row-major, zeroed by the caller
/// * `n` - Matrix dimension
/// * `block_size` - Tile edge length, at least 1
/// * `threads` - Worker threads to spread row bands across, at least 1
///
/// # Errors
///
/// Returns [`Error::ZeroThreads`] if `threads` is 0,
/// [`Error::ZeroBlockSize`] if `block_size` is 0 and [`Error::ThreadPool`]
/// if the worker pool cannot be built. The output buffer is untouched in
/// all three cases.
///
/// # Panics
///
/// Panics if slice lengths don't match the given dimension.
pub fn blocked_multiply(
    a: &[i64],
    b: &[i64],
    c: &mut [i64],
    n: usize,
    block_size: usize,
    threads: usize,
) -> Result<()> {
    check_dims(a, b, c, n);
    if threads == 0 {
        return Err(Error::ZeroThreads);
    }
    if block_size == 0 {
        return Err(Error::ZeroBlockSize);
    }
    if n == 0 {
        return Ok(());
    }
    // Tiles never reach past the matrix edge, so anything larger than n is
    // one pass; clamping also keeps `block_size * n` below usize::MAX.
    let block_size = block_size.min(n);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    pool.install(|| {
        c.par_chunks_mut(block_size * n)
            .enumerate()
            .for_each(|(band, rows)| accumulate_band(a, b, rows, n, block_size, band * block_size));
    });
    Ok(())
}

/// Accumulate one band of output rows, `[ii, ii + rows/n)`, tile by tile.
fn accumulate_band(a: &[i64], b: &[i64], band: &mut [i64], n: usize, block_size: usize, ii: usize) {
    let i_end = ii + band.len() / n;
    for jj in (0..n).step_by(block_size) {
        let j_end = (jj + block_size).min(n);
        for kk in (0..n).step_by(block_size) {
            let k_end = (kk + block_size).min(n);
            for i in ii..i_end {
                let row = &mut band[(i - ii) * n..(i - ii) * n + n];
                for j in jj..j_end {
                    let mut sum = 0;
                    for k in kk..k_end {
                        sum += a[i * n + k] * b[k * n + j];
                    }
                    row[j] += sum;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direct::direct_kernel;

    #[test]
    fn clipped_tiles_cover_a_5x5() {
        let n = 5;
        let a: Vec<i64> = (0..(n * n) as i64).collect();
        let b: Vec<i64> = (0..(n * n) as i64).map(|i| (i * 7) % 10).collect();

        let mut expected = vec![0; n * n];
        direct_kernel(&a, &b, &mut expected, n);

        // 2 does not divide 5, so every edge tile is clipped.
        let mut c = vec![0; n * n];
        blocked_multiply(&a, &b, &mut c, n, 2, 2).unwrap();
        assert_eq!(c, expected);
    }

    #[test]
    fn oversized_tile_is_one_pass() {
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut c = [0; 4];
        blocked_multiply(&a, &b, &mut c, 2, 64, 1).unwrap();
        assert_eq!(c, [19, 22, 43, 50]);
    }

    #[test]
    fn huge_tile_does_not_overflow_band_size() {
        // A tile edge where block_size * n wraps around usize.
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut c = [0; 4];
        blocked_multiply(&a, &b, &mut c, 2, usize::MAX / 2 + 1, 1).unwrap();
        assert_eq!(c, [19, 22, 43, 50]);

        let mut c = [0; 4];
        blocked_multiply(&a, &b, &mut c, 2, usize::MAX, 1).unwrap();
        assert_eq!(c, [19, 22, 43, 50]);
    }
}
