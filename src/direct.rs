//! Direct triple-loop multiplication.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::matrix::check_dims;

/// Direct matrix multiplication: C = A × B
///
/// Classic i-j-k triple loop over `n`x`n` row-major matrices. Every output
/// cell is computed independently and assigned exactly once, so `c` does
/// not need to be zeroed beforehand and rows can be filled in parallel:
/// the output is split into row chunks and spread across a pool of
/// `threads` workers. The result is identical for every thread count.
///
/// Sums of `n` products accumulate in `i64`, so the result is exact while
/// `n * max|a| * max|b|` stays below 2^63.
///
/// # Arguments
///
/// * `a` - Left matrix, `n`x`n`, row-major
/// * `b` - Right matrix, `n`x`n`, row-major
/// * `c` - Output matrix, `n`x`n`, row-major
/// * `n` - Matrix dimension
/// * `threads` - Worker threads to spread rows across, at least 1
///
/// # Errors
///
/// Returns [`Error::ZeroThreads`] if `threads` is 0 and
/// [`Error::ThreadPool`] if the worker pool cannot be built. The output
/// buffer is untouched in both cases.
///
/// # Panics
///
/// Panics if slice lengths don't match the given dimension.
pub fn direct_multiply(
    a: &[i64],
    b: &[i64],
    c: &mut [i64],
    n: usize,
    threads: usize,
) -> Result<()> {
    check_dims(a, b, c, n);
    if threads == 0 {
        return Err(Error::ZeroThreads);
    }
    if n == 0 {
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    pool.install(|| {
        c.par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, row)| fill_row(a, b, row, n, i));
    });
    Ok(())
}

/// Sequential i-j-k kernel over a whole `n`x`n` block.
///
/// Base case of the Strassen recursion; same arithmetic as
/// [`direct_multiply`], minus the worker pool.
pub(crate) fn direct_kernel(a: &[i64], b: &[i64], c: &mut [i64], n: usize) {
    for (i, row) in c.chunks_mut(n).enumerate() {
        fill_row(a, b, row, n, i);
    }
}

/// Compute row `i` of the product into `row`.
fn fill_row(a: &[i64], b: &[i64], row: &mut [i64], n: usize, i: usize) {
    for j in 0..n {
        let mut sum = 0;
        for k in 0..n {
            sum += a[i * n + k] * b[k * n + j];
        }
        row[j] = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_matches_hand_computed_2x2() {
        let a = [1, 2, 3, 4];
        let b = [5, 6, 7, 8];
        let mut c = [0; 4];
        direct_kernel(&a, &b, &mut c, 2);
        assert_eq!(c, [19, 22, 43, 50]);
    }

    #[test]
    fn parallel_rows_match_the_kernel() {
        let n = 16;
        let a: Vec<i64> = (0..(n * n) as i64).map(|i| i % 10).collect();
        let b: Vec<i64> = (0..(n * n) as i64).map(|i| (i * 3 + 1) % 10).collect();

        let mut serial = vec![0; n * n];
        direct_kernel(&a, &b, &mut serial, n);

        let mut parallel = vec![0; n * n];
        direct_multiply(&a, &b, &mut parallel, n, 4).unwrap();

        assert_eq!(serial, parallel);
    }
}
