//! Strassen's divide-and-conquer multiplication.
//!
//! Each level splits both operands into four quadrants, forms seven
//! products of quadrant sums with one recursive call each, and recombines
//! those products into the four output quadrants. Seven products instead
//! of the obvious eight is the whole trick: it brings the arithmetic cost
//! down from n^3 to about n^2.81, paid for with a pile of temporary
//! buffers per level.

use crate::direct::direct_kernel;
use crate::error::{Error, Result};
use crate::matrix::{check_dims, diff_of, quadrants, sum_of, try_buffer};

/// Strassen matrix multiplication: C = A × B
///
/// `n` must be a power of two so the quadrant split stays exact all the
/// way down. Blocks of `threshold` or fewer rows are handed to the direct
/// kernel instead of being split further; a `threshold` of 0 recurses all
/// the way to 1x1 blocks. The seven quadrant products of each level are
/// independent, so they run as fork-join tasks on a pool of `threads`
/// workers, and the recombination waits for all seven before it reads
/// anything.
///
/// Every task writes only its own buffers and the arithmetic is integer,
/// so the result is bit-identical for every thread count. Quadrant sums
/// grow the magnitude at each split: the result is exact while
/// `n^4 * max|a| * max|b|` stays below 2^63 (digit-valued inputs are safe
/// through `n = 16384`), and overflow beyond that is not detected.
///
/// # Arguments
///
/// * `a` - Left matrix, `n`x`n`, row-major
/// * `b` - Right matrix, `n`x`n`, row-major
/// * `c` - Output matrix, `n`x`n`, row-major
/// * `n` - Matrix dimension, a power of two
/// * `threshold` - Largest block handed to the direct kernel; 0 for full
///   recursion
/// * `threads` - Worker threads for the task pool, at least 1
///
/// # Errors
///
/// Returns [`Error::ZeroThreads`] if `threads` is 0,
/// [`Error::NotPowerOfTwo`] if `n` is not a power of two (0 included) and
/// [`Error::ThreadPool`] if the worker pool cannot be built; the output
/// buffer is untouched in those cases. Returns [`Error::Allocation`] if a
/// temporary buffer cannot be allocated mid-recursion, in which case the
/// output contents are unspecified.
///
/// # Panics
///
/// Panics if slice lengths don't match the given dimension.
pub fn recursive_multiply(
    a: &[i64],
    b: &[i64],
    c: &mut [i64],
    n: usize,
    threshold: usize,
    threads: usize,
) -> Result<()> {
    check_dims(a, b, c, n);
    if threads == 0 {
        return Err(Error::ZeroThreads);
    }
    if !n.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(n));
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    pool.install(|| strassen(a, b, c, n, threshold))
}

/// One level of the recursion, writing the full product into `c`.
fn strassen(a: &[i64], b: &[i64], c: &mut [i64], n: usize, threshold: usize) -> Result<()> {
    // Small blocks are cheaper to multiply than to split. Checked before
    // the 1x1 terminal so a threshold of 1 still takes this path.
    if n <= threshold {
        direct_kernel(a, b, c, n);
        return Ok(());
    }
    if n == 1 {
        c[0] = a[0] * b[0];
        return Ok(());
    }

    let m = n / 2;
    let [a11, a12, a21, a22] = quadrants(a, n)?;
    let [b11, b12, b21, b22] = quadrants(b, n)?;

    let product = |x: &[i64], y: &[i64]| -> Result<Vec<i64>> {
        let mut p = try_buffer(m * m)?;
        strassen(x, y, &mut p, m, threshold)?;
        Ok(p)
    };

    // The seven products share nothing, so each recursion level fans them
    // out as one balanced tree of fork-join tasks. The outer join is the
    // barrier: no product is read until every task has returned.
    let ((p1, (p2, p3)), ((p4, p5), (p6, p7))) = rayon::join(
        || {
            rayon::join(
                // P1 = (A11 + A22) * (B11 + B22)
                || -> Result<Vec<i64>> { product(&sum_of(&a11, &a22)?, &sum_of(&b11, &b22)?) },
                || {
                    rayon::join(
                        // P2 = (A21 + A22) * B11
                        || -> Result<Vec<i64>> { product(&sum_of(&a21, &a22)?, &b11) },
                        // P3 = A11 * (B12 - B22)
                        || -> Result<Vec<i64>> { product(&a11, &diff_of(&b12, &b22)?) },
                    )
                },
            )
        },
        || {
            rayon::join(
                || {
                    rayon::join(
                        // P4 = A22 * (B21 - B11)
                        || -> Result<Vec<i64>> { product(&a22, &diff_of(&b21, &b11)?) },
                        // P5 = (A11 + A12) * B22
                        || -> Result<Vec<i64>> { product(&sum_of(&a11, &a12)?, &b22) },
                    )
                },
                || {
                    rayon::join(
                        // P6 = (A21 - A11) * (B11 + B12)
                        || -> Result<Vec<i64>> {
                            product(&diff_of(&a21, &a11)?, &sum_of(&b11, &b12)?)
                        },
                        // P7 = (A12 - A22) * (B21 + B22)
                        || -> Result<Vec<i64>> {
                            product(&diff_of(&a12, &a22)?, &sum_of(&b21, &b22)?)
                        },
                    )
                },
            )
        },
    );
    let (p1, p2, p3) = (p1?, p2?, p3?);
    let (p4, p5, p6, p7) = (p4?, p5?, p6?, p7?);

    // C11 = P1 + P4 - P5 + P7        C12 = P3 + P5
    // C21 = P2 + P4                  C22 = P1 - P2 + P3 + P6
    for i in 0..m {
        let top = i * n;
        let bottom = (i + m) * n;
        for j in 0..m {
            let q = i * m + j;
            c[top + j] = p1[q] + p4[q] - p5[q] + p7[q];
            c[top + m + j] = p3[q] + p5[q];
            c[bottom + j] = p2[q] + p4[q];
            c[bottom + m + j] = p1[q] - p2[q] + p3[q] + p6[q];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_recursion_matches_the_direct_kernel() {
        let n = 8;
        let a: Vec<i64> = (0..(n * n) as i64).map(|i| i % 10).collect();
        let b: Vec<i64> = (0..(n * n) as i64).map(|i| (i * 3 + 2) % 10).collect();

        let mut expected = vec![0; n * n];
        direct_kernel(&a, &b, &mut expected, n);

        let mut c = vec![0; n * n];
        strassen(&a, &b, &mut c, n, 0).unwrap();
        assert_eq!(c, expected);
    }

    #[test]
    fn one_by_one_terminal() {
        let mut c = [0];
        strassen(&[6], &[7], &mut c, 1, 0).unwrap();
        assert_eq!(c, [42]);
    }
}
