//! Helpers for row-major square matrix buffers.
//!
//! Every algorithm in this crate works on flat `&[i64]` slices of length
//! `n * n`, indexed as `m[row * n + col]`. The helpers here cover what the
//! algorithms share: fallible buffer allocation, elementwise sums and
//! differences, and the quadrant copies used by the recursive multiplier.

use crate::error::Result;

/// Build the `n`x`n` identity matrix.
///
/// # Example
///
/// ```
/// use strassen::matrix::identity;
///
/// assert_eq!(identity(2), vec![1, 0, 0, 1]);
/// ```
pub fn identity(n: usize) -> Vec<i64> {
    let mut id = vec![0; n * n];
    for i in 0..n {
        id[i * n + i] = 1;
    }
    id
}

/// Allocate a zeroed buffer of `len` elements, reporting allocation failure
/// instead of aborting.
///
/// The Strassen recursion allocates a burst of temporaries at every level,
/// so running out of memory mid-multiply is a realistic failure. `Vec`'s
/// infallible growth would abort the process; `try_reserve_exact` lets the
/// caller unwind with an error instead.
pub(crate) fn try_buffer(len: usize) -> Result<Vec<i64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Allocate the elementwise sum `a + b`.
pub(crate) fn sum_of(a: &[i64], b: &[i64]) -> Result<Vec<i64>> {
    debug_assert_eq!(a.len(), b.len());
    let mut out = Vec::new();
    out.try_reserve_exact(a.len())?;
    out.extend(a.iter().zip(b).map(|(x, y)| x + y));
    Ok(out)
}

/// Allocate the elementwise difference `a - b`.
pub(crate) fn diff_of(a: &[i64], b: &[i64]) -> Result<Vec<i64>> {
    debug_assert_eq!(a.len(), b.len());
    let mut out = Vec::new();
    out.try_reserve_exact(a.len())?;
    out.extend(a.iter().zip(b).map(|(x, y)| x - y));
    Ok(out)
}

/// Copy the four `m`x`m` quadrants of an `n`x`n` matrix (`m = n / 2`) into
/// fresh buffers, returned in `[top-left, top-right, bottom-left,
/// bottom-right]` order.
pub(crate) fn quadrants(src: &[i64], n: usize) -> Result<[Vec<i64>; 4]> {
    let m = n / 2;
    let mut tl = try_buffer(m * m)?;
    let mut tr = try_buffer(m * m)?;
    let mut bl = try_buffer(m * m)?;
    let mut br = try_buffer(m * m)?;
    for i in 0..m {
        let top = i * n;
        let bottom = (i + m) * n;
        let out = i * m;
        tl[out..out + m].copy_from_slice(&src[top..top + m]);
        tr[out..out + m].copy_from_slice(&src[top + m..top + n]);
        bl[out..out + m].copy_from_slice(&src[bottom..bottom + m]);
        br[out..out + m].copy_from_slice(&src[bottom + m..bottom + n]);
    }
    Ok([tl, tr, bl, br])
}

/// Panic with a descriptive message unless `a`, `b` and `c` all hold
/// exactly `n * n` elements.
pub(crate) fn check_dims(a: &[i64], b: &[i64], c: &[i64], n: usize) {
    assert_eq!(a.len(), n * n, "A: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(b.len(), n * n, "B: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(c.len(), n * n, "C: expected {}x{}={} elements", n, n, n * n);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_ones_on_the_diagonal() {
        let id = identity(3);
        assert_eq!(id, vec![1, 0, 0, 0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn try_buffer_is_zeroed() {
        let buf = try_buffer(6).unwrap();
        assert_eq!(buf, vec![0; 6]);
    }

    #[test]
    fn sum_and_diff_are_elementwise() {
        let a = [1, 2, 3, 4];
        let b = [10, 20, 30, 40];
        assert_eq!(sum_of(&a, &b).unwrap(), vec![11, 22, 33, 44]);
        assert_eq!(diff_of(&a, &b).unwrap(), vec![-9, -18, -27, -36]);
    }

    #[test]
    fn quadrants_split_a_4x4() {
        #[rustfmt::skip]
        let src = [
             1,  2,  3,  4,
             5,  6,  7,  8,
             9, 10, 11, 12,
            13, 14, 15, 16,
        ];
        let [tl, tr, bl, br] = quadrants(&src, 4).unwrap();
        assert_eq!(tl, vec![1, 2, 5, 6]);
        assert_eq!(tr, vec![3, 4, 7, 8]);
        assert_eq!(bl, vec![9, 10, 13, 14]);
        assert_eq!(br, vec![11, 12, 15, 16]);
    }

    #[test]
    fn quadrants_scatter_back_rebuilds_an_8x8() {
        let n = 8;
        let m = n / 2;
        let src: Vec<i64> = (1..=(n * n) as i64).collect();
        let [tl, tr, bl, br] = quadrants(&src, n).unwrap();

        // Write the four parts back through the same offsets the
        // recursive recombination uses.
        let mut rebuilt = vec![0; n * n];
        for i in 0..m {
            let top = i * n;
            let bottom = (i + m) * n;
            for j in 0..m {
                let q = i * m + j;
                rebuilt[top + j] = tl[q];
                rebuilt[top + m + j] = tr[q];
                rebuilt[bottom + j] = bl[q];
                rebuilt[bottom + m + j] = br[q];
            }
        }
        assert_eq!(rebuilt, src);
    }
}
