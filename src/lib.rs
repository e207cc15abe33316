//! Square integer matrix multiplication, three ways.
//!
//! I built this to find out where Strassen's algorithm actually starts
//! beating the classic triple loop once both get real threads. The answer
//! depends heavily on the recursion cutoff and the worker budget, so every
//! knob is an explicit parameter here and the bundled benchmark binary
//! sweeps them over power-of-two sizes.
//!
//! All three multipliers take flat row-major `&[i64]` slices, produce
//! bit-identical results for any thread count, and build their own worker
//! pool per call so a library user never touches a global.
//!
//! ## Usage
//!
//! ```
//! use strassen::direct_multiply;
//!
//! let a = vec![1, 2, 3, 4];
//! let b = vec![5, 6, 7, 8];
//! let mut c = vec![0i64; 4];
//!
//! direct_multiply(&a, &b, &mut c, 2, 1).unwrap();
//! assert_eq!(c, vec![19, 22, 43, 50]);
//! ```
//!
//! For power-of-two sizes, Strassen with a sensible cutoff:
//!
//! ```
//! use strassen::{matrix, recursive_multiply};
//!
//! let n = 8;
//! let a: Vec<i64> = (0..(n * n) as i64).collect();
//! let id = matrix::identity(n);
//! let mut c = vec![0i64; n * n];
//!
//! recursive_multiply(&a, &id, &mut c, n, 2, 4).unwrap();
//! assert_eq!(c, a);
//! ```
//!
//! ## What's inside
//!
//! - Direct triple-loop multiplier, rows spread across a worker pool
//! - Cache-blocked variant with a caller-chosen tile size
//! - Strassen's algorithm with fork-join parallel quadrant products
//! - A benchmark binary that sweeps sizes and writes JSON/CSV/text reports

pub mod blocked;
pub mod direct;
pub mod error;
pub mod matrix;
pub mod recursive;

pub use blocked::blocked_multiply;
pub use direct::direct_multiply;
pub use error::{Error, Result};
pub use recursive::recursive_multiply;
