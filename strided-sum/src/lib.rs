//! Numerically robust strided summation.
//!
//! Four algorithms, each available as a plain sum, a cumulative sum and a
//! NaN-skipping sum, in both the simple and `_ndarray` calling forms:
//!
//! | Suffix | Algorithm | Error bound |
//! |--------|-----------|-------------|
//! | `ors`  | ordinary recursive summation | `O(N ε)` |
//! | `kbn`  | Kahan–Babuška (Neumaier) compensation | `O(ε)` + `O(N ε²)` |
//! | `kbn2` | second-order compensation (Klein, 2005) | `O(ε)` + `O(N ε³)` |
//! | `pw`   | pairwise / cascade | `O(log N ε)` |
//!
//! The unsuffixed `sum`, `cusum` and `nansum` use pairwise summation.
//!
//! All routines are generic over [`Real`], so `f32` inputs are accumulated
//! with every intermediate rounded to single precision.
//!
//! # Example
//!
//! ```
//! use strided_sum::{cusumkbn, nansum, sumkbn2};
//!
//! let x = [1.0f64, 1e100, 1.0, -1e100];
//! assert_eq!(sumkbn2(4, &x, 1).unwrap(), 2.0);
//!
//! let mut y = [0.0; 3];
//! cusumkbn(3, 0.0, &[1.0, -2.0, 2.0], 1, &mut y, 1).unwrap();
//! assert_eq!(y, [1.0, -1.0, 1.0]);
//!
//! assert_eq!(nansum(3, &[1.0, f64::NAN, 2.0], 1).unwrap(), (3.0, 2));
//! ```

pub mod accumulator;
pub mod cusum;
pub mod nansum;
mod pairwise;
pub mod sum;

pub use accumulator::{Accumulator, KahanBabuska, Klein, NanSkipping, Ordinary};
pub use cusum::{
    cusum, cusum_ndarray, cusumkbn, cusumkbn2, cusumkbn2_ndarray, cusumkbn_ndarray, cusumors,
    cusumors_ndarray, cusumpw, cusumpw_ndarray,
};
pub use nansum::{
    nansum, nansum_ndarray, nansumkbn, nansumkbn2, nansumkbn2_ndarray, nansumkbn_ndarray,
    nansumors, nansumors_ndarray, nansumpw, nansumpw_ndarray,
};
pub use strided_traits::Real;
pub use strided_view::{Result, StridedError};
pub use sum::{
    sum, sum_ndarray, sumkbn, sumkbn2, sumkbn2_ndarray, sumkbn_ndarray, sumors, sumors_ndarray,
    sumpw, sumpw_ndarray,
};

/// Largest input summed directly by the pairwise routines; longer inputs
/// are split in two.
pub const PAIRWISE_BLOCKSIZE: usize = 128;

/// Number of interleaved accumulators in a pairwise block.
pub const UNROLL: usize = 8;
