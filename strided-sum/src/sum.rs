//! Strided sums.
//!
//! | Function  | Algorithm                              |
//! |-----------|----------------------------------------|
//! | `sumors`  | ordinary recursive summation           |
//! | `sumkbn`  | Kahan–Babuška compensated summation    |
//! | `sumkbn2` | second-order (Klein) compensated       |
//! | `sumpw`   | pairwise (cascade) summation           |
//! | `sum`     | default, currently pairwise            |
//!
//! `n == 0` returns zero. A zero stride is folded to `n * x[offset]`.

use strided_kernel::StridedIndices;
use strided_traits::Real;
use strided_view::{stride_to_offset, Result};

use crate::accumulator::{Accumulator, KahanBabuska, Klein, Ordinary};
use crate::pairwise;

fn sum_with<T: Real, A: Accumulator<T>>(
    n: usize,
    x: &[T],
    stride_x: isize,
    offset_x: isize,
) -> Result<T> {
    let idx = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let Some(first) = idx.first() else {
        return Ok(T::zero());
    };
    if stride_x == 0 {
        return Ok(T::scale_count(x[first], n));
    }
    let mut acc = A::zero();
    for i in idx {
        acc.push(x[i]);
    }
    Ok(acc.finish())
}

fn pairwise_sum<T: Real>(n: usize, x: &[T], stride_x: isize, offset_x: isize) -> Result<T> {
    let idx = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let Some(first) = idx.first() else {
        return Ok(T::zero());
    };
    if stride_x == 0 {
        return Ok(T::scale_count(x[first], n));
    }
    Ok(pairwise::sum(n, x, stride_x, offset_x))
}

macro_rules! sum_variant {
    ($(#[$doc:meta])* $name:ident, $ndarray:ident, $imp:expr) => {
        $(#[$doc])*
        pub fn $name<T: Real>(n: usize, x: &[T], stride_x: isize) -> Result<T> {
            $ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
        }

        #[doc = concat!("[`", stringify!($name), "`] with an explicit offset.")]
        pub fn $ndarray<T: Real>(n: usize, x: &[T], stride_x: isize, offset_x: isize) -> Result<T> {
            ($imp)(n, x, stride_x, offset_x)
        }
    };
}

sum_variant!(
    /// Ordinary recursive sum of `n` strided elements.
    sumors,
    sumors_ndarray,
    sum_with::<T, Ordinary<T>>
);
sum_variant!(
    /// Kahan–Babuška compensated sum of `n` strided elements.
    sumkbn,
    sumkbn_ndarray,
    sum_with::<T, KahanBabuska<T>>
);
sum_variant!(
    /// Second-order compensated sum of `n` strided elements.
    sumkbn2,
    sumkbn2_ndarray,
    sum_with::<T, Klein<T>>
);
sum_variant!(
    /// Pairwise sum of `n` strided elements.
    sumpw,
    sumpw_ndarray,
    pairwise_sum::<T>
);
sum_variant!(
    /// Sum of `n` strided elements using the default algorithm.
    sum,
    sum_ndarray,
    pairwise_sum::<T>
);
