//! Strided cumulative sums.
//!
//! `y[i]` receives `init + x[0] + ... + x[i]`, computed with the named
//! algorithm; output strides may differ from input strides and may be
//! negative (results written back-to-front). `n == 0` leaves `y` untouched.

use strided_kernel::StridedIndices;
use strided_traits::Real;
use strided_view::{stride_to_offset, Result};

use crate::accumulator::{Accumulator, KahanBabuska, Klein, Ordinary};
use crate::pairwise;

#[allow(clippy::too_many_arguments)]
fn cusum_with<T: Real, A: Accumulator<T>>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: isize,
    y: &mut [T],
    stride_y: isize,
    offset_y: isize,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let mut acc = A::seeded(init);
    for (i, j) in ix.zip(iy) {
        acc.push(x[i]);
        y[j] = acc.value();
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn pairwise_cusum<T: Real>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: isize,
    y: &mut [T],
    stride_y: isize,
    offset_y: isize,
) -> Result<()> {
    StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    if n > 0 {
        pairwise::cusum(n, init, x, stride_x, offset_x, y, stride_y, offset_y);
    }
    Ok(())
}

macro_rules! cusum_variant {
    ($(#[$doc:meta])* $name:ident, $ndarray:ident, $imp:expr) => {
        $(#[$doc])*
        pub fn $name<T: Real>(
            n: usize,
            init: T,
            x: &[T],
            stride_x: isize,
            y: &mut [T],
            stride_y: isize,
        ) -> Result<()> {
            $ndarray(
                n,
                init,
                x,
                stride_x,
                stride_to_offset(n, stride_x),
                y,
                stride_y,
                stride_to_offset(n, stride_y),
            )
        }

        #[doc = concat!("[`", stringify!($name), "`] with explicit offsets.")]
        #[allow(clippy::too_many_arguments)]
        pub fn $ndarray<T: Real>(
            n: usize,
            init: T,
            x: &[T],
            stride_x: isize,
            offset_x: isize,
            y: &mut [T],
            stride_y: isize,
            offset_y: isize,
        ) -> Result<()> {
            ($imp)(n, init, x, stride_x, offset_x, y, stride_y, offset_y)
        }
    };
}

cusum_variant!(
    /// Cumulative sum using ordinary recursive summation.
    cusumors,
    cusumors_ndarray,
    cusum_with::<T, Ordinary<T>>
);
cusum_variant!(
    /// Cumulative sum using Kahan–Babuška compensated summation.
    cusumkbn,
    cusumkbn_ndarray,
    cusum_with::<T, KahanBabuska<T>>
);
cusum_variant!(
    /// Cumulative sum using second-order (Klein) compensated summation.
    cusumkbn2,
    cusumkbn2_ndarray,
    cusum_with::<T, Klein<T>>
);
cusum_variant!(
    /// Cumulative sum using pairwise summation.
    cusumpw,
    cusumpw_ndarray,
    pairwise_cusum::<T>
);
cusum_variant!(
    /// Cumulative sum using the default algorithm (pairwise).
    cusum,
    cusum_ndarray,
    pairwise_cusum::<T>
);
