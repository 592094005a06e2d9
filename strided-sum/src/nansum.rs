//! NaN-skipping strided sums.
//!
//! Every routine returns `(sum, count)`, where `count` is the number of
//! non-NaN elements folded, so a mean needs no second pass. `n == 0`
//! returns `(0, 0)`. A zero stride over a NaN value also yields `(0, 0)`;
//! over any other value it yields `(n * value, n)`.

use strided_kernel::StridedIndices;
use strided_traits::Real;
use strided_view::{stride_to_offset, Result};

use crate::accumulator::{Accumulator, KahanBabuska, Klein, NanSkipping, Ordinary};
use crate::pairwise;

enum Pass<T> {
    /// Result known without a pass (empty or zero stride).
    Done(T, usize),
    /// A full strided pass is required.
    Full(StridedIndices),
}

fn prelude<T: Real>(n: usize, x: &[T], stride_x: isize, offset_x: isize) -> Result<Pass<T>> {
    let idx = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let Some(first) = idx.first() else {
        return Ok(Pass::Done(T::zero(), 0));
    };
    if stride_x == 0 {
        let v = x[first];
        if v.is_nan() {
            return Ok(Pass::Done(T::zero(), 0));
        }
        return Ok(Pass::Done(T::scale_count(v, n), n));
    }
    Ok(Pass::Full(idx))
}

fn nansum_with<T: Real, A: Accumulator<T>>(
    n: usize,
    x: &[T],
    stride_x: isize,
    offset_x: isize,
) -> Result<(T, usize)> {
    let idx = match prelude(n, x, stride_x, offset_x)? {
        Pass::Full(idx) => idx,
        Pass::Done(sum, count) => return Ok((sum, count)),
    };
    let mut acc = NanSkipping::<A>::zero();
    for i in idx {
        acc.push(x[i]);
    }
    Ok(acc.finish_with_count())
}

fn pairwise_nansum<T: Real>(
    n: usize,
    x: &[T],
    stride_x: isize,
    offset_x: isize,
) -> Result<(T, usize)> {
    match prelude(n, x, stride_x, offset_x)? {
        Pass::Full(_) => Ok(pairwise::nansum(n, x, stride_x, offset_x)),
        Pass::Done(sum, count) => Ok((sum, count)),
    }
}

macro_rules! nansum_variant {
    ($(#[$doc:meta])* $name:ident, $ndarray:ident, $imp:expr) => {
        $(#[$doc])*
        pub fn $name<T: Real>(n: usize, x: &[T], stride_x: isize) -> Result<(T, usize)> {
            $ndarray(n, x, stride_x, stride_to_offset(n, stride_x))
        }

        #[doc = concat!("[`", stringify!($name), "`] with an explicit offset.")]
        pub fn $ndarray<T: Real>(
            n: usize,
            x: &[T],
            stride_x: isize,
            offset_x: isize,
        ) -> Result<(T, usize)> {
            ($imp)(n, x, stride_x, offset_x)
        }
    };
}

nansum_variant!(
    /// NaN-skipping ordinary recursive sum.
    nansumors,
    nansumors_ndarray,
    nansum_with::<T, Ordinary<T>>
);
nansum_variant!(
    /// NaN-skipping Kahan–Babuška sum.
    nansumkbn,
    nansumkbn_ndarray,
    nansum_with::<T, KahanBabuska<T>>
);
nansum_variant!(
    /// NaN-skipping second-order compensated sum.
    nansumkbn2,
    nansumkbn2_ndarray,
    nansum_with::<T, Klein<T>>
);
nansum_variant!(
    /// NaN-skipping pairwise sum.
    nansumpw,
    nansumpw_ndarray,
    pairwise_nansum::<T>
);
nansum_variant!(
    /// NaN-skipping sum using the default algorithm (pairwise).
    nansum,
    nansum_ndarray,
    pairwise_nansum::<T>
);
