//! Strided folds: reduce, reduce-by with missing values, and running
//! accumulation.

use strided_view::{stride_to_offset, Result};

use crate::kernel::StridedIndices;

/// Fold `n` elements of `x` into `init` with `f`.
///
/// Plain recursive folding with no numerical care; this is the ordinary
/// summation baseline when `f` is addition.
pub fn reduce<A: Copy, U>(
    n: usize,
    x: &[A],
    stride_x: isize,
    init: U,
    f: impl FnMut(U, A) -> U,
) -> Result<U> {
    reduce_ndarray(n, x, stride_x, stride_to_offset(n, stride_x), init, f)
}

/// [`reduce`] with an explicit offset.
pub fn reduce_ndarray<A: Copy, U>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    init: U,
    mut f: impl FnMut(U, A) -> U,
) -> Result<U> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    if let Some(start) = ix.unit_run() {
        return Ok(x[start..start + n].iter().fold(init, |acc, &v| f(acc, v)));
    }
    Ok(ix.fold(init, |acc, i| f(acc, x[i])))
}

/// Fold the elements for which `access(x[i], i)` returns a value.
///
/// Returns the folded value and the number of elements that were folded.
#[allow(clippy::too_many_arguments)]
pub fn reduce_by<A: Copy, U>(
    n: usize,
    x: &[A],
    stride_x: isize,
    init: U,
    f: impl FnMut(U, A) -> U,
    access: impl FnMut(A, usize) -> Option<A>,
) -> Result<(U, usize)> {
    reduce_by_ndarray(n, x, stride_x, stride_to_offset(n, stride_x), init, f, access)
}

/// [`reduce_by`] with an explicit offset.
#[allow(clippy::too_many_arguments)]
pub fn reduce_by_ndarray<A: Copy, U>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    init: U,
    mut f: impl FnMut(U, A) -> U,
    mut access: impl FnMut(A, usize) -> Option<A>,
) -> Result<(U, usize)> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let mut acc = init;
    let mut count = 0usize;
    for (k, i) in ix.enumerate() {
        if let Some(v) = access(x[i], k) {
            acc = f(acc, v);
            count += 1;
        }
    }
    Ok((acc, count))
}

/// Running fold: `y[i] = f(y[i-1], x[i])` with `y[-1] = init`.
#[allow(clippy::too_many_arguments)]
pub fn accumulate<A: Copy, U: Copy>(
    n: usize,
    init: U,
    x: &[A],
    stride_x: isize,
    y: &mut [U],
    stride_y: isize,
    f: impl FnMut(U, A) -> U,
) -> Result<()> {
    accumulate_ndarray(
        n,
        init,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        f,
    )
}

/// [`accumulate`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn accumulate_ndarray<A: Copy, U: Copy>(
    n: usize,
    init: U,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &mut [U],
    stride_y: isize,
    offset_y: isize,
    mut f: impl FnMut(U, A) -> U,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let mut acc = init;
    for (i, j) in ix.zip(iy) {
        acc = f(acc, x[i]);
        y[j] = acc;
    }
    Ok(())
}
