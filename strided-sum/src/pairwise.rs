//! Cascade (pairwise) summation bodies.
//!
//! Inputs are at most [`PAIRWISE_BLOCKSIZE`] elements long and are summed
//! with eight interleaved accumulators. Longer inputs are split in two at a
//! multiple of eight and each half is summed recursively, giving
//! `O(log N)` error growth at the cost of ordinary summation.
//!
//! These bodies assume the operands were already bounds-checked.

use strided_traits::Real;

use crate::{PAIRWISE_BLOCKSIZE, UNROLL};

#[inline(always)]
fn at<T: Copy>(x: &[T], offset: isize, stride: isize, k: usize) -> T {
    x[(offset + k as isize * stride) as usize]
}

#[inline(always)]
fn split(n: usize) -> usize {
    let h = n / 2;
    h - h % UNROLL
}

#[inline(always)]
fn combine<T: Real>(s: &[T; UNROLL]) -> T {
    ((s[0] + s[1]) + (s[2] + s[3])) + ((s[4] + s[5]) + (s[6] + s[7]))
}

/// Pairwise sum of `n > 0` elements.
pub(crate) fn sum<T: Real>(n: usize, x: &[T], stride: isize, offset: isize) -> T {
    if n < UNROLL {
        let mut s = T::zero();
        for k in 0..n {
            s = s + at(x, offset, stride, k);
        }
        return s;
    }
    if n <= PAIRWISE_BLOCKSIZE {
        let mut s = [T::zero(); UNROLL];
        for (j, sj) in s.iter_mut().enumerate() {
            *sj = at(x, offset, stride, j);
        }
        let tail = n - n % UNROLL;
        let mut k = UNROLL;
        while k < tail {
            for (j, sj) in s.iter_mut().enumerate() {
                *sj = *sj + at(x, offset, stride, k + j);
            }
            k += UNROLL;
        }
        let mut total = combine(&s);
        while k < n {
            total = total + at(x, offset, stride, k);
            k += 1;
        }
        return total;
    }
    let h = split(n);
    sum(h, x, stride, offset) + sum(n - h, x, stride, offset + h as isize * stride)
}

/// Pairwise sum of the non-NaN elements among `n > 0`, with their count.
pub(crate) fn nansum<T: Real>(n: usize, x: &[T], stride: isize, offset: isize) -> (T, usize) {
    let mut count = 0usize;
    if n < UNROLL {
        let mut s = T::zero();
        for k in 0..n {
            let v = at(x, offset, stride, k);
            if !v.is_nan() {
                s = s + v;
                count += 1;
            }
        }
        return (s, count);
    }
    if n <= PAIRWISE_BLOCKSIZE {
        let mut s = [T::zero(); UNROLL];
        for (j, sj) in s.iter_mut().enumerate() {
            let v = at(x, offset, stride, j);
            if !v.is_nan() {
                *sj = v;
                count += 1;
            }
        }
        let tail = n - n % UNROLL;
        let mut k = UNROLL;
        while k < tail {
            for (j, sj) in s.iter_mut().enumerate() {
                let v = at(x, offset, stride, k + j);
                if !v.is_nan() {
                    *sj = *sj + v;
                    count += 1;
                }
            }
            k += UNROLL;
        }
        let mut total = combine(&s);
        while k < n {
            let v = at(x, offset, stride, k);
            if !v.is_nan() {
                total = total + v;
                count += 1;
            }
            k += 1;
        }
        return (total, count);
    }
    let h = split(n);
    let (a, ca) = nansum(h, x, stride, offset);
    let (b, cb) = nansum(n - h, x, stride, offset + h as isize * stride);
    (a + b, ca + cb)
}

/// Pairwise cumulative sum of `n > 0` elements seeded with `init`.
///
/// Each block keeps a local running total `s` and writes `init + s`; the
/// second half of a split is seeded with the last value written by the first.
#[allow(clippy::too_many_arguments)]
pub(crate) fn cusum<T: Real>(
    n: usize,
    init: T,
    x: &[T],
    stride_x: isize,
    offset_x: isize,
    y: &mut [T],
    stride_y: isize,
    offset_y: isize,
) {
    if n <= PAIRWISE_BLOCKSIZE {
        let mut s = T::zero();
        for k in 0..n {
            s = s + at(x, offset_x, stride_x, k);
            y[(offset_y + k as isize * stride_y) as usize] = init + s;
        }
        return;
    }
    let h = split(n);
    cusum(h, init, x, stride_x, offset_x, y, stride_y, offset_y);
    let last = offset_y + (h as isize - 1) * stride_y;
    let seed = y[last as usize];
    cusum(
        n - h,
        seed,
        x,
        stride_x,
        offset_x + h as isize * stride_x,
        y,
        stride_y,
        last + stride_y,
    );
}
