//! Conversions between subscripts, view linear indices and buffer indices.
//!
//! - A *subscript* is one index per dimension.
//! - A *view index* is the position of an element in a row-major or
//!   column-major walk of the view (`0..numel`).
//! - A *buffer index* is the flat position in the underlying buffer.

use crate::auxiliary::dims_by_decreasing_stride;
use crate::index::{resolve_index, IndexMode};
use crate::offsets::{min_max_view_buffer_index, numel};
use crate::{Result, StridedError};

/// Memory layout convention used to linearize subscripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Last dimension varies fastest.
    #[default]
    RowMajor,
    /// First dimension varies fastest.
    ColumnMajor,
}

fn check_rank(shape: &[usize], strides: &[isize]) -> Result<()> {
    if shape.len() != strides.len() {
        return Err(StridedError::StrideLengthMismatch);
    }
    Ok(())
}

/// Resolve a view index against `0..numel(shape)`.
fn resolve_view_index(shape: &[usize], idx: isize, mode: IndexMode) -> Result<usize> {
    let max = numel(shape) as isize - 1;
    resolve_index(idx, max, mode)
}

/// Split an in-range view index into subscripts, calling `f(dim, sub)` once
/// per dimension.
fn decompose(shape: &[usize], order: Order, mut idx: usize, mut f: impl FnMut(usize, usize)) {
    match order {
        Order::RowMajor => {
            for k in (0..shape.len()).rev() {
                f(k, idx % shape[k]);
                idx /= shape[k];
            }
        }
        Order::ColumnMajor => {
            for (k, &d) in shape.iter().enumerate() {
                f(k, idx % d);
                idx /= d;
            }
        }
    }
}

/// Buffer index of a subscript tuple.
///
/// Each subscript is resolved against its dimension with
/// `modes[i % modes.len()]` (an empty `modes` means [`IndexMode::Throw`]).
/// When `offset == 0` a negative stride is taken to describe a buffer that
/// starts at the view's first element, so it contributes `-j * stride`.
pub fn sub2ind(
    shape: &[usize],
    strides: &[isize],
    offset: isize,
    subscripts: &[isize],
    modes: &[IndexMode],
) -> Result<isize> {
    check_rank(shape, strides)?;
    if subscripts.len() != shape.len() {
        return Err(StridedError::RankMismatch(shape.len(), subscripts.len()));
    }
    let mut idx = offset;
    for (i, ((&d, &s), &sub)) in shape.iter().zip(strides).zip(subscripts).enumerate() {
        let mode = if modes.is_empty() {
            IndexMode::Throw
        } else {
            modes[i % modes.len()]
        };
        let j = resolve_index(sub, d as isize - 1, mode)? as isize;
        let step = j.checked_mul(s).ok_or(StridedError::OffsetOverflow)?;
        idx = if s < 0 && offset == 0 {
            idx.checked_sub(step)
        } else {
            idx.checked_add(step)
        }
        .ok_or(StridedError::OffsetOverflow)?;
    }
    Ok(idx)
}

/// Subscripts of the element at view index `idx`.
pub fn ind2sub(shape: &[usize], order: Order, idx: isize, mode: IndexMode) -> Result<Vec<usize>> {
    let i = resolve_view_index(shape, idx, mode)?;
    let mut out = vec![0usize; shape.len()];
    decompose(shape, order, i, |k, sub| out[k] = sub);
    Ok(out)
}

/// Buffer index of the element at view index `idx`.
pub fn vind2bind(
    shape: &[usize],
    strides: &[isize],
    offset: isize,
    order: Order,
    idx: isize,
    mode: IndexMode,
) -> Result<isize> {
    check_rank(shape, strides)?;
    let i = resolve_view_index(shape, idx, mode)?;
    let mut ind = Some(offset);
    decompose(shape, order, i, |k, sub| {
        ind = ind
            .and_then(|acc| (sub as isize).checked_mul(strides[k]).map(|step| (acc, step)))
            .and_then(|(acc, step)| acc.checked_add(step));
    });
    ind.ok_or(StridedError::OffsetOverflow)
}

/// View index of the element stored at buffer index `idx`.
///
/// `idx` is resolved with `mode` against `[0, max]`, where `max` is the
/// largest buffer index the view touches. Indices below the view's minimum
/// buffer index, or falling between visited elements, are
/// [`StridedError::UnreachableIndex`]. For broadcast (zero-stride)
/// dimensions the first matching subscript is reported.
pub fn bind2vind(
    shape: &[usize],
    strides: &[isize],
    offset: isize,
    order: Order,
    idx: isize,
    mode: IndexMode,
) -> Result<usize> {
    check_rank(shape, strides)?;
    if numel(shape) == 0 {
        return Err(StridedError::IndexOutOfBounds { index: idx, max: -1 });
    }
    let (min, max) = min_max_view_buffer_index(shape, strides, offset);
    let idx = resolve_index(idx, max, mode)? as isize;

    let mut rem = idx - min;
    if rem < 0 {
        return Err(StridedError::UnreachableIndex(idx));
    }
    let mut subs = vec![0usize; shape.len()];
    for k in dims_by_decreasing_stride(strides) {
        let s = strides[k].unsigned_abs() as isize;
        if s == 0 || shape[k] == 1 {
            continue;
        }
        let q = rem / s;
        if q >= shape[k] as isize {
            return Err(StridedError::UnreachableIndex(idx));
        }
        rem -= q * s;
        subs[k] = if strides[k] > 0 {
            q as usize
        } else {
            shape[k] - 1 - q as usize
        };
    }
    if rem != 0 {
        return Err(StridedError::UnreachableIndex(idx));
    }

    let mut vind = 0usize;
    match order {
        Order::RowMajor => {
            for (&sub, &d) in subs.iter().zip(shape) {
                vind = vind * d + sub;
            }
        }
        Order::ColumnMajor => {
            for (&sub, &d) in subs.iter().zip(shape).rev() {
                vind = vind * d + sub;
            }
        }
    }
    Ok(vind)
}
