//! Buffer-extent and contiguity queries for `(shape, strides, offset)` views.
//!
//! Apart from [`check_bounds`] these are total functions: they never fail
//! or panic, and saturate at `isize::MIN`/`isize::MAX` when an extent
//! overflows. `shape` and `strides` are paired positionally; extra entries
//! in the longer slice are ignored.

use crate::auxiliary::iteration_order;
use crate::{Result, StridedError};

/// Total number of elements described by `shape`.
///
/// Saturates at `usize::MAX`.
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().fold(1usize, |n, &d| n.saturating_mul(d))
}

/// Minimum buffer index reachable by the view.
///
/// Each negative stride contributes `(extent - 1) * stride`. An empty view
/// (any zero extent) returns `offset`.
pub fn min_view_buffer_index(shape: &[usize], strides: &[isize], offset: isize) -> isize {
    min_max_view_buffer_index(shape, strides, offset).0
}

/// Maximum buffer index reachable by the view.
///
/// Each positive stride contributes `(extent - 1) * stride`. An empty view
/// (any zero extent) returns `offset`.
pub fn max_view_buffer_index(shape: &[usize], strides: &[isize], offset: isize) -> isize {
    min_max_view_buffer_index(shape, strides, offset).1
}

/// Both bounds of the view in a single pass: `(min, max)`.
///
/// Saturates on overflow; use [`checked_min_max_view_buffer_index`] to
/// detect it.
pub fn min_max_view_buffer_index(
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> (isize, isize) {
    if shape.iter().any(|&d| d == 0) {
        return (offset, offset);
    }
    let mut min = offset;
    let mut max = offset;
    for (&d, &s) in shape.iter().zip(strides) {
        let span = extent_span(d, s).unwrap_or(if s > 0 { isize::MAX } else { isize::MIN });
        if s > 0 {
            max = max.saturating_add(span);
        } else {
            min = min.saturating_add(span);
        }
    }
    (min, max)
}

/// [`min_max_view_buffer_index`], or `None` if either bound overflows
/// `isize`.
pub fn checked_min_max_view_buffer_index(
    shape: &[usize],
    strides: &[isize],
    offset: isize,
) -> Option<(isize, isize)> {
    if shape.iter().any(|&d| d == 0) {
        return Some((offset, offset));
    }
    shape
        .iter()
        .zip(strides)
        .try_fold((offset, offset), |(min, max), (&d, &s)| {
            let span = extent_span(d, s)?;
            if s > 0 {
                Some((min, max.checked_add(span)?))
            } else {
                Some((min.checked_add(span)?, max))
            }
        })
}

/// `(d - 1) * s`, the signed distance covered by one dimension.
#[inline]
fn extent_span(d: usize, s: isize) -> Option<isize> {
    isize::try_from(d.saturating_sub(1)).ok()?.checked_mul(s)
}

/// Check that every buffer index reachable by a view lies in `[0, len)`.
///
/// The bounds are [`checked_min_max_view_buffer_index`]; an overflowing
/// extent is reported as [`StridedError::OffsetOverflow`]. Empty views are
/// always in bounds.
pub fn check_bounds(len: usize, shape: &[usize], strides: &[isize], offset: isize) -> Result<()> {
    if shape.len() != strides.len() {
        return Err(StridedError::StrideLengthMismatch);
    }
    if shape.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let (min, max) = checked_min_max_view_buffer_index(shape, strides, offset)
        .ok_or(StridedError::OffsetOverflow)?;
    if min < 0 || max < 0 || max as usize >= len {
        return Err(StridedError::OutOfBounds { len, min, max });
    }
    Ok(())
}

/// Starting buffer index for a 1-D sequence of `n` elements with `stride`.
///
/// A negative stride starts at the far end so that `start + (n-1)*stride`
/// lands on 0.
#[inline]
pub fn stride_to_offset(n: usize, stride: isize) -> isize {
    if stride < 0 && n > 0 {
        extent_span(n, stride).map_or(isize::MAX, |span| span.saturating_neg())
    } else {
        0
    }
}

/// Buffer index of the first view element for a view whose lowest reachable
/// index is 0.
pub fn strides_to_offset(shape: &[usize], strides: &[isize]) -> isize {
    let mut offset = 0isize;
    for (&d, &s) in shape.iter().zip(strides) {
        if s < 0 && d > 0 {
            let span = extent_span(d, s).map_or(isize::MAX, |span| span.saturating_neg());
            offset = offset.saturating_add(span);
        }
    }
    offset
}

/// Whether a row-major walk of the view visits
/// `offset, offset + 1, ..., offset + numel - 1`.
///
/// Dimensions of extent 1 may carry any stride. An empty view is trivially
/// contiguous.
pub fn is_row_major_contiguous(shape: &[usize], strides: &[isize], offset: isize) -> bool {
    dense_walk(shape.iter().zip(strides).rev(), shape, offset)
}

/// Column-major counterpart of [`is_row_major_contiguous`].
pub fn is_column_major_contiguous(shape: &[usize], strides: &[isize], offset: isize) -> bool {
    dense_walk(shape.iter().zip(strides), shape, offset)
}

fn dense_walk<'a, I>(dims: I, shape: &[usize], offset: isize) -> bool
where
    I: Iterator<Item = (&'a usize, &'a isize)>,
{
    if numel(shape) == 0 {
        return true;
    }
    if offset < 0 {
        return false;
    }
    let mut expected = 1isize;
    for (&d, &s) in dims {
        if d == 1 {
            continue;
        }
        if s != expected {
            return false;
        }
        expected = expected.saturating_mul(isize::try_from(d).unwrap_or(isize::MAX));
    }
    true
}

/// Whether the view occupies one dense block of `numel` buffer elements in
/// any dimension order, possibly walked in reverse.
///
/// Strides of the non-trivial dimensions must share a sign.
pub fn is_contiguous(shape: &[usize], strides: &[isize], offset: isize) -> bool {
    if numel(shape) == 0 {
        return true;
    }
    if min_view_buffer_index(shape, strides, offset) < 0 {
        return false;
    }
    let mut dims: Vec<(usize, isize)> = shape
        .iter()
        .zip(strides)
        .filter(|(d, _)| **d > 1)
        .map(|(&d, &s)| (d, s))
        .collect();
    let signs: Vec<isize> = dims.iter().map(|&(_, s)| s).collect();
    if iteration_order(&signs) == 0 {
        return false;
    }
    dims.sort_by_key(|&(_, s)| s.unsigned_abs());
    let mut expected = 1usize;
    for (d, s) in dims {
        if s.unsigned_abs() != expected {
            return false;
        }
        expected = expected.saturating_mul(d);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_view_buffer_index() {
        assert_eq!(min_view_buffer_index(&[10, 10], &[10, 1], 10), 10);
        assert_eq!(max_view_buffer_index(&[10, 10], &[10, 1], 10), 109);
    }

    #[test]
    fn test_min_max_negative_strides() {
        // [[3, 2], [1, 0]] over a buffer of 4 starting at the last element
        assert_eq!(min_max_view_buffer_index(&[2, 2], &[-2, -1], 3), (0, 3));
        assert_eq!(min_max_view_buffer_index(&[2, 3], &[-3, 1], 3), (0, 5));
    }

    #[test]
    fn test_min_max_empty_and_scalar() {
        assert_eq!(min_max_view_buffer_index(&[0, 5], &[5, 1], 7), (7, 7));
        assert_eq!(min_max_view_buffer_index(&[], &[], 4), (4, 4));
        assert_eq!(min_max_view_buffer_index(&[5], &[0], 2), (2, 2));
    }

    #[test]
    fn test_min_max_saturates_on_overflow() {
        assert_eq!(
            min_max_view_buffer_index(&[3], &[isize::MAX], 0),
            (0, isize::MAX)
        );
        assert_eq!(
            min_max_view_buffer_index(&[3, 2], &[isize::MIN, -1], 5),
            (isize::MIN, 5)
        );
        assert_eq!(max_view_buffer_index(&[2, 2], &[isize::MAX, 1], 1), isize::MAX);
        assert_eq!(checked_min_max_view_buffer_index(&[3], &[isize::MAX], 0), None);
        assert_eq!(checked_min_max_view_buffer_index(&[2, 2], &[isize::MAX, 1], 0), None);
        assert_eq!(
            checked_min_max_view_buffer_index(&[10, 10], &[10, 1], 10),
            Some((10, 109))
        );
    }

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(6, &[2, 3], &[3, 1], 0).is_ok());
        assert!(check_bounds(6, &[2, 3], &[-3, 1], 3).is_ok());
        assert!(check_bounds(0, &[0, 3], &[3, 1], 100).is_ok());
        assert!(check_bounds(5, &[], &[], 4).is_ok());

        let err = check_bounds(5, &[2, 3], &[3, 1], 0).unwrap_err();
        assert_eq!(err, StridedError::OutOfBounds { len: 5, min: 0, max: 5 });
        let err = check_bounds(6, &[2, 3], &[-3, 1], 2).unwrap_err();
        assert_eq!(err, StridedError::OutOfBounds { len: 6, min: -1, max: 4 });
        let err = check_bounds(6, &[2, 3], &[3], 0).unwrap_err();
        assert_eq!(err, StridedError::StrideLengthMismatch);
        let err = check_bounds(6, &[3], &[isize::MAX], 0).unwrap_err();
        assert_eq!(err, StridedError::OffsetOverflow);
    }

    #[test]
    fn test_check_bounds_agrees_with_extent() {
        let cases: [(&[usize], &[isize], isize); 4] = [
            (&[4, 5], &[5, 1], 0),
            (&[4, 5], &[-5, 1], 15),
            (&[3, 1, 2], &[-1, 100, 3], 2),
            (&[7], &[0], 3),
        ];
        for (shape, strides, offset) in cases {
            let (min, max) = min_max_view_buffer_index(shape, strides, offset);
            let len = (max + 1) as usize;
            assert!(min >= 0);
            assert!(check_bounds(len, shape, strides, offset).is_ok());
            assert!(check_bounds(len - 1, shape, strides, offset).is_err());
        }
    }

    #[test]
    fn test_stride_to_offset() {
        assert_eq!(stride_to_offset(5, 1), 0);
        assert_eq!(stride_to_offset(5, -1), 4);
        assert_eq!(stride_to_offset(5, -3), 12);
        assert_eq!(stride_to_offset(0, -3), 0);
        assert_eq!(stride_to_offset(5, 0), 0);
        assert_eq!(stride_to_offset(3, isize::MIN), isize::MAX);
    }

    #[test]
    fn test_strides_to_offset() {
        assert_eq!(strides_to_offset(&[2, 3], &[3, 1]), 0);
        assert_eq!(strides_to_offset(&[2, 3], &[-3, 1]), 3);
        assert_eq!(strides_to_offset(&[2, 3], &[-3, -1]), 5);
        assert_eq!(strides_to_offset(&[0, 3], &[-3, -1]), 2);
    }

    #[test]
    fn test_row_major_contiguous() {
        assert!(is_row_major_contiguous(&[2, 3], &[3, 1], 0));
        assert!(is_row_major_contiguous(&[2, 3], &[3, 1], 4));
        assert!(!is_row_major_contiguous(&[2, 3], &[1, 2], 0));
        assert!(!is_row_major_contiguous(&[2, 3], &[-3, 1], 3));
        assert!(!is_row_major_contiguous(&[2, 3], &[4, 1], 0));
        assert!(!is_row_major_contiguous(&[2, 3], &[3, 1], -1));
    }

    #[test]
    fn test_row_major_contiguous_unit_dims() {
        // extent-1 dimensions never move the walk
        assert!(is_row_major_contiguous(&[1, 3, 1], &[99, 1, -7], 0));
        assert!(is_row_major_contiguous(&[0, 3], &[5, 5], 0));
        assert!(is_row_major_contiguous(&[], &[], 0));
    }

    #[test]
    fn test_column_major_contiguous() {
        assert!(is_column_major_contiguous(&[2, 3], &[1, 2], 0));
        assert!(!is_column_major_contiguous(&[2, 3], &[3, 1], 0));
    }

    #[test]
    fn test_is_contiguous() {
        assert!(is_contiguous(&[2, 3], &[3, 1], 0));
        assert!(is_contiguous(&[2, 3], &[1, 2], 0));
        assert!(is_contiguous(&[2, 3], &[-3, -1], 5));
        assert!(!is_contiguous(&[2, 3], &[-3, 1], 3));
        assert!(!is_contiguous(&[2, 3], &[6, 2], 0));
        assert!(!is_contiguous(&[2, 3], &[-3, -1], 4));
    }
}
