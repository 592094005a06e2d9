//! 1-D strided iteration engine.
//!
//! Every kernel in this crate walks its operands with [`StridedIndices`].
//! Operands are validated against their buffer lengths before the first
//! element is touched, so a failing call never performs partial writes.

use strided_view::{check_bounds, stride_to_offset, Result};

/// Iterator over the `n` buffer indices `offset, offset + stride, ...`.
///
/// Construction checks that every index lies in `[0, len)`, so the
/// yielded indices can be used directly on a slice of length `len`.
#[derive(Debug, Clone)]
pub struct StridedIndices {
    next: isize,
    stride: isize,
    remaining: usize,
}

impl StridedIndices {
    /// Indices for `n` elements of a buffer of length `len`.
    pub fn new(len: usize, n: usize, stride: isize, offset: isize) -> Result<Self> {
        if n > 0 {
            check_bounds(len, &[n], &[stride], offset)?;
        }
        Ok(Self {
            next: offset,
            stride,
            remaining: n,
        })
    }

    /// Indices for the simple calling form, where a negative stride starts
    /// at the far end of the buffer.
    pub fn from_stride(len: usize, n: usize, stride: isize) -> Result<Self> {
        Self::new(len, n, stride, stride_to_offset(n, stride))
    }

    /// The first index, or `None` if empty.
    #[inline]
    pub fn first(&self) -> Option<usize> {
        (self.remaining > 0).then_some(self.next as usize)
    }

    /// Whether the `n` elements form a unit-stride run, returning its start.
    #[inline]
    pub(crate) fn unit_run(&self) -> Option<usize> {
        (self.stride == 1 && self.remaining > 0).then_some(self.next as usize)
    }
}

impl Iterator for StridedIndices {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.next as usize;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next += self.stride;
        }
        Some(out)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedIndices {}

#[cfg(test)]
mod tests {
    use super::*;
    use strided_view::StridedError;

    #[test]
    fn test_strided_indices_positive() {
        let idx: Vec<usize> = StridedIndices::new(10, 4, 2, 1).unwrap().collect();
        assert_eq!(idx, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_strided_indices_negative() {
        let idx: Vec<usize> = StridedIndices::from_stride(7, 4, -2).unwrap().collect();
        assert_eq!(idx, vec![6, 4, 2, 0]);
    }

    #[test]
    fn test_strided_indices_zero_stride() {
        let idx: Vec<usize> = StridedIndices::new(3, 4, 0, 2).unwrap().collect();
        assert_eq!(idx, vec![2, 2, 2, 2]);
        assert_eq!(StridedIndices::from_stride(1, 5, 0).unwrap().len(), 5);
    }

    #[test]
    fn test_strided_indices_empty_ignores_bounds() {
        let mut it = StridedIndices::new(0, 0, 5, 100).unwrap();
        assert_eq!(it.first(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_strided_indices_out_of_bounds() {
        let err = StridedIndices::new(6, 4, 2, 0).unwrap_err();
        match err {
            StridedError::OutOfBounds { len: 6, min: 0, max: 6 } => {}
            _ => panic!("expected OutOfBounds, got {err:?}"),
        }
        assert!(StridedIndices::new(6, 2, -1, 0).is_err());
    }

    #[test]
    fn test_unit_run() {
        assert_eq!(StridedIndices::new(8, 3, 1, 2).unwrap().unit_run(), Some(2));
        assert_eq!(StridedIndices::new(8, 3, 2, 2).unwrap().unit_run(), None);
        assert_eq!(StridedIndices::new(8, 0, 1, 2).unwrap().unit_run(), None);
    }
}
