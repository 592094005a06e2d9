//! Validated strided views over borrowed buffers.
//!
//! - [`StridedView`]: immutable `(data, dims, strides, offset)` descriptor
//! - [`StridedViewMut`]: mutable counterpart
//!
//! Construction checks, via the buffer-extent primitives, that every element
//! the view can reach lies inside the borrowed slice. Element access after
//! construction therefore only has to validate subscripts.

use std::sync::Arc;

use crate::index::IndexMode;
use crate::offsets::{check_bounds, numel};
use crate::subscripts::{vind2bind, Order};
use crate::{Result, StridedError};

/// Column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    dense_strides(dims.iter())
}

/// Row-major strides (last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let mut strides = dense_strides(dims.iter().rev());
    strides.reverse();
    strides
}

/// Running product of the extents in walk order, saturating at `isize::MAX`.
fn dense_strides<'d>(dims: impl Iterator<Item = &'d usize>) -> Vec<isize> {
    dims.scan(1isize, |step, &d| {
        let stride = *step;
        *step = step.saturating_mul(isize::try_from(d).unwrap_or(isize::MAX));
        Some(stride)
    })
    .collect()
}

/// Dense strides for `dims` in the given order.
pub fn shape_to_strides(dims: &[usize], order: Order) -> Vec<isize> {
    match order {
        Order::RowMajor => row_major_strides(dims),
        Order::ColumnMajor => col_major_strides(dims),
    }
}

/// Buffer index of `indices`, checking rank and per-dimension bounds.
fn subscript_offset(
    dims: &[usize],
    strides: &[isize],
    offset: isize,
    indices: &[usize],
) -> Result<usize> {
    if indices.len() != dims.len() {
        return Err(StridedError::RankMismatch(indices.len(), dims.len()));
    }
    let mut idx = offset;
    for ((&i, &d), &s) in indices.iter().zip(dims).zip(strides) {
        if i >= d {
            return Err(StridedError::IndexOutOfBounds {
                index: i as isize,
                max: d as isize - 1,
            });
        }
        idx += i as isize * s;
    }
    Ok(idx as usize)
}

// ============================================================================
// Buffer index iteration
// ============================================================================

/// Iterator over the buffer indices of a view in row-major order.
///
/// Advances an odometer over the subscripts, so each step costs O(1)
/// amortized.
#[derive(Debug, Clone)]
pub struct BufferIndices {
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    subs: Vec<usize>,
    current: isize,
    remaining: usize,
}

impl BufferIndices {
    fn new(dims: Arc<[usize]>, strides: Arc<[isize]>, offset: isize) -> Self {
        let remaining = numel(&dims);
        let subs = vec![0; dims.len()];
        Self {
            dims,
            strides,
            subs,
            current: offset,
            remaining,
        }
    }
}

impl Iterator for BufferIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.current as usize;
        self.remaining -= 1;
        if self.remaining > 0 {
            for k in (0..self.dims.len()).rev() {
                self.subs[k] += 1;
                self.current += self.strides[k];
                if self.subs[k] < self.dims[k] {
                    break;
                }
                self.current -= self.strides[k] * self.dims[k] as isize;
                self.subs[k] = 0;
            }
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BufferIndices {}

// ============================================================================
// StridedView
// ============================================================================

/// Immutable strided view over a borrowed slice.
pub struct StridedView<'a, T> {
    data: &'a [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T> std::fmt::Debug for StridedView<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedView<'a, T> {
    /// Create a new immutable strided view from a borrowed slice.
    pub fn new(data: &'a [T], dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        check_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    /// Dense view of `data` with the given order.
    pub fn dense(data: &'a [T], dims: &[usize], order: Order) -> Result<Self> {
        Self::new(data, dims, &shape_to_strides(dims, order), 0)
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        numel(&self.dims)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// The full underlying slice.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Buffer index of the element at `indices`.
    pub fn buffer_index(&self, indices: &[usize]) -> Result<usize> {
        subscript_offset(&self.dims, &self.strides, self.offset, indices)
    }

    /// Buffer indices of all elements in row-major order.
    pub fn buffer_indices(&self) -> BufferIndices {
        BufferIndices::new(self.dims.clone(), self.strides.clone(), self.offset)
    }
}

impl<'a, T: Copy> StridedView<'a, T> {
    /// Get the element at the given multi-dimensional subscripts.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        Ok(self.data[self.buffer_index(indices)?])
    }

    /// Get the element at view index `idx` under `order` and `mode`.
    pub fn get_linear(&self, idx: isize, order: Order, mode: IndexMode) -> Result<T> {
        let b = vind2bind(&self.dims, &self.strides, self.offset, order, idx, mode)?;
        Ok(self.data[b as usize])
    }

    /// Copy the elements into a new row-major vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.buffer_indices().map(|i| self.data[i]).collect()
    }
}

// ============================================================================
// StridedViewMut
// ============================================================================

/// Mutable strided view over a borrowed slice.
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T> std::fmt::Debug for StridedViewMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedViewMut")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, T> StridedViewMut<'a, T> {
    /// Create a new mutable strided view from a borrowed slice.
    pub fn new(
        data: &'a mut [T],
        dims: &[usize],
        strides: &[isize],
        offset: isize,
    ) -> Result<Self> {
        check_bounds(data.len(), dims, strides, offset)?;
        Ok(Self {
            data,
            dims: Arc::from(dims),
            strides: Arc::from(strides),
            offset,
        })
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        numel(&self.dims)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Buffer index of the element at `indices`.
    pub fn buffer_index(&self, indices: &[usize]) -> Result<usize> {
        subscript_offset(&self.dims, &self.strides, self.offset, indices)
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView {
            data: &*self.data,
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }

    /// Apply `f` to every element in row-major order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let indices = BufferIndices::new(self.dims.clone(), self.strides.clone(), self.offset);
        for i in indices {
            f(&mut self.data[i]);
        }
    }
}

impl<'a, T: Copy> StridedViewMut<'a, T> {
    /// Get the element at the given subscripts.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        Ok(self.data[self.buffer_index(indices)?])
    }

    /// Set the element at the given subscripts.
    pub fn set(&mut self, indices: &[usize], value: T) -> Result<()> {
        let i = self.buffer_index(indices)?;
        self.data[i] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_major_strides() {
        assert_eq!(col_major_strides(&[2, 3, 4]), vec![1, 2, 6]);
        assert!(col_major_strides(&[]).is_empty());
        assert_eq!(col_major_strides(&[0, 3]), vec![1, 0]);
    }

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(row_major_strides(&[5]), vec![1]);
        assert_eq!(shape_to_strides(&[2, 3], Order::ColumnMajor), vec![1, 2]);
    }

    #[test]
    fn test_strided_view_get() {
        let data: Vec<f64> = (0..6).map(|x| x as f64).collect();
        let view = StridedView::dense(&data, &[2, 3], Order::RowMajor).unwrap();
        assert_eq!(view.len(), 6);
        assert_eq!(view.get(&[0, 0]).unwrap(), 0.0);
        assert_eq!(view.get(&[1, 2]).unwrap(), 5.0);
        assert!(view.get(&[2, 0]).is_err());
        assert!(view.get(&[0]).is_err());
    }

    #[test]
    fn test_strided_view_get_linear() {
        let data = [0, 1, 2, 3];
        let view = StridedView::new(&data, &[2, 2], &[-2, 1], 2).unwrap();
        assert_eq!(view.get_linear(0, Order::RowMajor, IndexMode::Throw).unwrap(), 2);
        assert_eq!(view.get_linear(2, Order::RowMajor, IndexMode::Throw).unwrap(), 0);
        assert_eq!(view.get_linear(1, Order::ColumnMajor, IndexMode::Throw).unwrap(), 0);
        assert_eq!(view.get_linear(-1, Order::RowMajor, IndexMode::Normalize).unwrap(), 1);
    }

    #[test]
    fn test_buffer_indices_and_to_vec() {
        let data = [0, 1, 2, 3, 4, 5];
        let view = StridedView::dense(&data, &[2, 3], Order::ColumnMajor).unwrap();
        assert_eq!(view.buffer_indices().collect::<Vec<_>>(), vec![0, 2, 4, 1, 3, 5]);
        assert_eq!(view.to_vec(), vec![0, 2, 4, 1, 3, 5]);

        let reversed = StridedView::new(&data, &[2, 3], &[1, -2], 4).unwrap();
        assert_eq!(reversed.to_vec(), vec![4, 2, 0, 5, 3, 1]);

        let empty = StridedView::new(&data, &[0, 3], &[3, 1], 0).unwrap();
        assert_eq!(empty.buffer_indices().count(), 0);

        let scalar = StridedView::new(&data, &[], &[], 4).unwrap();
        assert_eq!(scalar.to_vec(), vec![4]);
    }

    #[test]
    fn test_strided_view_mut() {
        let mut data = vec![0i32; 6];
        {
            let mut view = StridedViewMut::new(&mut data, &[3], &[-2], 4).unwrap();
            view.set(&[0], 10).unwrap();
            view.set(&[2], 30).unwrap();
            assert_eq!(view.get(&[1]).unwrap(), 0);
            assert!(view.set(&[3], 1).is_err());
            view.for_each_mut(|x| *x += 1);
            assert_eq!(view.as_view().to_vec(), vec![11, 1, 31]);
        }
        assert_eq!(data, vec![31, 0, 1, 0, 11, 0]);
    }

    #[test]
    fn test_strided_view_new_out_of_bounds() {
        let data = [0.0f64; 4];
        assert!(StridedView::new(&data, &[2, 3], &[3, 1], 0).is_err());
        let mut data = [0.0f64; 4];
        assert!(StridedViewMut::new(&mut data, &[5], &[1], 0).is_err());
    }
}
