//! Stride classification helpers.

/// Rank of each `|stride|` among the non-zero strides, starting at 1.
///
/// Equal magnitudes share a rank and zero strides rank 1, so `[4, 0, 2]`
/// ranks as `[2, 1, 1]`.
pub fn index_order(strides: &[isize]) -> Vec<usize> {
    let magnitudes: Vec<usize> = strides.iter().map(|s| s.unsigned_abs()).collect();
    magnitudes
        .iter()
        .map(|&m| match m {
            0 => 1,
            _ => 1 + magnitudes.iter().filter(|&&o| o != 0 && o < m).count(),
        })
        .collect()
}

/// Classify the direction in which a view walks its buffer.
///
/// - `1`: every stride is non-negative (forward iteration)
/// - `-1`: every stride is non-positive and at least one is negative
///   (reverse iteration)
/// - `0`: strides have mixed signs
///
/// An empty stride list iterates forward.
pub fn iteration_order(strides: &[isize]) -> i8 {
    let mut pos = false;
    let mut neg = false;
    for &s in strides {
        if s > 0 {
            pos = true;
        } else if s < 0 {
            neg = true;
        }
    }
    match (pos, neg) {
        (_, false) => 1,
        (false, true) => -1,
        (true, true) => 0,
    }
}

/// Dimension indices sorted from largest to smallest `|stride|`.
///
/// Ties keep their original relative order.
pub(crate) fn dims_by_decreasing_stride(strides: &[isize]) -> Vec<usize> {
    let order = index_order(strides);
    let mut dims: Vec<usize> = (0..strides.len()).collect();
    dims.sort_by(|&a, &b| order[b].cmp(&order[a]));
    dims
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_order() {
        assert_eq!(index_order(&[6, 1, 3]), vec![3, 1, 2]);
        assert_eq!(index_order(&[-6, 1, -3]), vec![3, 1, 2]);
        assert_eq!(index_order(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_index_order_zero_and_ties() {
        assert_eq!(index_order(&[0, 5, 0, 2]), vec![1, 2, 1, 1]);
        assert_eq!(index_order(&[1, 4, 4]), vec![1, 2, 2]);
        assert_eq!(index_order(&[7, 7]), vec![1, 1]);
    }

    #[test]
    fn test_iteration_order() {
        assert_eq!(iteration_order(&[]), 1);
        assert_eq!(iteration_order(&[3, 1]), 1);
        assert_eq!(iteration_order(&[0, 0]), 1);
        assert_eq!(iteration_order(&[-3, -1]), -1);
        assert_eq!(iteration_order(&[-3, 0]), -1);
        assert_eq!(iteration_order(&[3, -1]), 0);
    }

    #[test]
    fn test_dims_by_decreasing_stride() {
        assert_eq!(dims_by_decreasing_stride(&[1, 6, -2]), vec![1, 2, 0]);
        assert_eq!(dims_by_decreasing_stride(&[2, 2, 1]), vec![0, 1, 2]);
        assert_eq!(dims_by_decreasing_stride(&[0, 4]), vec![1, 0]);
    }
}
