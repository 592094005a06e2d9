//! Scalar index normalization.
//!
//! All helpers take an inclusive upper bound `max` (the largest valid index),
//! so a dimension of length `n` uses `max = n - 1`.

use crate::{Result, StridedError};

/// How an index outside `[0, max]` is brought back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexMode {
    /// Out-of-range indices are an error.
    #[default]
    Throw,
    /// Negative indices count from the end (`-1` is `max`); anything still
    /// out of range is an error.
    Normalize,
    /// Indices are clamped to `[0, max]`.
    Clamp,
    /// Indices wrap around modulo `max + 1`.
    Wrap,
}

/// Map a possibly-negative index onto `[0, max]`.
///
/// Negative indices have `max + 1` added (so `-1` is the last element).
/// Returns `-1` if the result is still out of range.
#[inline]
pub fn normalize_index(idx: isize, max: isize) -> isize {
    if max < 0 {
        return -1;
    }
    let idx = if idx < 0 { (idx + 1) + max } else { idx };
    if idx < 0 || idx > max {
        -1
    } else {
        idx
    }
}

/// Clamp an index to `[0, max]`.
///
/// Returns `-1` when `max < 0`.
#[inline]
pub fn clamp_index(idx: isize, max: isize) -> isize {
    if max < 0 {
        -1
    } else if idx < 0 {
        0
    } else if idx > max {
        max
    } else {
        idx
    }
}

/// Wrap an index onto `[0, max]` (Euclidean modulo `max + 1`).
///
/// Returns `-1` when `max < 0` (an empty dimension has no valid index).
#[inline]
pub fn wrap_index(idx: isize, max: isize) -> isize {
    if max < 0 {
        return -1;
    }
    match max.checked_add(1) {
        Some(len) => idx.rem_euclid(len),
        // max == isize::MAX: only negative indices need shifting
        None if idx < 0 => (idx + 1) + max,
        None => idx,
    }
}

/// Resolve an index against `[0, max]` using `mode`.
///
/// Fails when the mode cannot produce an in-range index, including every
/// index when `max < 0` (an empty dimension).
pub fn resolve_index(idx: isize, max: isize, mode: IndexMode) -> Result<usize> {
    let out_of_bounds = || StridedError::IndexOutOfBounds { index: idx, max };
    if max < 0 {
        return Err(out_of_bounds());
    }
    let resolved = match mode {
        IndexMode::Throw => idx,
        IndexMode::Normalize => normalize_index(idx, max),
        IndexMode::Clamp => clamp_index(idx, max),
        IndexMode::Wrap => wrap_index(idx, max),
    };
    if resolved < 0 || resolved > max {
        return Err(out_of_bounds());
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(-2, 10), 9);
        assert_eq!(normalize_index(15, 10), -1);
        assert_eq!(normalize_index(-1, 10), 10);
        assert_eq!(normalize_index(-11, 10), 0);
        assert_eq!(normalize_index(-12, 10), -1);
        assert_eq!(normalize_index(0, 0), 0);
        assert_eq!(normalize_index(0, -1), -1);
        assert_eq!(normalize_index(isize::MIN, -3), -1);
        assert_eq!(normalize_index(-1, isize::MAX), isize::MAX);
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(-5, 10), 0);
        assert_eq!(clamp_index(5, 10), 5);
        assert_eq!(clamp_index(15, 10), 10);
        assert_eq!(clamp_index(-5, -1), -1);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(12, 10), 1);
        assert_eq!(wrap_index(-1, 10), 10);
        assert_eq!(wrap_index(-12, 10), 10);
        assert_eq!(wrap_index(3, 2), 0);
        assert_eq!(wrap_index(-1, isize::MAX), isize::MAX);
        assert_eq!(wrap_index(isize::MIN, isize::MAX), 0);
    }

    #[test]
    fn test_wrap_index_empty_dimension() {
        assert_eq!(wrap_index(3, -1), -1);
        assert_eq!(wrap_index(0, -1), -1);
        assert_eq!(wrap_index(-4, -7), -1);
        assert!(resolve_index(3, -1, IndexMode::Wrap).is_err());
    }

    #[test]
    fn test_resolve_index_modes() {
        assert_eq!(resolve_index(3, 4, IndexMode::Throw).unwrap(), 3);
        assert_eq!(resolve_index(-1, 4, IndexMode::Normalize).unwrap(), 4);
        assert_eq!(resolve_index(9, 4, IndexMode::Clamp).unwrap(), 4);
        assert_eq!(resolve_index(-1, 4, IndexMode::Wrap).unwrap(), 4);
    }

    #[test]
    fn test_resolve_index_errors() {
        let err = resolve_index(5, 4, IndexMode::Throw).unwrap_err();
        match err {
            StridedError::IndexOutOfBounds { index: 5, max: 4 } => {}
            _ => panic!("expected IndexOutOfBounds, got {err:?}"),
        }
        assert!(resolve_index(-6, 4, IndexMode::Normalize).is_err());
        assert!(resolve_index(-1, 4, IndexMode::Throw).is_err());
        // empty dimension: nothing resolves, not even with clamp
        assert!(resolve_index(0, -1, IndexMode::Clamp).is_err());
        assert!(resolve_index(0, -1, IndexMode::Wrap).is_err());
    }
}
