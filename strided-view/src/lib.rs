//! Index arithmetic for strided buffer views.
//!
//! A strided view is a tuple `(buffer, shape, strides, offset)`: `shape[i]`
//! is the extent along dimension `i`, `strides[i]` the signed number of
//! elements to advance per unit step along that dimension, and `offset` the
//! flat index of the element at all-zero subscripts. Strides may be negative
//! (reversed iteration) or zero (broadcast).
//!
//! # Primitives
//!
//! These are total functions over integer inputs and never access a buffer:
//! - [`min_view_buffer_index`], [`max_view_buffer_index`],
//!   [`min_max_view_buffer_index`]: bounds of the flat indices a view touches
//! - [`is_row_major_contiguous`], [`is_column_major_contiguous`],
//!   [`is_contiguous`]: contiguity predicates
//! - [`normalize_index`], [`clamp_index`], [`wrap_index`]: index modes
//!   (out-of-range is signaled by the sentinel `-1`, not an error)
//! - [`stride_to_offset`], [`strides_to_offset`]: starting offsets for
//!   negative strides
//!
//! # Subscript conversions
//!
//! [`sub2ind`], [`ind2sub`], [`vind2bind`] and [`bind2vind`] translate between
//! subscripts, view linear indices and buffer indices. They honor an
//! [`IndexMode`] and return [`StridedError`] in `Throw` mode.

pub mod auxiliary;
pub mod index;
pub mod offsets;
pub mod subscripts;
pub mod view;

pub use auxiliary::{index_order, iteration_order};
pub use index::{clamp_index, normalize_index, resolve_index, wrap_index, IndexMode};
pub use offsets::{
    check_bounds, checked_min_max_view_buffer_index, is_column_major_contiguous, is_contiguous,
    is_row_major_contiguous, max_view_buffer_index, min_max_view_buffer_index,
    min_view_buffer_index, numel, stride_to_offset, strides_to_offset,
};
pub use subscripts::{bind2vind, ind2sub, sub2ind, vind2bind, Order};
pub use view::{
    col_major_strides, row_major_strides, shape_to_strides, BufferIndices,
    StridedView, StridedViewMut,
};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided index arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StridedError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Stride array length doesn't match dimensions.
    #[error("stride and dims length mismatch")]
    StrideLengthMismatch,

    /// Integer overflow while computing a buffer index.
    #[error("offset overflow while computing buffer index")]
    OffsetOverflow,

    /// An index lies outside `[0, max]` under the requested index mode.
    #[error("index {index} out of bounds for maximum index {max}")]
    IndexOutOfBounds { index: isize, max: isize },

    /// A view would touch buffer indices outside `[0, len)`.
    #[error("view touches buffer indices [{min}, {max}] but buffer length is {len}")]
    OutOfBounds { len: usize, min: isize, max: isize },

    /// A buffer index is not visited by the view.
    #[error("buffer index {0} is not reachable by the view")]
    UnreachableIndex(isize),

    /// Two operands of a kernel have different lengths where equal lengths are required.
    #[error("length mismatch: {0} vs {1}")]
    LengthMismatch(usize, usize),
}

/// Result type for strided index arithmetic.
pub type Result<T> = std::result::Result<T, StridedError>;
