//! One-dimensional strided iteration kernels.
//!
//! Every kernel applies a caller-supplied closure exactly `n` times,
//! advancing each operand by its own signed stride. Strides may be negative
//! (reverse traversal) or zero (broadcast a single element).
//!
//! # Calling forms
//!
//! - simple: `kernel(n, x, stride_x, y, stride_y, f)`; a negative stride
//!   starts at the end of its buffer
//! - `_ndarray`: `kernel_ndarray(n, x, stride_x, offset_x, y, stride_y, offset_y, f)`
//!
//! # Example
//!
//! ```
//! use strided_kernel::{accumulate, unary};
//!
//! let x = [1.0, -2.0, 2.0];
//! let mut y = [0.0; 3];
//! accumulate(3, 0.0, &x, 1, &mut y, 1, |a, b| a + b).unwrap();
//! assert_eq!(y, [1.0, -1.0, 1.0]);
//!
//! let mut r = [0.0; 3];
//! unary(3, &x, -1, &mut r, 1, |v: f64| v.abs()).unwrap();
//! assert_eq!(r, [2.0, 2.0, 1.0]);
//! ```

pub mod kernel;
pub mod map;
pub mod reduce;

pub use kernel::StridedIndices;
pub use map::{
    binary, binary_by, binary_by_ndarray, binary_ndarray, mskunary, mskunary_ndarray, nullary,
    nullary_ndarray, quaternary, quaternary_ndarray, quinary, quinary_ndarray, ternary,
    ternary_ndarray, unary, unary_by, unary_by_ndarray, unary_ndarray,
};
pub use reduce::{
    accumulate, accumulate_ndarray, reduce, reduce_by, reduce_by_ndarray, reduce_ndarray,
};
pub use strided_view::{Result, StridedError};
