//! Strided numeric core.
//!
//! Re-exports the workspace crates under one roof:
//!
//! - [`view`]: index arithmetic for `(shape, strides, offset)` views
//! - [`kernel`]: one-dimensional strided map, reduce and accumulate loops
//! - [`sum`]: compensated, pairwise and NaN-skipping summation
//! - [`dispatch`]: dtype resolution and runtime kernel selection
//!
//! # Example
//!
//! ```
//! use strided_core::dispatch::{dispatch, generic_unary, Arg, Buffer, DType, Kernel};
//! use strided_core::sum::cusumkbn2_ndarray;
//!
//! let cusum = Kernel::new(1, 1, |args| {
//!     let (sx, ox) = args.layout(0);
//!     let (sy, oy) = args.layout(1);
//!     let n = args.n;
//!     let x: &Buffer = args.inputs[0];
//!     if let (Some(x), Some(y)) = (x.as_slice::<f64>(), args.outputs[0].as_mut_slice::<f64>()) {
//!         cusumkbn2_ndarray(n, 0.0, x, sx, ox, y, sy, oy)?;
//!     }
//!     Ok(())
//! });
//! let d = dispatch(&[DType::Float64, DType::Float64], vec![cusum], generic_unary(|v| v), 5, 1, 1)
//!     .unwrap();
//!
//! let x = Buffer::from(vec![1.0, -2.0, 2.0]);
//! let mut y = Buffer::zeros(DType::Float64, 3);
//! d.call(vec![Arg::Int(3), Arg::Array(&x), Arg::Int(1), Arg::ArrayMut(&mut y), Arg::Int(1)])
//!     .unwrap();
//! assert_eq!(y, Buffer::Float64(vec![1.0, -1.0, 1.0]));
//! ```

pub use strided_dispatch as dispatch;
pub use strided_kernel as kernel;
pub use strided_sum as sum;
pub use strided_traits as traits;
pub use strided_view as view;

pub use strided_dispatch::{DType, DispatchError, Dispatcher, ErrorKind};
pub use strided_traits::Real;
pub use strided_view::{IndexMode, Order, StridedError, StridedView, StridedViewMut};
