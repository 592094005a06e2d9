//! Runtime dtype dispatch for strided kernels.
//!
//! A [`DispatchTable`] maps operand dtype signatures to specialized
//! [`Kernel`]s and always carries a generic fallback, so every call resolves
//! to exactly one kernel with a single lookup. A [`Dispatcher`] wraps a
//! shared table with a calling convention and validates arguments (arity,
//! kinds, numeric domain, buffer bounds) before any element is written.
//! [`dispatch_by`] builds the accessor variant, [`DispatcherBy`].
//!
//! # Example
//!
//! ```
//! use strided_dispatch::{dispatch, generic_unary, unary, Arg, Buffer, DType, Value};
//!
//! let abs = dispatch(
//!     &[DType::Float64, DType::Float64],
//!     vec![unary(|x: f64| x.abs())],
//!     generic_unary(|v| Value::Real(v.to_f64().abs())),
//!     5,
//!     1,
//!     1,
//! )
//! .unwrap();
//!
//! let x = Buffer::from(vec![-1.0, 2.0, -3.0]);
//! let mut y = Buffer::zeros(DType::Float64, 3);
//! abs.call(vec![Arg::Int(3), Arg::Array(&x), Arg::Int(1), Arg::ArrayMut(&mut y), Arg::Int(1)])
//!     .unwrap();
//! assert_eq!(y, Buffer::Float64(vec![1.0, 2.0, 3.0]));
//! ```

pub mod buffer;
pub mod dispatcher;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod table;
pub mod value;

pub use buffer::{Accessor, Buffer, Element};
pub use dispatcher::{dispatch, dispatch_by, Arg, CallForm, Dispatcher, DispatcherBy, Resolution};
pub use dtype::{resolve, DType, DTypeCode};
pub use error::{DispatchError, ErrorKind, Result};
pub use kernel::{
    binary, binary_by, generic_binary, generic_nullary, generic_quaternary, generic_quinary,
    generic_ternary, generic_unary, nullary, quaternary, quinary, ternary, unary, unary_by,
    AccessFn, Kernel, KernelArgs,
};
pub use table::DispatchTable;
pub use value::Value;

/// Maximum number of operands (inputs plus outputs) in one signature.
pub const MAX_OPERANDS: usize = 16;
