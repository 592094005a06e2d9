//! Runtime dispatch of strided calls.
//!
//! A [`Dispatcher`] validates a flat argument list, resolves the operand
//! dtypes against its [`DispatchTable`], and runs either the matching
//! specialized kernel or the table's generic fallback.
//!
//! Argument layout, with `m = nin + nout` operands (outputs last):
//!
//! - simple form (`nargs = 1 + 2m`): `N, x, stride_x, y, stride_y, ...`
//! - ndarray form (`nargs = 1 + 3m`): `N, x, stride_x, offset_x, ...`
//!
//! In the simple form a negative stride starts at the end of its buffer.
//! All validation happens before the kernel runs, so a failed call never
//! writes to an output.
//!
//! A [`DispatcherBy`] takes the same arguments plus a per-element
//! [`AccessFn`] that may rewrite or skip each element's inputs.

use std::sync::Arc;

use smallvec::SmallVec;
use strided_view::{check_bounds, stride_to_offset, StridedError};

use crate::buffer::Buffer;
use crate::dtype::{resolve, DType, DTypeCode};
use crate::error::{DispatchError, Result};
use crate::kernel::{AccessFn, Kernel, KernelArgs};
use crate::table::DispatchTable;

/// One positional argument of a dispatched call.
#[derive(Debug)]
pub enum Arg<'a> {
    /// Element count, stride or offset.
    Int(i64),
    /// Input array.
    Array(&'a Buffer),
    /// Output array (also accepted in input positions).
    ArrayMut(&'a mut Buffer),
}

impl Arg<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Arg::Int(_) => "integer",
            Arg::Array(_) => "array",
            Arg::ArrayMut(_) => "mutable array",
        }
    }
}

impl From<i64> for Arg<'_> {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<isize> for Arg<'_> {
    fn from(v: isize) -> Self {
        Arg::Int(v as i64)
    }
}

impl<'a> From<&'a Buffer> for Arg<'a> {
    fn from(b: &'a Buffer) -> Self {
        Arg::Array(b)
    }
}

impl<'a> From<&'a mut Buffer> for Arg<'a> {
    fn from(b: &'a mut Buffer) -> Self {
        Arg::ArrayMut(b)
    }
}

/// Calling convention of a dispatcher, derived from its argument count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallForm {
    /// `(N, x, stride_x, ...)`.
    Simple,
    /// `(N, x, stride_x, offset_x, ...)`.
    Ndarray,
}

impl CallForm {
    /// Arguments per operand.
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            CallForm::Simple => 2,
            CallForm::Ndarray => 3,
        }
    }
}

/// Kernel choice for a dtype signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Registered signature at this index.
    Specialized(usize),
    /// No exact match; the generic fallback runs.
    Fallback,
}

/// A callable built from a dispatch table.
///
/// Cheap to clone; clones share the table.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<DispatchTable>,
    nargs: usize,
    form: CallForm,
}

/// Build a [`Dispatcher`] from flattened signatures, their kernels, and a
/// fallback.
///
/// `nargs` must be `1 + 2 * (nin + nout)` (simple form) or
/// `1 + 3 * (nin + nout)` (ndarray form).
pub fn dispatch(
    types: &[DType],
    kernels: Vec<Kernel>,
    fallback: Kernel,
    nargs: usize,
    nin: usize,
    nout: usize,
) -> Result<Dispatcher> {
    let table = DispatchTable::new(types, kernels, fallback, nin, nout)?;
    Dispatcher::new(Arc::new(table), nargs)
}

impl Dispatcher {
    /// Wrap a shared table with the calling form implied by `nargs`.
    pub fn new(table: Arc<DispatchTable>, nargs: usize) -> Result<Self> {
        let m = table.nin() + table.nout();
        let form = if nargs == 1 + 2 * m {
            CallForm::Simple
        } else if nargs == 1 + 3 * m {
            CallForm::Ndarray
        } else {
            return Err(DispatchError::InvalidTable(format!(
                "nargs must be {} or {} for {m} operands, got {nargs}",
                1 + 2 * m,
                1 + 3 * m
            )));
        };
        Ok(Self { table, nargs, form })
    }

    #[inline]
    pub fn nargs(&self) -> usize {
        self.nargs
    }

    #[inline]
    pub fn form(&self) -> CallForm {
        self.form
    }

    #[inline]
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    fn operands(&self) -> usize {
        self.table.nin() + self.table.nout()
    }

    fn check_arity(&self, got: usize, expected: usize) -> Result<()> {
        if got < expected {
            return Err(DispatchError::InsufficientArguments { expected, got });
        }
        if got > expected {
            return Err(DispatchError::TooManyArguments { expected, got });
        }
        Ok(())
    }

    /// Which kernel a signature of dtype codes selects.
    pub fn resolve_codes(&self, codes: &[DTypeCode]) -> Result<Resolution> {
        self.check_arity(codes.len(), self.operands())?;
        Ok(match self.table.lookup(codes) {
            Some(i) => Resolution::Specialized(i),
            None => Resolution::Fallback,
        })
    }

    /// Which kernel a signature of dtype tags selects.
    ///
    /// Unknown tags resolve to the fallback rather than failing.
    pub fn resolve(&self, tags: &[&str]) -> Result<Resolution> {
        let codes: SmallVec<[DTypeCode; 4]> = tags.iter().map(|t| resolve(t)).collect();
        self.resolve_codes(&codes)
    }

    /// Validate `args` and run the selected kernel.
    pub fn call(&self, args: Vec<Arg<'_>>) -> Result<()> {
        self.run(args, None)
    }

    fn run<'a>(&self, args: Vec<Arg<'a>>, access: Option<&'a mut AccessFn<'a>>) -> Result<()> {
        self.check_arity(args.len(), self.nargs)?;

        let nin = self.table.nin();
        let per_operand = self.form.stride();

        let mut n = 0i64;
        let mut inputs: SmallVec<[&Buffer; 4]> = SmallVec::new();
        let mut outputs: SmallVec<[&mut Buffer; 2]> = SmallVec::new();
        let mut strides: SmallVec<[i64; 6]> = SmallVec::new();
        let mut offsets: SmallVec<[i64; 6]> = SmallVec::new();
        // first argument position of each operand, for error reporting
        let mut positions: SmallVec<[usize; 6]> = SmallVec::new();

        for (index, arg) in args.into_iter().enumerate() {
            if index == 0 {
                n = expect_int(index, arg, "integer element count")?;
                continue;
            }
            let k = (index - 1) / per_operand;
            match (index - 1) % per_operand {
                0 => {
                    positions.push(index);
                    match (arg, k < nin) {
                        (Arg::Array(b), true) => inputs.push(b),
                        (Arg::ArrayMut(b), true) => inputs.push(&*b),
                        (Arg::ArrayMut(b), false) => outputs.push(b),
                        (Arg::Array(_), false) => {
                            return Err(DispatchError::ReadOnlyOutput { index })
                        }
                        (other, _) => {
                            log::trace!("argument {index} is {}, expected an array", other.kind());
                            return Err(DispatchError::InvalidArgument {
                                index,
                                expected: "array",
                            });
                        }
                    }
                }
                1 => strides.push(expect_int(index, arg, "integer stride")?),
                _ => offsets.push(expect_int(index, arg, "integer offset")?),
            }
        }

        // Numeric domain checks.
        let mut istrides: SmallVec<[isize; 6]> = SmallVec::new();
        let mut ioffsets: SmallVec<[Option<isize>; 6]> = SmallVec::new();
        for (k, &s) in strides.iter().enumerate() {
            let index = positions[k] + 1;
            istrides.push(
                isize::try_from(s)
                    .map_err(|_| DispatchError::ArgumentOutOfRange { index, value: s })?,
            );
            ioffsets.push(match offsets.get(k) {
                None => None,
                Some(&o) if o < 0 => {
                    return Err(DispatchError::NegativeOffset {
                        index: index + 1,
                        offset: o,
                    })
                }
                Some(&o) => Some(isize::try_from(o).map_err(|_| {
                    DispatchError::ArgumentOutOfRange {
                        index: index + 1,
                        value: o,
                    }
                })?),
            });
        }
        if n <= 0 {
            return Ok(());
        }
        let n = usize::try_from(n)
            .map_err(|_| DispatchError::ArgumentOutOfRange { index: 0, value: n })?;
        let ioffsets: SmallVec<[isize; 6]> = ioffsets
            .iter()
            .zip(istrides.iter())
            .map(|(&o, &s)| o.unwrap_or_else(|| stride_to_offset(n, s)))
            .collect();

        // Bounds: every operand, before any kernel runs.
        let lens = inputs
            .iter()
            .map(|b| b.len())
            .chain(outputs.iter().map(|b| b.len()));
        for (k, len) in lens.enumerate() {
            check_bounds(len, &[n], &[istrides[k]], ioffsets[k]).map_err(|e| match e {
                StridedError::OutOfBounds { len, min, max } => DispatchError::InsufficientElements {
                    index: positions[k],
                    len,
                    min,
                    max,
                },
                other => DispatchError::Strided(other),
            })?;
        }

        let codes: SmallVec<[DTypeCode; 6]> = inputs
            .iter()
            .map(|b| b.dtype().code())
            .chain(outputs.iter().map(|b| b.dtype().code()))
            .collect();
        let (kernel, selected) = self.table.select(&codes);
        match selected {
            Some(i) => log::trace!("dispatch n={n} to signature {i}"),
            None => log::debug!(
                "no kernel registered for ({}); using generic fallback",
                signature_string(&codes)
            ),
        }

        let mut kargs = KernelArgs {
            n,
            inputs,
            outputs,
            strides: istrides,
            offsets: ioffsets,
            access,
        };
        kernel.call(&mut kargs)
    }
}

/// A [`Dispatcher`] whose calls carry a per-element accessor.
///
/// Every kernel in the table, and the fallback, must honor the accessor
/// (see [`Kernel::honors_access`]): the typed `*_by` constructors, the
/// generic kernels, or a [`Kernel::with_access`] body.
#[derive(Debug, Clone)]
pub struct DispatcherBy {
    inner: Dispatcher,
}

/// Build a [`DispatcherBy`]; arguments as for [`dispatch`].
pub fn dispatch_by(
    types: &[DType],
    kernels: Vec<Kernel>,
    fallback: Kernel,
    nargs: usize,
    nin: usize,
    nout: usize,
) -> Result<DispatcherBy> {
    let table = DispatchTable::new(types, kernels, fallback, nin, nout)?;
    DispatcherBy::new(Arc::new(table), nargs)
}

impl DispatcherBy {
    pub fn new(table: Arc<DispatchTable>, nargs: usize) -> Result<Self> {
        if let Some(i) = table.kernels().iter().position(|k| !k.honors_access()) {
            return Err(DispatchError::InvalidTable(format!(
                "kernel {i} ignores the per-element accessor"
            )));
        }
        if !table.fallback().honors_access() {
            return Err(DispatchError::InvalidTable(
                "fallback ignores the per-element accessor".to_string(),
            ));
        }
        Ok(Self {
            inner: Dispatcher::new(table, nargs)?,
        })
    }

    #[inline]
    pub fn nargs(&self) -> usize {
        self.inner.nargs()
    }

    #[inline]
    pub fn form(&self) -> CallForm {
        self.inner.form()
    }

    #[inline]
    pub fn table(&self) -> &DispatchTable {
        self.inner.table()
    }

    /// See [`Dispatcher::resolve`].
    pub fn resolve(&self, tags: &[&str]) -> Result<Resolution> {
        self.inner.resolve(tags)
    }

    /// Validate `args` and run the selected kernel, passing each element's
    /// input values through `access` first.
    ///
    /// Validation is identical to [`Dispatcher::call`]; `access` is never
    /// invoked for a call that fails it.
    pub fn call<'a>(&self, args: Vec<Arg<'a>>, access: &'a mut AccessFn<'a>) -> Result<()> {
        self.inner.run(args, Some(access))
    }
}

fn expect_int(index: usize, arg: Arg<'_>, expected: &'static str) -> Result<i64> {
    match arg {
        Arg::Int(v) => Ok(v),
        _ => Err(DispatchError::InvalidArgument { index, expected }),
    }
}

fn signature_string(codes: &[DTypeCode]) -> String {
    codes
        .iter()
        .map(|c| c.dtype().map_or("unknown", DType::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}
