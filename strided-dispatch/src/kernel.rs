//! Dispatchable kernels.
//!
//! A [`Kernel`] is a type-erased loop body over the validated operands of
//! one dispatched call. Typed constructors ([`unary`], [`binary`], ...)
//! borrow each operand as a typed slice and delegate to the
//! `strided-kernel` loops; the `generic_*` constructors walk the operands
//! through [`Accessor`] and work for every data type.
//!
//! Kernels built by [`unary_by`], [`binary_by`], [`Kernel::with_access`]
//! and the `generic_*` constructors honor a per-element [`AccessFn`], which
//! lets them serve accessor dispatch (see
//! [`dispatch_by`](crate::dispatch_by)).

use std::fmt;
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};
use strided_kernel::StridedIndices;

use crate::buffer::{storage_mismatch, Accessor, Buffer, Element};
use crate::dtype::DType;
use crate::error::Result;
use crate::value::Value;

/// Per-element accessor of an accessor-dispatched call.
///
/// Receives the input values of element `i` and may rewrite them in place.
/// Returning `false` skips the element; its output slot is left untouched.
pub type AccessFn<'a> = dyn FnMut(&mut [Value], usize) -> bool + 'a;

/// Validated operands of one dispatched call.
///
/// `strides` and `offsets` hold one entry per operand, inputs first.
/// Offsets are already resolved, so both calling forms look the same here.
pub struct KernelArgs<'a> {
    pub n: usize,
    pub inputs: SmallVec<[&'a Buffer; 4]>,
    pub outputs: SmallVec<[&'a mut Buffer; 2]>,
    pub strides: SmallVec<[isize; 6]>,
    pub offsets: SmallVec<[isize; 6]>,
    /// Set only for accessor-dispatched calls.
    pub access: Option<&'a mut AccessFn<'a>>,
}

impl KernelArgs<'_> {
    /// `(stride, offset)` of operand `k` (inputs first).
    #[inline]
    pub fn layout(&self, k: usize) -> (isize, isize) {
        (self.strides[k], self.offsets[k])
    }

    #[inline]
    fn nin(&self) -> usize {
        self.inputs.len()
    }
}

/// Typed slice of input `k`.
fn input<'a, T: Element>(inputs: &[&'a Buffer], k: usize) -> Result<&'a [T]> {
    T::slice(inputs[k]).ok_or_else(|| storage_mismatch(k, T::DTYPE))
}

type KernelBody = dyn for<'a> Fn(&mut KernelArgs<'a>) -> Result<()> + Send + Sync;

/// Storage predicate of one operand, see [`Element::stores`].
type Stores = fn(DType) -> bool;

/// A loop body registered in a dispatch table.
#[derive(Clone)]
pub struct Kernel {
    nin: usize,
    nout: usize,
    /// One predicate per operand for typed kernels; `None` accepts any dtype.
    storage: Option<SmallVec<[Stores; 6]>>,
    honors_access: bool,
    body: Arc<KernelBody>,
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("nin", &self.nin)
            .field("nout", &self.nout)
            .field("typed", &self.storage.is_some())
            .field("honors_access", &self.honors_access)
            .finish_non_exhaustive()
    }
}

impl Kernel {
    /// Wrap an arbitrary loop body taking `nin` inputs and `nout` outputs.
    ///
    /// The body is assumed to ignore [`KernelArgs::access`], so the kernel
    /// cannot be registered for accessor dispatch.
    pub fn new<F>(nin: usize, nout: usize, body: F) -> Self
    where
        F: for<'a> Fn(&mut KernelArgs<'a>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            nin,
            nout,
            storage: None,
            honors_access: false,
            body: Arc::new(body),
        }
    }

    /// Like [`Kernel::new`], for a body that applies [`KernelArgs::access`]
    /// when it is set.
    pub fn with_access<F>(nin: usize, nout: usize, body: F) -> Self
    where
        F: for<'a> Fn(&mut KernelArgs<'a>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            honors_access: true,
            ..Self::new(nin, nout, body)
        }
    }

    fn typed(mut self, storage: SmallVec<[Stores; 6]>) -> Self {
        debug_assert_eq!(storage.len(), self.nin + self.nout);
        self.storage = Some(storage);
        self
    }

    #[inline]
    pub fn nin(&self) -> usize {
        self.nin
    }

    #[inline]
    pub fn nout(&self) -> usize {
        self.nout
    }

    /// Whether the kernel can run with a buffer of `dtype` at operand `k`
    /// (inputs first). Untyped kernels accept every dtype.
    pub fn accepts(&self, k: usize, dtype: DType) -> bool {
        match &self.storage {
            Some(storage) => storage.get(k).map_or(false, |stores| stores(dtype)),
            None => true,
        }
    }

    /// Whether the body applies [`KernelArgs::access`].
    #[inline]
    pub fn honors_access(&self) -> bool {
        self.honors_access
    }

    /// Run the body.
    pub fn call(&self, args: &mut KernelArgs<'_>) -> Result<()> {
        (self.body)(args)
    }
}

// ============================================================================
// Typed kernels
// ============================================================================

/// `y[i] = f()` on a typed output.
pub fn nullary<Y: Element>(f: impl Fn() -> Y + Send + Sync + 'static) -> Kernel {
    Kernel::new(0, 1, move |args| {
        let (sy, oy) = args.layout(0);
        let n = args.n;
        let y = Y::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(0, Y::DTYPE))?;
        strided_kernel::nullary_ndarray(n, y, sy, oy, &f)?;
        Ok(())
    })
    .typed(smallvec![Y::stores as Stores])
}

/// `y[i] = f(x[i])` on typed operands.
pub fn unary<X: Element, Y: Element>(f: impl Fn(X) -> Y + Send + Sync + 'static) -> Kernel {
    Kernel::new(1, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = Y::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(1, Y::DTYPE))?;
        strided_kernel::unary_ndarray(n, x, sx, ox, y, sy, oy, &f)?;
        Ok(())
    })
    .typed(smallvec![X::stores as Stores, Y::stores as Stores])
}

/// `z[i] = f(x[i], y[i])` on typed operands.
pub fn binary<X: Element, Y: Element, Z: Element>(
    f: impl Fn(X, Y) -> Z + Send + Sync + 'static,
) -> Kernel {
    Kernel::new(2, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let (sz, oz) = args.layout(2);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = input::<Y>(&args.inputs, 1)?;
        let z = Z::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(2, Z::DTYPE))?;
        strided_kernel::binary_ndarray(n, x, sx, ox, y, sy, oy, z, sz, oz, &f)?;
        Ok(())
    })
    .typed(smallvec![X::stores as Stores, Y::stores as Stores, Z::stores as Stores])
}

/// `w[i] = f(x[i], y[i], z[i])` on typed operands.
pub fn ternary<X: Element, Y: Element, Z: Element, W: Element>(
    f: impl Fn(X, Y, Z) -> W + Send + Sync + 'static,
) -> Kernel {
    Kernel::new(3, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let (sz, oz) = args.layout(2);
        let (sw, ow) = args.layout(3);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = input::<Y>(&args.inputs, 1)?;
        let z = input::<Z>(&args.inputs, 2)?;
        let w = W::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(3, W::DTYPE))?;
        strided_kernel::ternary_ndarray(n, x, sx, ox, y, sy, oy, z, sz, oz, w, sw, ow, &f)?;
        Ok(())
    })
    .typed(smallvec![X::stores as Stores, Y::stores as Stores, Z::stores as Stores, W::stores as Stores])
}

/// `v[i] = f(x[i], y[i], z[i], w[i])` on typed operands.
pub fn quaternary<X: Element, Y: Element, Z: Element, W: Element, V: Element>(
    f: impl Fn(X, Y, Z, W) -> V + Send + Sync + 'static,
) -> Kernel {
    Kernel::new(4, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let (sz, oz) = args.layout(2);
        let (sw, ow) = args.layout(3);
        let (sv, ov) = args.layout(4);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = input::<Y>(&args.inputs, 1)?;
        let z = input::<Z>(&args.inputs, 2)?;
        let w = input::<W>(&args.inputs, 3)?;
        let v = V::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(4, V::DTYPE))?;
        strided_kernel::quaternary_ndarray(
            n, x, sx, ox, y, sy, oy, z, sz, oz, w, sw, ow, v, sv, ov, &f,
        )?;
        Ok(())
    })
    .typed(smallvec![X::stores as Stores, Y::stores as Stores, Z::stores as Stores, W::stores as Stores, V::stores as Stores])
}

/// `v[i] = f(x[i], y[i], z[i], w[i], u[i])` on typed operands.
pub fn quinary<X: Element, Y: Element, Z: Element, W: Element, U: Element, V: Element>(
    f: impl Fn(X, Y, Z, W, U) -> V + Send + Sync + 'static,
) -> Kernel {
    Kernel::new(5, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let (sz, oz) = args.layout(2);
        let (sw, ow) = args.layout(3);
        let (su, ou) = args.layout(4);
        let (sv, ov) = args.layout(5);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = input::<Y>(&args.inputs, 1)?;
        let z = input::<Z>(&args.inputs, 2)?;
        let w = input::<W>(&args.inputs, 3)?;
        let u = input::<U>(&args.inputs, 4)?;
        let v = V::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(5, V::DTYPE))?;
        strided_kernel::quinary_ndarray(
            n, x, sx, ox, y, sy, oy, z, sz, oz, w, sw, ow, u, su, ou, v, sv, ov, &f,
        )?;
        Ok(())
    })
    .typed(smallvec![
        X::stores as Stores,
        Y::stores as Stores,
        Z::stores as Stores,
        W::stores as Stores,
        U::stores as Stores,
        V::stores as Stores
    ])
}

/// [`unary`] that passes each input through [`KernelArgs::access`] first.
///
/// Without an accessor it behaves like [`unary`].
pub fn unary_by<X: Element, Y: Element>(f: impl Fn(X) -> Y + Send + Sync + 'static) -> Kernel {
    Kernel::with_access(1, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = Y::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(1, Y::DTYPE))?;
        match args.access.as_deref_mut() {
            Some(access) => {
                strided_kernel::unary_by_ndarray(n, x, sx, ox, y, sy, oy, &f, |a: X, i| {
                    let mut vals = [a.into_value()];
                    access(&mut vals[..], i).then(|| X::from_value(vals[0]))
                })?
            }
            None => strided_kernel::unary_ndarray(n, x, sx, ox, y, sy, oy, &f)?,
        }
        Ok(())
    })
    .typed(smallvec![X::stores as Stores, Y::stores as Stores])
}

/// [`binary`] that passes each pair of inputs through
/// [`KernelArgs::access`] first.
pub fn binary_by<X: Element, Y: Element, Z: Element>(
    f: impl Fn(X, Y) -> Z + Send + Sync + 'static,
) -> Kernel {
    Kernel::with_access(2, 1, move |args| {
        let (sx, ox) = args.layout(0);
        let (sy, oy) = args.layout(1);
        let (sz, oz) = args.layout(2);
        let n = args.n;
        let x = input::<X>(&args.inputs, 0)?;
        let y = input::<Y>(&args.inputs, 1)?;
        let z = Z::slice_mut(&mut *args.outputs[0])
            .ok_or_else(|| storage_mismatch(2, Z::DTYPE))?;
        match args.access.as_deref_mut() {
            Some(access) => strided_kernel::binary_by_ndarray(
                n,
                x,
                sx,
                ox,
                y,
                sy,
                oy,
                z,
                sz,
                oz,
                &f,
                |(a, b): (X, Y), i| {
                    let mut vals = [a.into_value(), b.into_value()];
                    access(&mut vals[..], i)
                        .then(|| (X::from_value(vals[0]), Y::from_value(vals[1])))
                },
            )?,
            None => strided_kernel::binary_ndarray(n, x, sx, ox, y, sy, oy, z, sz, oz, &f)?,
        }
        Ok(())
    })
    .typed(smallvec![X::stores as Stores, Y::stores as Stores, Z::stores as Stores])
}

// ============================================================================
// Generic (fallback) kernels
// ============================================================================

/// Walk `nin` inputs and one output element-wise through [`Accessor`].
fn generic_map<F>(nin: usize, f: F) -> Kernel
where
    F: Fn(&[Value]) -> Value + Send + Sync + 'static,
{
    Kernel::with_access(nin, 1, move |args| {
        let n = args.n;
        let mut iters: SmallVec<[StridedIndices; 4]> = SmallVec::new();
        for (k, buf) in args.inputs.iter().enumerate() {
            let (s, o) = args.layout(k);
            iters.push(StridedIndices::new(buf.len(), n, s, o)?);
        }
        let (sy, oy) = args.layout(args.nin());
        let out = &mut *args.outputs[0];
        let iy = StridedIndices::new(out.len(), n, sy, oy)?;

        let mut vals: SmallVec<[Value; 4]> = SmallVec::with_capacity(nin);
        for (i, j) in iy.enumerate() {
            vals.clear();
            for (it, buf) in iters.iter_mut().zip(args.inputs.iter()) {
                let v = it.next().and_then(|b| buf.get(b)).unwrap_or(Value::Missing);
                vals.push(v);
            }
            if let Some(access) = args.access.as_deref_mut() {
                if !access(vals.as_mut_slice(), i) {
                    continue;
                }
            }
            out.set(j, f(&vals));
        }
        Ok(())
    })
}

/// Generic `y[i] = f()` for any output type.
pub fn generic_nullary(f: impl Fn() -> Value + Send + Sync + 'static) -> Kernel {
    generic_map(0, move |_| f())
}

/// Generic `y[i] = f(x[i])` for any data types.
pub fn generic_unary(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Kernel {
    generic_map(1, move |v| f(v[0]))
}

/// Generic `z[i] = f(x[i], y[i])` for any data types.
pub fn generic_binary(f: impl Fn(Value, Value) -> Value + Send + Sync + 'static) -> Kernel {
    generic_map(2, move |v| f(v[0], v[1]))
}

/// Generic `w[i] = f(x[i], y[i], z[i])` for any data types.
pub fn generic_ternary(
    f: impl Fn(Value, Value, Value) -> Value + Send + Sync + 'static,
) -> Kernel {
    generic_map(3, move |v| f(v[0], v[1], v[2]))
}

/// Generic four-input map.
pub fn generic_quaternary(
    f: impl Fn(Value, Value, Value, Value) -> Value + Send + Sync + 'static,
) -> Kernel {
    generic_map(4, move |v| f(v[0], v[1], v[2], v[3]))
}

/// Generic five-input map.
pub fn generic_quinary(
    f: impl Fn(Value, Value, Value, Value, Value) -> Value + Send + Sync + 'static,
) -> Kernel {
    generic_map(5, move |v| f(v[0], v[1], v[2], v[3], v[4]))
}
