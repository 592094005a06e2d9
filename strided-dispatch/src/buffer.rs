//! Typed buffers and the two ways of reaching their elements:
//!
//! - [`Element`]: zero-cost typed slices, used by specialized kernels
//! - [`Accessor`]: per-element get/set through [`Value`], used by the
//!   generic fallback kernels

use num_complex::{Complex32, Complex64};

use crate::dtype::DType;
use crate::error::{DispatchError, Result};
use crate::value::{clamp_u8, wrap_bits, Value};

/// A flat, caller-owned array tagged with its data type.
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer {
    Float64(Vec<f64>),
    Float32(Vec<f32>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Uint8(Vec<u8>),
    Uint8c(Vec<u8>),
    Uint16(Vec<u16>),
    Uint32(Vec<u32>),
    Bool(Vec<bool>),
    Complex64(Vec<Complex32>),
    Complex128(Vec<Complex64>),
    Generic(Vec<Value>),
    Binary(Vec<u8>),
}

impl Buffer {
    /// A zero-filled buffer of `len` elements.
    pub fn zeros(dtype: DType, len: usize) -> Buffer {
        match dtype {
            DType::Float64 => Buffer::Float64(vec![0.0; len]),
            DType::Float32 => Buffer::Float32(vec![0.0; len]),
            DType::Int8 => Buffer::Int8(vec![0; len]),
            DType::Int16 => Buffer::Int16(vec![0; len]),
            DType::Int32 => Buffer::Int32(vec![0; len]),
            DType::Uint8 => Buffer::Uint8(vec![0; len]),
            DType::Uint8c => Buffer::Uint8c(vec![0; len]),
            DType::Uint16 => Buffer::Uint16(vec![0; len]),
            DType::Uint32 => Buffer::Uint32(vec![0; len]),
            DType::Bool => Buffer::Bool(vec![false; len]),
            DType::Complex64 => Buffer::Complex64(vec![Complex32::new(0.0, 0.0); len]),
            DType::Complex128 => Buffer::Complex128(vec![Complex64::new(0.0, 0.0); len]),
            DType::Generic => Buffer::Generic(vec![Value::Real(0.0); len]),
            DType::Binary => Buffer::Binary(vec![0; len]),
        }
    }

    /// A zero-filled buffer for a dtype tag.
    pub fn from_tag(tag: &str, len: usize) -> Result<Buffer> {
        Ok(Buffer::zeros(tag.parse()?, len))
    }

    /// Wrap bytes as a clamped `uint8c` buffer.
    pub fn uint8c(data: Vec<u8>) -> Buffer {
        Buffer::Uint8c(data)
    }

    /// Wrap bytes as a `binary` buffer.
    pub fn binary(data: Vec<u8>) -> Buffer {
        Buffer::Binary(data)
    }

    /// Data type of the elements.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::Float64(_) => DType::Float64,
            Buffer::Float32(_) => DType::Float32,
            Buffer::Int8(_) => DType::Int8,
            Buffer::Int16(_) => DType::Int16,
            Buffer::Int32(_) => DType::Int32,
            Buffer::Uint8(_) => DType::Uint8,
            Buffer::Uint8c(_) => DType::Uint8c,
            Buffer::Uint16(_) => DType::Uint16,
            Buffer::Uint32(_) => DType::Uint32,
            Buffer::Bool(_) => DType::Bool,
            Buffer::Complex64(_) => DType::Complex64,
            Buffer::Complex128(_) => DType::Complex128,
            Buffer::Generic(_) => DType::Generic,
            Buffer::Binary(_) => DType::Binary,
        }
    }

    /// Number of elements (complex numbers count once).
    pub fn len(&self) -> usize {
        match self {
            Buffer::Float64(v) => v.len(),
            Buffer::Float32(v) => v.len(),
            Buffer::Int8(v) => v.len(),
            Buffer::Int16(v) => v.len(),
            Buffer::Int32(v) => v.len(),
            Buffer::Uint8(v) | Buffer::Uint8c(v) | Buffer::Binary(v) => v.len(),
            Buffer::Uint16(v) => v.len(),
            Buffer::Uint32(v) => v.len(),
            Buffer::Bool(v) => v.len(),
            Buffer::Complex64(v) => v.len(),
            Buffer::Complex128(v) => v.len(),
            Buffer::Generic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Single-precision scalar lanes: a `float32` buffer as-is, or a
    /// `complex64` buffer as interleaved `(re, im)` pairs.
    pub fn real_lanes_f32(&self) -> Option<&[f32]> {
        match self {
            Buffer::Float32(v) => Some(v.as_slice()),
            Buffer::Complex64(v) => Some(bytemuck::cast_slice(v)),
            _ => None,
        }
    }

    /// Double-precision scalar lanes: a `float64` buffer as-is, or a
    /// `complex128` buffer as interleaved `(re, im)` pairs.
    pub fn real_lanes_f64(&self) -> Option<&[f64]> {
        match self {
            Buffer::Float64(v) => Some(v.as_slice()),
            Buffer::Complex128(v) => Some(bytemuck::cast_slice(v)),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Buffer::real_lanes_f64`].
    pub fn real_lanes_f64_mut(&mut self) -> Option<&mut [f64]> {
        match self {
            Buffer::Float64(v) => Some(v.as_mut_slice()),
            Buffer::Complex128(v) => Some(bytemuck::cast_slice_mut(v)),
            _ => None,
        }
    }

    /// Typed view of the elements, if `T` matches the storage.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    /// Typed mutable view of the elements, if `T` matches the storage.
    pub fn as_mut_slice<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(self)
    }
}

// ============================================================================
// Generic element access
// ============================================================================

/// Element access through dynamically typed [`Value`]s.
///
/// Reads convert the stored element to a value; writes cast the value to
/// the storage type (integers wrap, `uint8c` clamps, `bool` stores
/// truthiness). Out-of-range indices yield `None`.
pub trait Accessor {
    fn dtype(&self) -> DType;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, i: usize) -> Option<Value>;

    fn set(&mut self, i: usize, v: Value) -> Option<()>;
}

impl Accessor for Buffer {
    fn dtype(&self) -> DType {
        Buffer::dtype(self)
    }

    fn len(&self) -> usize {
        Buffer::len(self)
    }

    fn get(&self, i: usize) -> Option<Value> {
        Some(match self {
            Buffer::Float64(v) => v.get(i)?.into_value(),
            Buffer::Float32(v) => v.get(i)?.into_value(),
            Buffer::Int8(v) => v.get(i)?.into_value(),
            Buffer::Int16(v) => v.get(i)?.into_value(),
            Buffer::Int32(v) => v.get(i)?.into_value(),
            Buffer::Uint8(v) | Buffer::Uint8c(v) | Buffer::Binary(v) => v.get(i)?.into_value(),
            Buffer::Uint16(v) => v.get(i)?.into_value(),
            Buffer::Uint32(v) => v.get(i)?.into_value(),
            Buffer::Bool(v) => v.get(i)?.into_value(),
            Buffer::Complex64(v) => v.get(i)?.into_value(),
            Buffer::Complex128(v) => v.get(i)?.into_value(),
            Buffer::Generic(v) => *v.get(i)?,
        })
    }

    fn set(&mut self, i: usize, v: Value) -> Option<()> {
        match self {
            Buffer::Float64(d) => *d.get_mut(i)? = f64::from_value(v),
            Buffer::Float32(d) => *d.get_mut(i)? = f32::from_value(v),
            Buffer::Int8(d) => *d.get_mut(i)? = i8::from_value(v),
            Buffer::Int16(d) => *d.get_mut(i)? = i16::from_value(v),
            Buffer::Int32(d) => *d.get_mut(i)? = i32::from_value(v),
            Buffer::Uint8(d) | Buffer::Binary(d) => *d.get_mut(i)? = u8::from_value(v),
            Buffer::Uint8c(d) => *d.get_mut(i)? = clamp_u8(v.to_f64()),
            Buffer::Uint16(d) => *d.get_mut(i)? = u16::from_value(v),
            Buffer::Uint32(d) => *d.get_mut(i)? = u32::from_value(v),
            Buffer::Bool(d) => *d.get_mut(i)? = bool::from_value(v),
            Buffer::Complex64(d) => *d.get_mut(i)? = Complex32::from_value(v),
            Buffer::Complex128(d) => *d.get_mut(i)? = Complex64::from_value(v),
            Buffer::Generic(d) => *d.get_mut(i)? = v,
        }
        Some(())
    }
}

// ============================================================================
// Typed element access
// ============================================================================

/// A Rust type that is the storage of one or more [`DType`]s.
pub trait Element: Copy + Send + Sync + 'static {
    /// Canonical data type of this storage.
    const DTYPE: DType;

    /// Borrow the buffer's elements if they are stored as `Self`.
    fn slice(buf: &Buffer) -> Option<&[Self]>;

    fn slice_mut(buf: &mut Buffer) -> Option<&mut [Self]>;

    fn into_value(self) -> Value;

    /// Assignment cast from a value.
    fn from_value(v: Value) -> Self;

    /// Whether buffers of `dtype` store their elements as `Self`.
    fn stores(dtype: DType) -> bool;
}

macro_rules! impl_element {
    ($t:ty, $dtype:ident, [$($variant:ident),+], |$v:ident| $into:expr, |$w:ident| $from:expr) => {
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn slice(buf: &Buffer) -> Option<&[Self]> {
                match buf {
                    $(Buffer::$variant(d))|+ => Some(d.as_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn slice_mut(buf: &mut Buffer) -> Option<&mut [Self]> {
                match buf {
                    $(Buffer::$variant(d))|+ => Some(d.as_mut_slice()),
                    _ => None,
                }
            }

            #[inline]
            fn into_value(self) -> Value {
                let $v = self;
                $into
            }

            #[inline]
            fn from_value(v: Value) -> Self {
                let $w = v;
                $from
            }

            #[inline]
            fn stores(dtype: DType) -> bool {
                matches!(dtype, $(DType::$variant)|+)
            }
        }

        impl From<Vec<$t>> for Buffer {
            fn from(v: Vec<$t>) -> Self {
                Buffer::$dtype(v)
            }
        }
    };
}

impl_element!(f64, Float64, [Float64], |x| Value::Real(x), |v| v.to_f64());
impl_element!(f32, Float32, [Float32], |x| Value::Real(x as f64), |v| v.to_f64() as f32);
impl_element!(i8, Int8, [Int8], |x| Value::Real(x as f64), |v| wrap_bits(v.to_f64(), 8) as u8 as i8);
impl_element!(i16, Int16, [Int16], |x| Value::Real(x as f64), |v| wrap_bits(v.to_f64(), 16) as u16 as i16);
impl_element!(i32, Int32, [Int32], |x| Value::Real(x as f64), |v| wrap_bits(v.to_f64(), 32) as u32 as i32);
impl_element!(u8, Uint8, [Uint8, Uint8c, Binary], |x| Value::Real(x as f64), |v| wrap_bits(v.to_f64(), 8) as u8);
impl_element!(u16, Uint16, [Uint16], |x| Value::Real(x as f64), |v| wrap_bits(v.to_f64(), 16) as u16);
impl_element!(u32, Uint32, [Uint32], |x| Value::Real(x as f64), |v| wrap_bits(v.to_f64(), 32) as u32);
impl_element!(bool, Bool, [Bool], |x| Value::Bool(x), |v| v.truthy());
impl_element!(
    Complex32,
    Complex64,
    [Complex64],
    |x| Value::Complex(Complex64::new(x.re as f64, x.im as f64)),
    |v| {
        let c = v.to_complex();
        Complex32::new(c.re as f32, c.im as f32)
    }
);
impl_element!(Complex64, Complex128, [Complex128], |x| Value::Complex(x), |v| v.to_complex());
impl_element!(Value, Generic, [Generic], |x| x, |v| v);

/// Type error for an operand whose storage does not match a kernel.
pub(crate) fn storage_mismatch(index: usize, expected: DType) -> DispatchError {
    DispatchError::InvalidArgument {
        index,
        expected: expected.as_str(),
    }
}
