//! Dynamically typed element values and assignment casts.

use num_complex::Complex64;

/// A single element read through the generic access path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Real(f64),
    Complex(Complex64),
    Bool(bool),
    /// No value (e.g. a hole in a generic array).
    Missing,
}

impl Value {
    /// Real interpretation: complex values keep their real part, booleans
    /// map to 0/1 and missing values to NaN.
    pub fn to_f64(self) -> f64 {
        match self {
            Value::Real(v) => v,
            Value::Complex(c) => c.re,
            Value::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Missing => f64::NAN,
        }
    }

    /// Complex interpretation (real values get a zero imaginary part).
    pub fn to_complex(self) -> Complex64 {
        match self {
            Value::Complex(c) => c,
            other => Complex64::new(other.to_f64(), 0.0),
        }
    }

    /// Truthiness: non-zero, non-NaN numbers and `true` are truthy.
    pub fn truthy(self) -> bool {
        match self {
            Value::Real(v) => v != 0.0 && !v.is_nan(),
            Value::Complex(c) => (c.re != 0.0 && !c.re.is_nan()) || (c.im != 0.0 && !c.im.is_nan()),
            Value::Bool(b) => b,
            Value::Missing => false,
        }
    }

    #[inline]
    pub fn is_missing(self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Complex64> for Value {
    fn from(v: Complex64) -> Self {
        Value::Complex(v)
    }
}

// ============================================================================
// Assignment casts
// ============================================================================

/// Truncate toward zero and wrap modulo `2^bits`; non-finite values become 0.
#[inline]
pub(crate) fn wrap_bits(v: f64, bits: i32) -> u64 {
    if !v.is_finite() {
        return 0;
    }
    v.trunc().rem_euclid(2f64.powi(bits)) as u64
}

/// Clamp to `[0, 255]` and round half to even; NaN becomes 0.
#[inline]
pub(crate) fn clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    let v = v.clamp(0.0, 255.0);
    let floor = v.floor();
    let diff = v - floor;
    let rounded = if diff > 0.5 || (diff == 0.5 && floor % 2.0 != 0.0) {
        floor + 1.0
    } else {
        floor
    };
    rounded as u8
}
