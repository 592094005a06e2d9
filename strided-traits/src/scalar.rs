//! Scalar type bounds for strided reductions.

use num_traits::Float;

/// Real floating-point element usable by the summation algorithms.
///
/// Every arithmetic operation on an implementor must round to the type's own
/// precision. For `f32` this holds for native Rust arithmetic: each `+`/`-`
/// is an IEEE single-precision operation, so the compensated algorithms
/// reproduce single-precision error accumulation exactly.
pub trait Real: Float + std::fmt::Debug + Send + Sync + 'static {
    /// `n * value`, evaluated in double precision and rounded once to `Self`.
    ///
    /// Used by the zero-stride shortcut of the sum routines.
    fn scale_count(value: Self, n: usize) -> Self;

    /// Widen to `f64` (exact for `f32` and `f64`).
    fn to_f64_lossless(self) -> f64;
}

impl Real for f64 {
    #[inline]
    fn scale_count(value: Self, n: usize) -> Self {
        n as f64 * value
    }

    #[inline]
    fn to_f64_lossless(self) -> f64 {
        self
    }
}

impl Real for f32 {
    #[inline]
    fn scale_count(value: Self, n: usize) -> Self {
        (n as f64 * value as f64) as f32
    }

    #[inline]
    fn to_f64_lossless(self) -> f64 {
        self as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_real<T: Real>() {}

    #[test]
    fn test_standard_types() {
        assert_real::<f32>();
        assert_real::<f64>();
    }

    #[test]
    fn test_scale_count_f64() {
        assert_eq!(f64::scale_count(2.5, 4), 10.0);
        assert_eq!(f64::scale_count(-1.0, 0), 0.0);
        assert!(f64::scale_count(f64::NAN, 3).is_nan());
    }

    #[test]
    fn test_scale_count_f32_rounds_once() {
        // 16777217 is not representable in f32; converting the count first
        // would round to 16777216 before the multiply.
        let n = 16_777_217usize;
        let naive = (n as f32) * 3.0f32;
        assert_eq!(naive, 50_331_648.0);
        assert_eq!(f32::scale_count(3.0, n), 50_331_652.0);
    }

    #[test]
    fn test_widen() {
        assert_eq!(0.1f32.to_f64_lossless(), 0.1f32 as f64);
        assert_eq!(0.1f64.to_f64_lossless(), 0.1);
    }
}
