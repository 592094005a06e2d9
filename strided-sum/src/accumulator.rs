//! Incremental summation state.
//!
//! An accumulator is created (optionally seeded), fed one element at a time
//! with [`Accumulator::push`], and consumed with [`Accumulator::finish`].
//! [`Accumulator::value`] reads the corrected running total without
//! consuming, which is what the cumulative routines write out.

use strided_traits::Real;

/// Running-sum state for one reduction pass.
pub trait Accumulator<T: Real>: Sized {
    /// State whose running total starts at `init`.
    fn seeded(init: T) -> Self;

    /// Fold one element.
    fn push(&mut self, v: T);

    /// Corrected running total.
    fn value(&self) -> T;

    /// Final corrected total.
    #[inline]
    fn finish(self) -> T {
        self.value()
    }

    /// State starting from zero.
    #[inline]
    fn zero() -> Self {
        Self::seeded(T::zero())
    }
}

/// Ordinary recursive summation.
#[derive(Debug, Clone, Copy)]
pub struct Ordinary<T> {
    sum: T,
}

impl<T: Real> Accumulator<T> for Ordinary<T> {
    #[inline]
    fn seeded(init: T) -> Self {
        Self { sum: init }
    }

    #[inline]
    fn push(&mut self, v: T) {
        self.sum = self.sum + v;
    }

    #[inline]
    fn value(&self) -> T {
        self.sum
    }
}

/// Error-free transformation of `a + b`: returns the rounding error of `t`.
#[inline(always)]
fn two_sum_err<T: Real>(a: T, b: T, t: T) -> T {
    if a.abs() >= b.abs() {
        (a - t) + b
    } else {
        (b - t) + a
    }
}

/// First-order Kahan–Babuška (Neumaier) compensated summation.
#[derive(Debug, Clone, Copy)]
pub struct KahanBabuska<T> {
    sum: T,
    c: T,
}

impl<T: Real> Accumulator<T> for KahanBabuska<T> {
    #[inline]
    fn seeded(init: T) -> Self {
        Self {
            sum: init,
            c: T::zero(),
        }
    }

    #[inline]
    fn push(&mut self, v: T) {
        let t = self.sum + v;
        self.c = self.c + two_sum_err(self.sum, v, t);
        self.sum = t;
    }

    #[inline]
    fn value(&self) -> T {
        self.sum + self.c
    }
}

/// Second-order Kahan–Babuška summation (Klein, 2005).
///
/// The first-order correction is itself summed with compensation into
/// `cs`, whose own error accumulates in `ccs`.
#[derive(Debug, Clone, Copy)]
pub struct Klein<T> {
    sum: T,
    cs: T,
    ccs: T,
}

impl<T: Real> Accumulator<T> for Klein<T> {
    #[inline]
    fn seeded(init: T) -> Self {
        Self {
            sum: init,
            cs: T::zero(),
            ccs: T::zero(),
        }
    }

    #[inline]
    fn push(&mut self, v: T) {
        let t = self.sum + v;
        let c = two_sum_err(self.sum, v, t);
        self.sum = t;
        let t = self.cs + c;
        let cc = two_sum_err(self.cs, c, t);
        self.cs = t;
        self.ccs = self.ccs + cc;
    }

    #[inline]
    fn value(&self) -> T {
        self.sum + self.cs + self.ccs
    }
}

/// Wraps an accumulator, skipping NaN inputs and counting the rest.
#[derive(Debug, Clone, Copy)]
pub struct NanSkipping<A> {
    inner: A,
    count: usize,
}

impl<A> NanSkipping<A> {
    /// Number of non-NaN elements folded so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Final `(sum, count)` pair.
    #[inline]
    pub fn finish_with_count<T: Real>(self) -> (T, usize)
    where
        A: Accumulator<T>,
    {
        (self.inner.finish(), self.count)
    }
}

impl<T: Real, A: Accumulator<T>> Accumulator<T> for NanSkipping<A> {
    #[inline]
    fn seeded(init: T) -> Self {
        Self {
            inner: A::seeded(init),
            count: 0,
        }
    }

    #[inline]
    fn push(&mut self, v: T) {
        if !v.is_nan() {
            self.inner.push(v);
            self.count += 1;
        }
    }

    #[inline]
    fn value(&self) -> T {
        self.inner.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<A: Accumulator<f64>>(xs: &[f64]) -> f64 {
        let mut acc = A::zero();
        for &x in xs {
            acc.push(x);
        }
        acc.finish()
    }

    #[test]
    fn test_ordinary_loses_small_terms() {
        let xs = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(fold::<Ordinary<f64>>(&xs), 0.0);
    }

    #[test]
    fn test_kahan_babuska_recovers_small_terms() {
        let xs = [1.0, 1e100, 1.0, -1e100];
        assert_eq!(fold::<KahanBabuska<f64>>(&xs), 2.0);
        assert_eq!(fold::<Klein<f64>>(&xs), 2.0);
    }

    #[test]
    fn test_klein_second_order() {
        // the first-order correction term itself loses bits here
        let xs = [-1e32, 0.001, 7.0, 1e16, 1e32, -1e16];
        assert_eq!(fold::<KahanBabuska<f64>>(&xs), 7.0);
        assert_eq!(fold::<Klein<f64>>(&xs), 7.001);
    }

    #[test]
    fn test_seeded_value_tracks_running_total() {
        let mut acc = Klein::seeded(10.0f64);
        acc.push(1.0);
        assert_eq!(acc.value(), 11.0);
        acc.push(-2.0);
        assert_eq!(acc.value(), 9.0);
        assert_eq!(acc.finish(), 9.0);
    }

    #[test]
    fn test_nan_skipping() {
        let mut acc = NanSkipping::<KahanBabuska<f64>>::zero();
        for &x in &[1.0, f64::NAN, 2.0, f64::NAN, 3.0] {
            acc.push(x);
        }
        assert_eq!(acc.count(), 3);
        assert_eq!(acc.finish_with_count(), (6.0, 3));
    }

    #[test]
    fn test_f32_accumulates_in_single_precision() {
        let mut acc = Ordinary::<f32>::zero();
        acc.push(16_777_216.0);
        acc.push(1.0);
        assert_eq!(acc.value(), 16_777_216.0);

        let mut acc = KahanBabuska::<f32>::zero();
        acc.push(16_777_216.0);
        acc.push(1.0);
        assert_eq!(acc.value(), 16_777_216.0);
        acc.push(1.0);
        assert_eq!(acc.value(), 16_777_218.0);
    }
}
