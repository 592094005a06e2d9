use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strided_sum::{
    cusumkbn, cusumkbn2, cusumors, cusumpw, nansumkbn, nansumkbn2, nansumors, nansumpw, sumkbn,
    sumkbn2, sumors, sumpw, Real,
};

/// Reference sum accumulated in f64 (exact enough for the f32 tests below).
fn reference(xs: &[f32]) -> f64 {
    xs.iter().map(|&v| v.to_f64_lossless()).sum()
}

#[test]
fn test_klein_beats_ordinary_on_alternating_f32() {
    let pattern = [1.0e7f32, 0.3, -1.0e7, 0.3];
    let x: Vec<f32> = pattern.iter().copied().cycle().take(10_000).collect();
    let exact = reference(&x);

    let ors = sumors(x.len(), &x, 1).unwrap() as f64;
    let kbn2 = sumkbn2(x.len(), &x, 1).unwrap() as f64;
    let kbn = sumkbn(x.len(), &x, 1).unwrap() as f64;

    assert!((kbn2 - exact).abs() < (ors - exact).abs());
    assert!((kbn2 - exact).abs() <= (kbn - exact).abs());
    assert!((kbn2 - exact).abs() < 1e-3);
}

#[test]
fn test_f32_cumulative_rounds_every_step() {
    let x = [0.1f32, 0.2, 0.3, 1.0e8, -1.0e8, 0.4];
    let mut y = [0.0f32; 6];

    cusumors(6, 0.0, &x, 1, &mut y, 1).unwrap();
    assert_eq!(y, [0.1, 0.3, 0.6, 1.0e8, 0.0, 0.4]);

    cusumkbn(6, 0.0, &x, 1, &mut y, 1).unwrap();
    assert_eq!(y, [0.1, 0.3, 0.6, 1.0e8, 0.6, 1.0]);

    cusumkbn2(6, 0.0, &x, 1, &mut y, 1).unwrap();
    assert_eq!(y, [0.1, 0.3, 0.6, 1.0e8, 0.6, 1.0]);
}

#[test]
fn test_pairwise_close_to_reference() {
    let mut rng = StdRng::seed_from_u64(3);
    let x: Vec<f64> = (0..100_000).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let exact: f64 = {
        let mut acc = 0.0f64;
        let mut c = 0.0f64;
        for &v in &x {
            let t = acc + v;
            c += if acc.abs() >= v.abs() { (acc - t) + v } else { (v - t) + acc };
            acc = t;
        }
        acc + c
    };
    assert_relative_eq!(sumpw(x.len(), &x, 1).unwrap(), exact, epsilon = 1e-10);
    assert_relative_eq!(sumkbn(x.len(), &x, 1).unwrap(), exact, epsilon = 1e-12);
}

#[test]
fn test_pairwise_cusum_matches_kbn_cusum() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 1000;
    let x: Vec<f64> = (0..2 * n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let mut a = vec![0.0; n];
    let mut b = vec![0.0; n];
    cusumpw(n, 1.5, &x, -2, &mut a, 1).unwrap();
    cusumkbn(n, 1.5, &x, -2, &mut b, 1).unwrap();
    for (p, q) in a.iter().zip(&b) {
        assert_relative_eq!(*p, *q, max_relative = 1e-12);
    }
}

fn maybe_nan() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -1.0e3f64..1.0e3,
        1 => Just(f64::NAN),
    ]
}

proptest! {
    #[test]
    fn nan_skip_counts_match(x in prop::collection::vec(maybe_nan(), 0..300)) {
        let n = x.len();
        let nans = x.iter().filter(|v| v.is_nan()).count();
        let clean: Vec<f64> = x.iter().copied().filter(|v| !v.is_nan()).collect();

        let (s, c) = nansumors(n, &x, 1).unwrap();
        prop_assert_eq!(c, n - nans);
        prop_assert_eq!(s, sumors(clean.len(), &clean, 1).unwrap());

        let (s, c) = nansumkbn(n, &x, 1).unwrap();
        prop_assert_eq!(c, n - nans);
        prop_assert_eq!(s, sumkbn(clean.len(), &clean, 1).unwrap());

        let (s, c) = nansumkbn2(n, &x, 1).unwrap();
        prop_assert_eq!(c, n - nans);
        prop_assert_eq!(s, sumkbn2(clean.len(), &clean, 1).unwrap());

        let (s, c) = nansumpw(n, &x, 1).unwrap();
        prop_assert_eq!(c, n - nans);
        let reference = sumkbn2(clean.len(), &clean, 1).unwrap();
        prop_assert!((s - reference).abs() <= 1e-9 * (1.0 + reference.abs()));
    }

    #[test]
    fn zero_stride_equals_scaled_value(v in -1.0e6f64..1.0e6, n in 1usize..5000) {
        let expected = n as f64 * v;
        prop_assert_eq!(sumors(n, &[v], 0).unwrap(), expected);
        prop_assert_eq!(sumkbn(n, &[v], 0).unwrap(), expected);
        prop_assert_eq!(sumkbn2(n, &[v], 0).unwrap(), expected);
        prop_assert_eq!(sumpw(n, &[v], 0).unwrap(), expected);
        prop_assert_eq!(nansumkbn(n, &[v], 0).unwrap(), (expected, n));
    }

    #[test]
    fn zero_length_leaves_output_untouched(fill in -10.0f64..10.0) {
        let mut y = [fill; 4];
        cusumkbn2(0, 3.0, &[], 1, &mut y, 1).unwrap();
        cusumpw(0, 3.0, &[], 1, &mut y, 1).unwrap();
        prop_assert_eq!(y, [fill; 4]);
        prop_assert_eq!(sumkbn2::<f64>(0, &[], 1).unwrap(), 0.0);
    }
}
