use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strided_kernel::{
    accumulate_ndarray, binary_ndarray, mskunary_ndarray, reduce_by, reduce_ndarray,
    unary_ndarray, StridedError, StridedIndices,
};

fn random_vec(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Reference gather of a 1-D strided sequence.
fn gather(x: &[f64], n: usize, stride: isize, offset: isize) -> Vec<f64> {
    (0..n as isize).map(|i| x[(offset + i * stride) as usize]).collect()
}

#[test]
fn test_unary_matches_gather_for_mixed_strides() {
    let mut rng = StdRng::seed_from_u64(7);
    let x = random_vec(&mut rng, 40);
    for &(sx, ox) in &[(1isize, 0isize), (3, 1), (-2, 39), (0, 5)] {
        for &(sy, oy) in &[(1isize, 0isize), (-1, 12), (2, 3)] {
            let n = 13;
            let mut y = vec![0.0; 40];
            unary_ndarray(n, &x, sx, ox, &mut y, sy, oy, |v| 2.0 * v + 1.0).unwrap();
            let expected: Vec<f64> = gather(&x, n, sx, ox).iter().map(|v| 2.0 * v + 1.0).collect();
            let got = gather(&y, n, sy, oy);
            for (g, e) in got.iter().zip(&expected) {
                assert_relative_eq!(*g, *e, epsilon = 1e-15);
            }
        }
    }
}

#[test]
fn test_binary_negative_strides() {
    let x: Vec<f64> = (0..10).map(|v| v as f64).collect();
    let y: Vec<f64> = (0..10).map(|v| (v * v) as f64).collect();
    let mut z = vec![0.0; 5];
    binary_ndarray(5, &x, -2, 9, &y, 1, 0, &mut z, 1, 0, |a, b| a - b).unwrap();
    assert_eq!(z, vec![9.0 - 0.0, 7.0 - 1.0, 5.0 - 4.0, 3.0 - 9.0, 1.0 - 16.0]);
}

#[test]
fn test_reduce_matches_iterator_sum() {
    let mut rng = StdRng::seed_from_u64(42);
    let x = random_vec(&mut rng, 101);
    let got = reduce_ndarray(50, &x, -2, 100, 0.0, |a, b| a + b).unwrap();
    let expected: f64 = gather(&x, 50, -2, 100).iter().sum();
    assert_relative_eq!(got, expected, epsilon = 1e-12);
}

#[test]
fn test_accumulate_prefix_sums() {
    let x = [3.0, 1.0, 4.0, 1.0, 5.0];
    let mut y = [0.0; 10];
    accumulate_ndarray(5, 1.0, &x, 1, 0, &mut y, 2, 0, |a, b| a + b).unwrap();
    assert_eq!(y, [4.0, 0.0, 5.0, 0.0, 9.0, 0.0, 10.0, 0.0, 15.0, 0.0]);
}

#[test]
fn test_masked_and_missing_skip_writes() {
    let x = [1.0, 2.0, 3.0];
    let mask = [1u8, 0, 0];
    let mut y = [f64::NAN; 3];
    mskunary_ndarray(3, &x, 1, 0, &mask, 1, 0, &mut y, 1, 0, |v| -v).unwrap();
    assert!(y[0].is_nan());
    assert_eq!(&y[1..], &[-2.0, -3.0]);

    let (sum, count) = reduce_by(3, &x, 1, 0.0, |a, b| a + b, |v, i| (i != 1).then_some(v)).unwrap();
    assert_eq!(sum, 4.0);
    assert_eq!(count, 2);
}

#[test]
fn test_every_operand_is_validated() {
    let x = [1.0; 4];
    let mut y = [0.0; 4];
    // second operand overruns
    let err = unary_ndarray(4, &x, 1, 0, &mut y, 1, 1, |v| v).unwrap_err();
    match err {
        StridedError::OutOfBounds { len: 4, min: 1, max: 4 } => {}
        _ => panic!("expected OutOfBounds, got {err:?}"),
    }
    // negative stride walking below zero
    assert!(unary_ndarray(4, &x, -1, 2, &mut y, 1, 0, |v| v).is_err());
    assert_eq!(y, [0.0; 4]);
}

#[test]
fn test_strided_indices_len() {
    let it = StridedIndices::new(100, 10, 9, 9).unwrap();
    assert_eq!(it.len(), 10);
    assert_eq!(it.last(), Some(90));
}
