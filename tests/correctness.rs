use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strided_core::dispatch::{
    dispatch, generic_unary, Accessor, Arg, Buffer, DType, Kernel, KernelArgs, Value,
};
use strided_core::sum::{nansumkbn_ndarray, sumkbn2, sumkbn_ndarray, sumpw_ndarray};
use strided_core::view::{max_view_buffer_index, min_view_buffer_index, stride_to_offset};
use strided_core::{DispatchError, Order, StridedView};

#[test]
fn test_view_dimensions_feed_one_dimensional_kernels() {
    let data: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let m = StridedView::dense(&data, &[4, 3], Order::RowMajor).unwrap();
    assert_eq!(m.strides(), &[3, 1]);

    // column 1
    let col = StridedView::new(&data, &[4], &[m.strides()[0]], 1).unwrap();
    assert_eq!(col.to_vec(), vec![1.0, 4.0, 7.0, 10.0]);
    let sum = sumkbn_ndarray(4, col.data(), col.strides()[0], col.offset()).unwrap();
    assert_eq!(sum, 1.0 + 4.0 + 7.0 + 10.0);

    // rows reversed along the last dimension
    let reversed = StridedView::new(&data, &[4, 3], &[3, -1], 2).unwrap();
    assert_eq!(reversed.get(&[0, 0]).unwrap(), 2.0);
    let sum = sumpw_ndarray(3, &data, reversed.strides()[1], reversed.offset()).unwrap();
    assert_eq!(sum, 3.0);
    assert_eq!(
        min_view_buffer_index(reversed.dims(), reversed.strides(), reversed.offset()),
        0
    );
    assert_eq!(
        max_view_buffer_index(reversed.dims(), reversed.strides(), reversed.offset()),
        11
    );
}

#[test]
fn test_negative_stride_offsets_agree() {
    let x = [1.0f64, 2.0, 4.0, 8.0, 16.0];
    let via_simple = sumkbn2(3, &x, -2).unwrap();
    let via_offset = sumkbn_ndarray(3, &x, -2, stride_to_offset(3, -2)).unwrap();
    assert_eq!(stride_to_offset(3, -2), 4);
    assert_eq!(via_simple, 21.0);
    assert_eq!(via_offset, via_simple);
}

#[test]
fn test_random_f32_strided_sum() {
    let mut rng = StdRng::seed_from_u64(7);
    let x: Vec<f32> = (0..2000).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
    let reference: f64 = x.iter().step_by(2).map(|&v| v as f64).sum();
    let got = sumkbn2(1000, &x, -2).unwrap();
    assert_relative_eq!(got as f64, reference, epsilon = 1e-4);
}

fn nansum_kernel(args: &mut KernelArgs<'_>) -> Result<(), DispatchError> {
    let n = args.n;
    let (sx, ox) = args.layout(0);
    let (_, oy) = args.layout(1);
    let x: &Buffer = args.inputs[0];
    let x = x.as_slice::<f32>().ok_or(DispatchError::InvalidArgument {
        index: 0,
        expected: "float32",
    })?;
    let (sum, _) = nansumkbn_ndarray(n, x, sx, ox)?;
    let y = args.outputs[0]
        .as_mut_slice::<f64>()
        .ok_or(DispatchError::InvalidArgument {
            index: 1,
            expected: "float64",
        })?;
    y[oy as usize] = sum as f64;
    Ok(())
}

#[test]
fn test_dispatched_reduction_into_zero_stride_output() {
    let d = dispatch(
        &[DType::Float32, DType::Float64],
        vec![Kernel::new(1, 1, nansum_kernel)],
        generic_unary(|v| v),
        5,
        1,
        1,
    )
    .unwrap();
    let x = Buffer::from(vec![1.0f32, f32::NAN, 2.0, f32::NAN, 4.0]);
    let mut y = Buffer::zeros(DType::Float64, 1);
    d.call(vec![Arg::Int(5), Arg::Array(&x), Arg::Int(1), Arg::ArrayMut(&mut y), Arg::Int(0)])
        .unwrap();
    assert_eq!(y.get(0), Some(Value::Real(7.0)));
}
