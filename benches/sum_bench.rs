use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strided_core::dispatch::{dispatch, generic_unary, unary, Arg, Buffer, DType, Value};
use strided_core::sum::{sumkbn, sumkbn2, sumors, sumpw};

fn random_vec(len: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn bench_sum(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum");
    for n in [1_000usize, 100_000] {
        group.throughput(Throughput::Elements(n as u64));
        let x = random_vec(2 * n);
        for stride in [1isize, -2] {
            let label = format!("{n}/stride{stride}");
            group.bench_with_input(BenchmarkId::new("ors", &label), &n, |b, &n| {
                b.iter(|| sumors(n, black_box(&x), stride).unwrap())
            });
            group.bench_with_input(BenchmarkId::new("kbn", &label), &n, |b, &n| {
                b.iter(|| sumkbn(n, black_box(&x), stride).unwrap())
            });
            group.bench_with_input(BenchmarkId::new("kbn2", &label), &n, |b, &n| {
                b.iter(|| sumkbn2(n, black_box(&x), stride).unwrap())
            });
            group.bench_with_input(BenchmarkId::new("pw", &label), &n, |b, &n| {
                b.iter(|| sumpw(n, black_box(&x), stride).unwrap())
            });
        }
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_unary");
    let n = 10_000usize;
    group.throughput(Throughput::Elements(n as u64));
    let d = dispatch(
        &[DType::Float64, DType::Float64],
        vec![unary(|x: f64| x * 2.0)],
        generic_unary(|v| Value::Real(v.to_f64() * 2.0)),
        5,
        1,
        1,
    )
    .unwrap();

    let x64 = Buffer::from(random_vec(n));
    let x32 = Buffer::from(random_vec(n).into_iter().map(|v| v as f32).collect::<Vec<_>>());
    for (name, x) in [("specialized", &x64), ("fallback", &x32)] {
        let mut y = Buffer::zeros(DType::Float64, n);
        group.bench_function(name, |b| {
            b.iter(|| {
                d.call(vec![
                    Arg::Int(n as i64),
                    Arg::Array(x),
                    Arg::Int(1),
                    Arg::ArrayMut(&mut y),
                    Arg::Int(1),
                ])
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sum, bench_dispatch);
criterion_main!(benches);
