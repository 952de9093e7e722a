//! Patch extraction and random sampling benchmarks.
//!
//! Run with: `cargo bench --bench sampling`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dataprovider::testing::{random_volume, sparse_mask};
use dataprovider::{DataSuperset, Dataset, SampleSpec, SamplingConfig, TensorData, Vec3};

fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(20)
}

// =============================================================================
// Patch Extraction
// =============================================================================

fn bench_get_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/get_patch");
    let tensor = TensorData::from_volume(random_volume((64, 256, 256), 42), Vec3::ZERO);

    for edge in [16i64, 64, 128] {
        let shape = Vec3::new(16, edge, edge);
        group.throughput(Throughput::Elements(shape.product() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(edge), &shape, |b, &shape| {
            b.iter(|| black_box(tensor.get_patch(black_box(Vec3::new(32, 128, 128)), shape)))
        });
    }
    group.finish();
}

// =============================================================================
// Random Sampling
// =============================================================================

fn bench_random_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("component/random_sample");
    let spec = SampleSpec::new()
        .with("img", (16, 128, 128))
        .and_then(|s| s.with("msk", (16, 64, 64)))
        .unwrap();

    let mut uniform = Dataset::new().with_spec(spec.clone());
    uniform.add_data("img", random_volume((64, 256, 256), 1), Vec3::ZERO).unwrap();
    uniform.add_data("msk", random_volume((64, 256, 256), 2), Vec3::ZERO).unwrap();

    let mut masked = uniform.clone();
    let voxels: Vec<_> = (0..64).map(|i| (i % 64, 100 + i, 100 + i)).collect();
    masked
        .add_mask("loc", sparse_mask((64, 256, 256), &voxels).mapv(f32::from), Vec3::ZERO, true)
        .unwrap();

    let mut superset = DataSuperset::new();
    superset.add_dataset(uniform.clone());
    superset.add_dataset(masked.clone());
    superset.set_sampling_weights(None).unwrap();

    let config = SamplingConfig::default();
    let mut rng = config.rng();
    group.bench_function("uniform", |b| {
        b.iter(|| black_box(uniform.random_sample(None, &mut rng).ok()))
    });
    group.bench_function("masked", |b| {
        b.iter(|| black_box(masked.random_sample(None, &mut rng).ok()))
    });
    group.bench_function("superset", |b| {
        b.iter(|| black_box(superset.random_sample(None, &mut rng).ok()))
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_get_patch, bench_random_sample
}
criterion_main!(benches);
