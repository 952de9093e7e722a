//! End-to-end sampling behavior.
//!
//! Covers:
//! - Patch placement relative to offsets
//! - Multi-channel valid ranges and sample counts
//! - Mask-biased location draws
//! - Weighted superset selection

use dataprovider::testing::{arange_tensor, arange_volume, random_volume, sparse_mask};
use dataprovider::{
    Box3, DataSuperset, Dataset, OutOfRange, SampleError, SampleSpec, Sampler, SamplingConfig,
    TensorData, Vec3,
};
use ndarray::{s, Axis};
use rstest::rstest;

fn spec(entries: &[(&str, (i64, i64, i64))]) -> SampleSpec {
    entries
        .iter()
        .try_fold(SampleSpec::new(), |spec, &(k, shape)| spec.with(k, shape))
        .unwrap()
}

// =============================================================================
// TensorData
// =============================================================================

#[test]
fn offset_tensor_scenario() {
    let data = arange_tensor((4, 4, 4, 4));
    let t = TensorData::new(data.clone(), (1, 1, 1));
    assert_eq!(t.bbox(), Box3::new((1, 1, 1), (5, 5, 5)));

    let patch = t.get_patch(Vec3::splat(3), Vec3::splat(3)).unwrap();
    assert_eq!(patch, data.slice(s![.., 1..4, 1..4, 1..4]));

    assert!(t.get_patch(Vec3::splat(4), Vec3::splat(3)).is_none());
}

#[rstest]
#[case(Vec3::new(3, 3, 3))]
#[case(Vec3::new(2, 4, 6))]
#[case(Vec3::new(7, 1, 2))]
fn patches_exist_exactly_inside_valid_range(#[case] shape: Vec3) {
    let t = TensorData::from_volume(random_volume((8, 9, 10), 3), (5, -5, 0));
    let valid = t.valid_range(shape);
    assert!(!valid.is_empty());

    let (lo, hi) = (valid.min() - Vec3::ONE, valid.max() + Vec3::ONE);
    for z in lo.z()..hi.z() {
        for y in lo.y()..hi.y() {
            for x in lo.x()..hi.x() {
                let pos = Vec3::new(z, y, x);
                let patch = t.get_patch(pos, shape);
                assert_eq!(patch.is_some(), valid.contains_point(pos), "at {pos}");
            }
        }
    }
}

#[test]
fn whole_volume_patch_reproduces_array() {
    let vol = random_volume((6, 7, 8), 11);
    let t = TensorData::from_volume(vol.clone(), Vec3::ZERO);
    let shape = Vec3::new(6, 7, 8);
    let valid = t.valid_range(shape);
    assert_eq!(valid.volume(), 1);

    let patch = t.get_patch(valid.min(), shape).unwrap();
    assert_eq!(patch.index_axis(Axis(0), 0), vol);
}

// =============================================================================
// Dataset
// =============================================================================

#[test]
fn sample_channels_are_aligned_across_offsets() {
    // The label covers the image interior; equal global positions must map to
    // equal values.
    let img = arange_volume((12, 12, 12));
    let lbl = img.slice(s![2..10, 3..9, 1..11]).to_owned();

    let mut ds = Dataset::new();
    ds.add_data("img", img, Vec3::ZERO).unwrap();
    ds.add_data("lbl", lbl, (2, 3, 1)).unwrap();

    let spec = spec(&[("img", (4, 4, 4)), ("lbl", (4, 4, 4))]);
    let mut rng = SamplingConfig::default().rng();
    for _ in 0..100 {
        let sample = ds.random_sample(Some(&spec), &mut rng).unwrap();
        assert_eq!(sample["img"], sample["lbl"]);
    }
}

#[test]
fn random_samples_report_out_of_range_when_channels_miss() {
    let mut ds = Dataset::new();
    ds.add_data("a", arange_volume((5, 5, 5)), Vec3::ZERO).unwrap();
    ds.add_data("b", arange_volume((5, 5, 5)), (4, 4, 4)).unwrap();

    let spec = spec(&[("a", (3, 3, 3)), ("b", (3, 3, 3))]);
    assert_eq!(ds.num_samples(Some(&spec)).unwrap(), 0);

    let err = ds
        .random_sample(Some(&spec), &mut SamplingConfig::default().rng())
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(
        err,
        SampleError::OutOfRange(OutOfRange::EmptyValidRange { .. })
    ));
}

#[test]
fn masked_sampling_covers_all_usable_voxels() {
    let mut ds = Dataset::new();
    ds.add_data("img", random_volume((10, 10, 10), 5), Vec3::ZERO).unwrap();
    let voxels = [(5, 5, 5), (2, 7, 3), (8, 1, 1), (0, 5, 5)];
    ds.add_mask("mask", sparse_mask((10, 10, 10), &voxels).mapv(f32::from), Vec3::ZERO, true)
        .unwrap();

    let spec = spec(&[("img", (3, 3, 3))]);
    let mut rng = SamplingConfig::default().rng();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        seen.insert(ds.random_location(Some(&spec), &mut rng).unwrap());
    }
    // (0, 5, 5) cannot host a 3^3 patch.
    let expected: std::collections::HashSet<_> = [(5, 5, 5), (2, 7, 3), (8, 1, 1)]
        .into_iter()
        .map(Vec3::from)
        .collect();
    assert_eq!(seen, expected);
}

// =============================================================================
// DataSuperset
// =============================================================================

#[test]
fn superset_selection_frequency_matches_weights() {
    let spec = spec(&[("img", (1, 1, 1))]);
    let mut superset = DataSuperset::with_tag("freq");
    for fill in [0.0f32, 1.0] {
        let mut ds = Dataset::new().with_spec(spec.clone());
        ds.add_data("img", arange_volume((2, 2, 2)).mapv(|_| fill), Vec3::ZERO)
            .unwrap();
        superset.add_dataset(ds);
    }
    superset.set_sampling_weights(Some(&[0.25, 0.75])).unwrap();

    let mut rng = SamplingConfig::builder().seed(2024).build().unwrap().rng();
    let n = 10_000;
    let zeros = (0..n)
        .map(|_| superset.random_sample(None, &mut rng).unwrap())
        .filter(|s| s["img"][[0, 0, 0, 0]] == 0.0)
        .count();
    let freq = zeros as f64 / n as f64;
    assert!((freq - 0.25).abs() < 0.02, "freq = {freq}");
}

#[test]
fn superset_default_weights_from_own_specs() {
    let mut superset = DataSuperset::new();

    // 5 * 10 * 10 = 500 centers.
    let mut big = Dataset::new().with_spec(spec(&[("img", (5, 5, 5))]));
    big.add_data("img", arange_volume((9, 14, 14)), Vec3::ZERO).unwrap();
    // 100 centers.
    let mut small = Dataset::new().with_spec(spec(&[("img", (1, 1, 1))]));
    small.add_data("img", arange_volume((1, 10, 10)), Vec3::ZERO).unwrap();

    superset.add_dataset(big);
    superset.add_dataset(small);
    assert_eq!(superset.num_samples(None).unwrap(), 600);

    superset.set_sampling_weights(None).unwrap();
    let w = superset.sampling_weights().unwrap();
    approx::assert_relative_eq!(w[0], 500.0 / 600.0);
    approx::assert_relative_eq!(w[1], 100.0 / 600.0);
}
