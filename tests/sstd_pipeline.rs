use sstd::constants::EntityId;
use sstd::projection::{Projection, SphericalMercator};
use sstd::rasterize::density_around_one_point;
use sstd::sstd::Sstd;
use sstd::trajectories::Sample;
use sstd::TrajectorySet;

use smallvec::smallvec;

/// Two entities, one single-point trajectory each, at distinct but nearby
/// planar locations and times. The spread of 40 m lands in the small-spread
/// branch: voxel 10 m, kernel 100 m.
fn two_entity_set() -> (TrajectorySet, Sample, Sample) {
    let a = Sample::new(5.0, 5.0, 10.0);
    let b = Sample::new(45.0, 40.0, 40.0);
    let mut set = TrajectorySet::default();
    set.insert(EntityId::Int(1), vec![smallvec![a]]);
    set.insert(EntityId::Int(2), vec![smallvec![b]]);
    (set, a, b)
}

#[test]
fn end_to_end_two_single_point_entities() {
    let (set, a, b) = two_entity_set();
    let engine = Sstd::default();
    let (grid, volume) = engine.density_volume(&set).unwrap();

    assert_eq!(grid.voxel_size(), 10.0);
    assert_eq!(grid.kernel_size(), 100.0);
    assert_eq!(grid.steps(), 6);

    // Each sample contributes to exactly one temporal layer; the volume is
    // that entity's stamp divided by the entity count.
    let layer_a = grid.layer_of_time(a.t);
    let layer_b = grid.layer_of_time(b.t);
    assert_ne!(layer_a, layer_b);
    let stamp_a = density_around_one_point(&a, &grid);
    let stamp_b = density_around_one_point(&b, &grid);
    let n = grid.steps();
    for row in 0..n {
        for col in 0..n {
            assert_eq!(volume[(row, col, layer_a)], stamp_a[(row, col, layer_a)] / 2.0);
            assert_eq!(volume[(row, col, layer_b)], stamp_b[(row, col, layer_b)] / 2.0);
        }
    }

    // Every cell is non-negative, and untouched layers are exactly zero.
    assert!(volume.as_slice().iter().all(|&d| d >= 0.0));
    for k in 0..n {
        if k != layer_a && k != layer_b {
            for row in 0..n {
                for col in 0..n {
                    assert_eq!(volume[(row, col, k)], 0.0);
                }
            }
        }
    }

    // A local maximum sits near each sample's voxel: density falls off with
    // distance from the sample within its layer.
    assert!(volume[(0, 0, layer_a)] > volume[(5, 5, layer_a)]);
    assert!(volume[(4, 4, layer_b)] > volume[(0, 0, layer_b)]);
}

#[test]
fn extractor_keeps_top_half_with_recoverable_coordinates() {
    let (set, _, _) = two_entity_set();
    let engine = Sstd::default();
    let (grid, volume) = engine.density_volume(&set).unwrap();
    let points = engine.generate(&set).unwrap();

    // Count the non-zero cells the extractor started from.
    let nonzero = volume.as_slice().iter().filter(|&&d| d != 0.0).count();
    assert!(!points.is_empty());
    assert!(points.len() < nonzero);

    // Survivors are strictly above the median of the non-zero densities.
    let mut sorted: Vec<f64> = volume
        .as_slice()
        .iter()
        .copied()
        .filter(|&d| d != 0.0)
        .collect();
    sorted.sort_by(f64::total_cmp);
    let h = (sorted.len() - 1) as f64 * 0.5;
    let (lo, hi) = (h.floor() as usize, h.ceil() as usize);
    let cutoff = sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]);
    assert!(points.iter().all(|p| p.density > cutoff));

    // Geographic coordinates invert back to the cell's planar coordinates.
    let projection = SphericalMercator;
    for point in &points {
        let (x, y) = projection.to_planar(point.lon, point.lat);
        assert!((x - point.x).abs() < 1e-9);
        assert!((y - point.y).abs() < 1e-9);
        assert!((0.0..=1.0).contains(&point.magnitude));
    }
}

#[test]
fn single_sample_trajectory_matches_point_rasterizer() {
    let sample = Sample::new(5.0, 5.0, 10.0);
    let mut set = TrajectorySet::default();
    set.insert(EntityId::from("lone"), vec![smallvec![sample]]);

    let engine = Sstd::default();
    let (grid, volume) = engine.density_volume(&set).unwrap();
    // One entity, one trajectory: both normalizations divide by one, so the
    // aggregate equals the raw point stamp.
    assert_eq!(volume, density_around_one_point(&sample, &grid));
}
