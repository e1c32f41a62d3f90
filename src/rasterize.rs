//! Kernel rasterization of trajectories into density volumes.
//!
//! Overview
//! -----------------
//! [`density_around_trajectory`] walks a trajectory segment by segment. For
//! each sample it pairs the first later sample that is **more than one voxel
//! row away in time** (subsampling dense fixes to the grid's temporal
//! resolution), finds the temporal layers the pair spans, interpolates a
//! representative point on the segment at each layer, and stamps the kernel
//! around it.
//!
//! [`density_around_one_point`] is the degenerate single-sample case: the
//! kernel is stamped on the one layer containing the sample.
//!
//! Semantics
//! -----------------
//! Stamping a layer **assigns** every voxel of that layer: a later visit to
//! the same layer within one trajectory pass overwrites the earlier values,
//! it does not accumulate. Accumulation happens one level up, across
//! trajectories, in [`crate::aggregate`].

use nalgebra::Vector3;

use crate::grid::VoxelGrid;
use crate::kernel::{kernel_weight, squared_distance};
use crate::trajectories::Sample;
use crate::volume::Volume;

/// Density volume of one trajectory with at least two samples.
///
/// The trajectory must be ordered by increasing `t`.
pub fn density_around_trajectory(line: &[Sample], grid: &VoxelGrid) -> Volume {
    debug_assert!(line.len() >= 2);
    let mut vcoord = grid.empty_volume();
    let points = line.len();

    let mut n = 0;
    while n < points - 1 {
        // First later sample more than a voxel row away in time; the last
        // sample if none is.
        let mut n1 = n + 1;
        while n1 < points - 1 && line[n1].t - line[n].t <= grid.voxel_size() {
            n1 += 1;
        }

        let pn = line[n].to_vector();
        let pn1 = line[n1].to_vector();
        let layer_n = grid.layer_of_time(line[n].t);
        let layer_n1 = grid.layer_of_time(line[n1].t);
        let (kn, kn1) = (layer_n.min(layer_n1), layer_n.max(layer_n1));

        for k in kn..=kn1 {
            // Representative point on the segment at layer k; the midpoint
            // when the whole segment sits in a single layer.
            let p = if kn == kn1 {
                0.5
            } else {
                (k - kn) as f64 / (kn1 - kn) as f64
            };
            let interpolated = pn + (pn1 - pn) * p;
            stamp_layer(&mut vcoord, grid, k, &interpolated);
        }
        n += 1;
    }
    vcoord
}

/// Density volume of a single-sample trajectory: the kernel stamped on the
/// one temporal layer containing the sample.
pub fn density_around_one_point(sample: &Sample, grid: &VoxelGrid) -> Volume {
    let mut vcoord = grid.empty_volume();
    let layer = grid.layer_of_time(sample.t);
    stamp_layer(&mut vcoord, grid, layer, &sample.to_vector());
    vcoord
}

/// Assign the kernel weight around `center` to every voxel of one temporal
/// layer. Voxels beyond the kernel radius are assigned exactly zero.
fn stamp_layer(vcoord: &mut Volume, grid: &VoxelGrid, layer: usize, center: &Vector3<f64>) {
    let steps = grid.steps();
    for row in 0..steps {
        for col in 0..steps {
            let voxel = Vector3::new(
                grid.xcoord()[(row, col, layer)],
                grid.ycoord()[(row, col, layer)],
                grid.tcoord()[(row, col, layer)],
            );
            let dist = squared_distance(&voxel, center).sqrt();
            vcoord[(row, col, layer)] = kernel_weight(dist, grid.kernel_size(), grid.voxel_size());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::linear_decay;

    fn small_grid() -> VoxelGrid {
        // voxel 10, kernel 100, axes 0..50, 6 steps.
        VoxelGrid::from_bounds(5.0, 45.0, 5.0, 40.0).unwrap()
    }

    #[test]
    fn single_point_touches_one_layer_only() {
        let grid = small_grid();
        let sample = Sample::new(5.0, 5.0, 10.0);
        let vcoord = density_around_one_point(&sample, &grid);
        let layer = grid.layer_of_time(10.0);
        assert_eq!(layer, 1);
        for row in 0..grid.steps() {
            for col in 0..grid.steps() {
                for k in 0..grid.steps() {
                    if k != layer {
                        assert_eq!(vcoord[(row, col, k)], 0.0);
                    }
                }
            }
        }
        // Within the layer, the kernel covers the whole 50 m grid.
        assert!(vcoord[(0, 0, layer)] > 0.0);
        let d = squared_distance(&Vector3::new(0.0, 0.0, 10.0), &sample.to_vector()).sqrt();
        let expected = linear_decay(d, grid.kernel_size(), grid.voxel_size());
        assert!((vcoord[(0, 0, layer)] - expected).abs() < 1e-15);
    }

    #[test]
    fn cells_beyond_kernel_radius_are_zero() {
        // A 900 m spread keeps the 100 m kernel while the grid diagonal
        // reaches well beyond it.
        let grid = VoxelGrid::from_bounds(0.0, 900.0, 0.0, 900.0).unwrap();
        assert_eq!(grid.kernel_size(), 100.0);
        let sample = Sample::new(0.0, 0.0, 0.0);
        let vcoord = density_around_one_point(&sample, &grid);
        let layer = grid.layer_of_time(0.0);
        // (900, 900) is ~1273 m from the sample, far beyond the 100 m radius.
        let far = (grid.steps() - 1, grid.steps() - 1, layer);
        assert_eq!(vcoord[far], 0.0);
        // Every cell is non-negative.
        assert!(vcoord.as_slice().iter().all(|&d| d >= 0.0));
    }

    #[test]
    fn segment_in_one_layer_uses_midpoint() {
        let grid = small_grid();
        // Both samples round to layer 0; the representative point is the
        // segment midpoint (25, 5, 2).
        let line = [Sample::new(20.0, 5.0, 1.0), Sample::new(30.0, 5.0, 3.0)];
        let vcoord = density_around_trajectory(&line, &grid);
        // Only layer 0 is touched.
        for k in 1..grid.steps() {
            for row in 0..grid.steps() {
                for col in 0..grid.steps() {
                    assert_eq!(vcoord[(row, col, k)], 0.0);
                }
            }
        }
        // Columns equidistant from x = 25 carry equal weight.
        assert!(vcoord[(0, 2, 0)] > 0.0);
        assert_eq!(vcoord[(0, 2, 0)], vcoord[(0, 3, 0)]);
        assert_eq!(vcoord[(1, 2, 0)], vcoord[(1, 3, 0)]);
    }

    #[test]
    fn segment_spanning_layers_interpolates_each() {
        let grid = small_grid();
        let line = [Sample::new(0.0, 0.0, 0.0), Sample::new(40.0, 0.0, 40.0)];
        let vcoord = density_around_trajectory(&line, &grid);
        // Layers 0..=4 are stamped, 5 is not.
        for k in 0..=4 {
            assert!(vcoord[(0, k, k)] > 0.0, "layer {k} untouched");
        }
        for row in 0..grid.steps() {
            for col in 0..grid.steps() {
                assert_eq!(vcoord[(row, col, 5)], 0.0);
            }
        }
        // At layer k the interpolated point is (10k, 0, 10k): the voxel on
        // top of it carries the peak weight for that layer.
        let peak = linear_decay(0.0, grid.kernel_size(), grid.voxel_size());
        assert!((vcoord[(0, 2, 2)] - peak).abs() < 1e-15);
    }

    #[test]
    fn later_segment_overwrites_shared_layer() {
        let grid = small_grid();
        // Segments (s0, s1) and (s1, s2) both stamp layer 2 (t = 20); the
        // pass must leave the *second* segment's values in place, once.
        let s0 = Sample::new(0.0, 0.0, 0.0);
        let s1 = Sample::new(20.0, 0.0, 20.0);
        let s2 = Sample::new(40.0, 40.0, 40.0);
        let full = density_around_trajectory(&[s0, s1, s2], &grid);
        let second_only = density_around_trajectory(&[s1, s2], &grid);
        let shared_layer = 2;
        for row in 0..grid.steps() {
            for col in 0..grid.steps() {
                assert_eq!(
                    full[(row, col, shared_layer)],
                    second_only[(row, col, shared_layer)]
                );
            }
        }
    }
}
