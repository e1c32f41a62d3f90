//! Voxel grid construction.
//!
//! Overview
//! -----------------
//! The grid builder turns the planar bounding box of a sample set into a
//! **cubic** space-time grid: the same physical extent on the x, y, and t
//! axes, discretized at a voxel size chosen from the magnitude of the planar
//! spread. It materializes the three coordinate volumes the rasterizers
//! sample from, and exposes the temporal affine map ([`VoxelGrid::layer_of_time`])
//! both rasterizers share.
//!
//! The admission-control check refusing spreads above
//! [`MAX_RAW_SPREAD`](crate::constants::MAX_RAW_SPREAD) runs before any
//! allocation, so an oversized data slice can never cost memory.
//!
//! Extent measurement
//! -----------------
//! Spans are measured with [`extent_distance`], a signed span rather than a
//! plain subtraction, so a bounding box crossing the projection origin is
//! measured as a true span instead of a delta that could cancel.

use crate::constants::{Meter, MAX_RAW_SPREAD};
use crate::sstd_errors::SstdError;
use crate::trajectories::Sample;
use crate::volume::Volume;

/// Signed span between two scalars `a` and `b`.
///
/// * `0` when equal;
/// * when both lie on the same side of zero, the absolute difference of their
///   magnitudes, negative when `a >= b`;
/// * when they straddle zero, the sum of their magnitudes carrying the sign
///   of `b`.
pub fn extent_distance(a: Meter, b: Meter) -> Meter {
    if a == b {
        0.0
    } else if (a < 0.0 && b < 0.0) || (a > 0.0 && b >= 0.0) {
        let span = (a.abs() - b.abs()).abs();
        if a < b {
            span
        } else {
            -span
        }
    } else {
        (a.abs() + b.abs()).copysign(b)
    }
}

/// Voxel edge length and kernel radius, selected from the raw planar spread
/// of the data slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParams {
    pub voxel_size: Meter,
    pub kernel_size: Meter,
}

impl GridParams {
    /// Table lookup on the raw spread, in meters.
    ///
    /// Spreads above the 1,000,000 m bound are rejected with
    /// [`SstdError::ExtentTooLarge`] carrying the measured value.
    pub fn from_spread(raw_spread: Meter) -> Result<Self, SstdError> {
        if raw_spread > MAX_RAW_SPREAD {
            return Err(SstdError::ExtentTooLarge { spread: raw_spread });
        }
        let (voxel_size, kernel_size) = if raw_spread > 100_000.0 {
            (10_000.0, 100_000.0)
        } else if raw_spread > 10_000.0 {
            (1_000.0, 10_000.0)
        } else if raw_spread > 1_000.0 {
            (100.0, 10_000.0)
        } else {
            (10.0, 100.0)
        };
        Ok(GridParams {
            voxel_size,
            kernel_size,
        })
    }
}

/// The cubic space-time voxel grid shared by one aggregation run.
///
/// Three same-shaped coordinate volumes hold the x, y, and t coordinate of
/// every voxel, indexed `(row, col, layer)` with row ↔ y, col ↔ x, layer ↔ t.
/// Built once per run, read-only afterward.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    xcoord: Volume,
    ycoord: Volume,
    tcoord: Volume,
    x_axis: Vec<Meter>,
    y_axis: Vec<Meter>,
    t_axis: Vec<Meter>,
    voxel_size: Meter,
    kernel_size: Meter,
}

impl VoxelGrid {
    /// Derive the grid from the full set of samples of an aggregation run.
    ///
    /// Computes the planar bounding box, rejects oversized or degenerate
    /// extents, selects voxel and kernel sizes, and materializes the
    /// coordinate mesh.
    pub fn from_samples<'a, I>(samples: I) -> Result<Self, SstdError>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        let mut seen = false;
        for sample in samples {
            seen = true;
            min_x = min_x.min(sample.x);
            max_x = max_x.max(sample.x);
            min_y = min_y.min(sample.y);
            max_y = max_y.max(sample.y);
        }
        if !seen {
            return Err(SstdError::EmptyTrajectorySet);
        }
        Self::from_bounds(min_x, max_x, min_y, max_y)
    }

    /// Build the grid for an explicit planar bounding box.
    pub fn from_bounds(
        min_x: Meter,
        max_x: Meter,
        min_y: Meter,
        max_y: Meter,
    ) -> Result<Self, SstdError> {
        let raw_spread = extent_distance(min_x, max_x).max(extent_distance(min_y, max_y));
        let params = GridParams::from_spread(raw_spread)?;
        let v = params.voxel_size;

        // Snap the bounding box outward to voxel boundaries; the largest
        // snapped span becomes the shared extent of all three axes.
        let start_x = (min_x / v).floor() * v;
        let start_y = (min_y / v).floor() * v;
        let x_span = extent_distance(start_x, (max_x / v).ceil() * v);
        let y_span = extent_distance(start_y, (max_y / v).ceil() * v);
        let extent = x_span.max(y_span);
        if extent <= 0.0 {
            return Err(SstdError::DegenerateExtent);
        }

        let steps = (extent / v).floor() as usize + 1;
        let spacing = extent / (steps - 1) as f64;
        let x_axis: Vec<Meter> = (0..steps).map(|i| start_x + i as f64 * spacing).collect();
        let y_axis: Vec<Meter> = (0..steps).map(|j| start_y + j as f64 * spacing).collect();
        let t_axis: Vec<Meter> = (0..steps).map(|k| k as f64 * spacing).collect();

        let mut xcoord = Volume::zeros(steps, steps, steps);
        let mut ycoord = Volume::zeros(steps, steps, steps);
        let mut tcoord = Volume::zeros(steps, steps, steps);
        for row in 0..steps {
            for col in 0..steps {
                for layer in 0..steps {
                    xcoord[(row, col, layer)] = x_axis[col];
                    ycoord[(row, col, layer)] = y_axis[row];
                    tcoord[(row, col, layer)] = t_axis[layer];
                }
            }
        }

        Ok(VoxelGrid {
            xcoord,
            ycoord,
            tcoord,
            x_axis,
            y_axis,
            t_axis,
            voxel_size: v,
            kernel_size: params.kernel_size,
        })
    }

    /// Number of voxels along each axis.
    pub fn steps(&self) -> usize {
        self.t_axis.len()
    }

    pub fn voxel_size(&self) -> Meter {
        self.voxel_size
    }

    pub fn kernel_size(&self) -> Meter {
        self.kernel_size
    }

    pub fn xcoord(&self) -> &Volume {
        &self.xcoord
    }

    pub fn ycoord(&self) -> &Volume {
        &self.ycoord
    }

    pub fn tcoord(&self) -> &Volume {
        &self.tcoord
    }

    pub fn x_axis(&self) -> &[Meter] {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &[Meter] {
        &self.y_axis
    }

    pub fn t_axis(&self) -> &[Meter] {
        &self.t_axis
    }

    /// Temporal layer whose coordinate is nearest to `t`, clamped to the
    /// axis. Both rasterizers locate layers through this map.
    pub fn layer_of_time(&self, t: Meter) -> usize {
        let last = self.t_axis.len() - 1;
        let spacing = self.t_axis[1] - self.t_axis[0];
        let raw = ((t - self.t_axis[0]) / spacing).round();
        raw.clamp(0.0, last as f64) as usize
    }

    /// Fresh zero-filled volume matching the grid shape.
    pub fn empty_volume(&self) -> Volume {
        let n = self.steps();
        Volume::zeros(n, n, n)
    }
}
