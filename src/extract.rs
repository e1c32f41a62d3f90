//! Sparse extraction of the density volume into renderable points.
//!
//! Overview
//! -----------------
//! The dense volume is flattened into one (x, y, t, density) tuple per grid
//! cell. Cells with exactly zero density are dropped, then everything at or
//! below the 50th-percentile density of the remainder. This is a deliberate
//! coarse sparsification keeping only the top half by density, not a noise
//! filter.
//!
//! Each surviving cell is back-projected to geographic coordinates through
//! the [`Projection`] capability object. The same planar (x, y) column recurs
//! across every temporal layer, so the planar→geographic mapping is cached
//! per unique pair within one extraction.
//!
//! Each point also carries a normalized magnitude in `[0, 1]`, computed from
//! the min/max density among the survivors; the host maps it to a color.

use ahash::RandomState;
use itertools::iproduct;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{Degree, Meter};
use crate::grid::VoxelGrid;
use crate::projection::Projection;
use crate::volume::Volume;

/// One retained cell of the density field, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: Meter,
    pub y: Meter,
    pub t: Meter,
    pub density: f64,
    pub lon: Degree,
    pub lat: Degree,
    /// Density rescaled to `[0, 1]` over the retained set; `0.5` when all
    /// retained densities are equal.
    pub magnitude: f64,
}

/// Densities strictly above the interpolated 50th percentile survive.
fn median(sorted: &[f64]) -> f64 {
    let m = sorted.len();
    let h = (m - 1) as f64 * 0.5;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Convert a density volume into the sparse, thresholded point list.
pub fn extract_density_points(
    volume: &Volume,
    grid: &VoxelGrid,
    projection: &dyn Projection,
) -> Vec<DensityPoint> {
    // Flatten, dropping exact zeros.
    let mut cells: Vec<(Meter, Meter, Meter, f64)> = Vec::new();
    for ((row, &y), (col, &x), (layer, &t)) in iproduct!(
        grid.y_axis().iter().enumerate(),
        grid.x_axis().iter().enumerate(),
        grid.t_axis().iter().enumerate()
    ) {
        let density = volume[(row, col, layer)];
        if density != 0.0 {
            cells.push((x, y, t, density));
        }
    }
    if cells.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<f64> = cells.iter().map(|cell| cell.3).collect();
    sorted.sort_by(f64::total_cmp);
    let cutoff = median(&sorted);
    cells.retain(|cell| cell.3 > cutoff);
    if cells.is_empty() {
        return Vec::new();
    }

    let min_density = cells.iter().map(|cell| cell.3).fold(f64::INFINITY, f64::min);
    let max_density = cells
        .iter()
        .map(|cell| cell.3)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut geographic: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), (Degree, Degree), RandomState> =
        HashMap::default();

    cells
        .into_iter()
        .map(|(x, y, t, density)| {
            let (lon, lat) = *geographic
                .entry((OrderedFloat(x), OrderedFloat(y)))
                .or_insert_with(|| projection.to_geographic(x, y));
            let magnitude = if max_density > min_density {
                (density - min_density) / (max_density - min_density)
            } else {
                0.5
            };
            DensityPoint {
                x,
                y,
                t,
                density,
                lon,
                lat,
                magnitude,
            }
        })
        .collect()
}
