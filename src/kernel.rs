//! Geometry kernel: distance and radial decay weighting.
//!
//! Pure functions shared by both rasterizers. The decay function is a 2D
//! Epanechnikov-like linear kernel scaled by voxel area: it peaks at distance
//! zero, falls off linearly, and reaches exactly zero at the kernel radius.
//! Beyond the radius the weight is a hard zero, not a smoothed tail.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::constants::Meter;

/// Squared Euclidean distance between two points in (x, y, t) space.
#[inline]
pub fn squared_distance(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a - b).norm_squared()
}

/// Linear radial decay, valid for `0 <= distance <= kernel_size`.
///
/// `(3 / (π·kernel_size²)) · (kernel_size − distance)/kernel_size`, scaled by
/// the 2D voxel surface `voxel_size²` to yield a density contribution per
/// voxel. Callers outside the kernel radius must use [`kernel_weight`], which
/// applies the hard cutoff.
#[inline]
pub fn linear_decay(distance: Meter, kernel_size: Meter, voxel_size: Meter) -> f64 {
    let f = (3.0 / (PI * kernel_size * kernel_size)) * (kernel_size - distance) / kernel_size;
    f * voxel_size * voxel_size
}

/// Decay weight with the hard cutoff applied: exactly `0` beyond
/// `kernel_size`, [`linear_decay`] inside.
#[inline]
pub fn kernel_weight(distance: Meter, kernel_size: Meter, voxel_size: Meter) -> f64 {
    if distance > kernel_size {
        0.0
    } else {
        linear_decay(distance, kernel_size, voxel_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_matches_components() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 6.0, 3.0);
        assert_eq!(squared_distance(&a, &b), 25.0);
        assert_eq!(squared_distance(&a, &a), 0.0);
    }

    #[test]
    fn decay_peaks_at_zero_and_vanishes_at_cutoff() {
        let (k, v) = (100.0, 10.0);
        let peak = linear_decay(0.0, k, v);
        assert!((peak - 3.0 / (PI * k * k) * v * v).abs() < 1e-15);
        assert_eq!(linear_decay(k, k, v), 0.0);
        assert_eq!(kernel_weight(k + 1e-9, k, v), 0.0);
    }

    #[test]
    fn decay_is_monotone_non_increasing() {
        let (k, v) = (100.0, 10.0);
        let mut prev = f64::INFINITY;
        for step in 0..=100 {
            let d = k * step as f64 / 100.0;
            let w = kernel_weight(d, k, v);
            assert!(w >= 0.0);
            assert!(w <= prev);
            prev = w;
        }
    }

    #[test]
    fn cutoff_is_continuous() {
        let (k, v) = (100.0, 10.0);
        // Approaching the radius from below tends to the hard-cutoff value 0.
        assert!(kernel_weight(k - 1e-9, k, v) < 1e-12);
        assert_eq!(kernel_weight(k, k, v), 0.0);
    }
}
