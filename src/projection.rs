//! Planar ↔ geographic coordinate transforms.
//!
//! The density engine works in projected planar meters and only touches
//! geographic coordinates at its boundaries: once when ingesting raw records
//! and once when the extractor attaches longitude/latitude to the surviving
//! density cells. Both crossings go through the [`Projection`] capability
//! object, passed explicitly into the pipeline; there is no global projection
//! state.
//!
//! [`SphericalMercator`] is the provided implementation (EPSG:3857, the
//! spherical "web" Mercator on the WGS84 equatorial radius). Hosts with their
//! own projection stack implement [`Projection`] instead.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::constants::{Degree, Meter, EARTH_MAJOR_AXIS};

/// A planar map projection, used as a black-box coordinate transform.
///
/// `to_planar` and `to_geographic` must be exact inverses of each other up to
/// floating-point tolerance.
pub trait Projection: Send + Sync {
    /// Project a geographic (longitude, latitude) pair, in degrees, to planar
    /// (x, y) coordinates in meters.
    fn to_planar(&self, lon: Degree, lat: Degree) -> (Meter, Meter);

    /// Invert the projection: planar (x, y) meters back to (longitude,
    /// latitude) degrees.
    fn to_geographic(&self, x: Meter, y: Meter) -> (Degree, Degree);
}

/// Spherical Mercator (EPSG:3857).
#[derive(Debug, Clone, Copy, Default)]
pub struct SphericalMercator;

impl Projection for SphericalMercator {
    fn to_planar(&self, lon: Degree, lat: Degree) -> (Meter, Meter) {
        let x = EARTH_MAJOR_AXIS * lon.to_radians();
        let y = EARTH_MAJOR_AXIS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        (x, y)
    }

    fn to_geographic(&self, x: Meter, y: Meter) -> (Degree, Degree) {
        let lon = (x / EARTH_MAJOR_AXIS).to_degrees();
        let lat = (2.0 * (y / EARTH_MAJOR_AXIS).exp().atan() - FRAC_PI_2).to_degrees();
        (lon, lat)
    }
}
