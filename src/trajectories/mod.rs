//! Trajectory data model and ingestion.
//!
//! A [`Sample`] is one projected space-time position; a [`crate::constants::Trajectory`]
//! is one entity's time-ordered samples for a single day; a
//! [`crate::constants::TrajectorySet`] holds every entity's trajectories for one
//! data slice. The [`trajectory_ext::TrajectoryExt`] extension trait builds a set
//! from raw geographic records.

pub mod trajectory_ext;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, EntityId, Meter, UnixSeconds};

/// One projected space-time position.
///
/// `x` and `y` are planar projected meters; `t` is the normalized temporal
/// coordinate rescaled into the same linear units, so spatial and temporal
/// kernel radii are comparable. Immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: Meter,
    pub y: Meter,
    pub t: Meter,
}

impl Sample {
    pub fn new(x: Meter, y: Meter, t: Meter) -> Self {
        Sample { x, y, t }
    }

    /// View as a point in (x, y, t) space for kernel geometry.
    #[inline]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.t)
    }
}

/// One raw tracking record, before projection and temporal rescaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub entity: EntityId,
    pub lon: Degree,
    pub lat: Degree,
    pub epoch: UnixSeconds,
}

impl GeoRecord {
    pub fn new(entity: impl Into<EntityId>, lon: Degree, lat: Degree, epoch: UnixSeconds) -> Self {
        GeoRecord {
            entity: entity.into(),
            lon,
            lat,
            epoch,
        }
    }
}
