//! # Sstd: the stacked space-time density pipeline façade
//!
//! This module defines the [`Sstd`] struct, the central façade that wires together:
//!
//! 1. **The projection capability** — the planar ↔ geographic transform used at the
//!    ingestion and extraction boundaries, held as `Arc<dyn Projection>`.
//! 2. **Grid construction** — the shared cubic voxel grid of one run
//!    ([`VoxelGrid`](crate::grid::VoxelGrid)).
//! 3. **Aggregation** — rasterization and the two-level normalization
//!    ([`stacked_density`](crate::aggregate::stacked_density)).
//! 4. **Extraction** — thresholding and back-projection into
//!    [`DensityPoint`](crate::extract::DensityPoint)s.
//!
//! ## Typical usage
//!
//! ```
//! use sstd::sstd::Sstd;
//! use sstd::trajectories::GeoRecord;
//!
//! let records = vec![
//!     GeoRecord::new(1u32, -1.90030, 52.48660, 1_600_000_000.0),
//!     GeoRecord::new(1u32, -1.90010, 52.48670, 1_600_000_600.0),
//!     GeoRecord::new(2u32, -1.90050, 52.48655, 1_600_000_300.0),
//! ];
//!
//! let engine = Sstd::default();
//! let points = engine.generate_from_geo_records(&records).unwrap();
//! assert!(points.iter().all(|p| p.density > 0.0));
//! ```
//!
//! The grid and volume live only within one call; nothing is cached between
//! runs. Hosts that want the dense intermediate call
//! [`Sstd::density_volume`] instead of [`Sstd::generate`].

use std::sync::Arc;

use crate::aggregate::{stacked_density, validate};
use crate::constants::TrajectorySet;
use crate::extract::{extract_density_points, DensityPoint};
use crate::grid::VoxelGrid;
use crate::projection::{Projection, SphericalMercator};
use crate::sstd_errors::SstdError;
use crate::trajectories::trajectory_ext::TrajectoryExt;
use crate::trajectories::GeoRecord;
use crate::volume::Volume;

/// The density engine: a projection capability plus the end-to-end pipeline.
#[derive(Clone)]
pub struct Sstd {
    projection: Arc<dyn Projection>,
}

impl Sstd {
    /// Construct an engine around the given projection.
    pub fn new(projection: Arc<dyn Projection>) -> Self {
        Sstd { projection }
    }

    /// The projection capability used at the ingestion and extraction
    /// boundaries.
    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    /// Build the shared grid and the doubly-normalized density volume for a
    /// trajectory set.
    ///
    /// Arguments
    /// -----------------
    /// * `set`: trajectories per entity, samples already projected and
    ///   time-rescaled (the ingestion layer's output)
    ///
    /// Return
    /// ------
    /// * The grid and the dense volume, for hosts that post-process or cache
    ///   the intermediate.
    pub fn density_volume(&self, set: &TrajectorySet) -> Result<(VoxelGrid, Volume), SstdError> {
        validate(set)?;
        let grid = VoxelGrid::from_samples(
            set.values().flatten().flat_map(|line| line.iter()),
        )?;
        let volume = stacked_density(set, &grid)?;
        Ok((grid, volume))
    }

    /// Run the full pipeline on an already-ingested trajectory set.
    pub fn generate(&self, set: &TrajectorySet) -> Result<Vec<DensityPoint>, SstdError> {
        let (grid, volume) = self.density_volume(set)?;
        Ok(extract_density_points(&volume, &grid, self.projection()))
    }

    /// Ingest raw records with this engine's projection and run the full
    /// pipeline.
    pub fn generate_from_geo_records(
        &self,
        records: &[GeoRecord],
    ) -> Result<Vec<DensityPoint>, SstdError> {
        let set = TrajectorySet::new_from_geo_records(self.projection(), records)?;
        self.generate(&set)
    }
}

impl Default for Sstd {
    /// An engine over spherical Mercator (EPSG:3857).
    fn default() -> Self {
        Sstd::new(Arc::new(SphericalMercator))
    }
}
