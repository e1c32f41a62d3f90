//! # sstd
//!
//! Stacked space-time density estimation for tracked-movement trajectories.
//!
//! Timestamped position records of multiple tracked entities are turned into a
//! volumetric density field over (projected-x, projected-y, normalized-time):
//! a moving kernel along each trajectory segment estimates how densely the
//! combined set of trajectories occupies each voxel. Per-entity and
//! cross-entity averaging keep well-observed entities from dominating, and the
//! extractor reduces the dense field to a sparse, renderable point cloud with
//! geographic coordinates attached.
//!
//! The [`sstd::Sstd`] façade runs the whole pipeline; the individual stages
//! ([`grid`], [`rasterize`], [`aggregate`], [`extract`]) are public for hosts
//! that need the intermediates.

pub mod aggregate;
pub mod constants;
pub mod extract;
pub mod grid;
pub mod kernel;
pub mod projection;
pub mod rasterize;
pub mod sstd;
pub mod sstd_errors;
pub mod trajectories;
pub mod volume;

pub use crate::constants::{EntityId, Trajectory, TrajectorySet};
pub use crate::extract::DensityPoint;
pub use crate::sstd_errors::SstdError;
