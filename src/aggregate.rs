//! Aggregation of per-trajectory densities into the stacked field.
//!
//! Overview
//! -----------------
//! For every entity, each of its trajectories is rasterized and summed into an
//! entity-level volume, which is then divided by the entity's trajectory
//! count: an entity observed on more days must not dominate the result. The
//! entity volumes are summed into the total and divided by the entity count.
//!
//! Entity volumes are independent until the final summation, so they are
//! computed in parallel; the cross-entity reduction itself is a sequential
//! fold over the collected volumes, and each entity sums its trajectories in
//! day order, so the floating-point summation order is fixed for a given set
//! iteration order.
//!
//! All input preconditions are checked by [`validate`] **before** the grid is
//! built: a violation never allocates a volume.

use rayon::prelude::*;

use crate::constants::{Trajectory, TrajectorySet};
use crate::grid::VoxelGrid;
use crate::rasterize::{density_around_one_point, density_around_trajectory};
use crate::sstd_errors::SstdError;
use crate::volume::Volume;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Check the aggregation preconditions: a non-empty entity set, at least one
/// trajectory per entity, at least one sample per trajectory.
pub fn validate(set: &TrajectorySet) -> Result<(), SstdError> {
    if set.is_empty() {
        return Err(SstdError::EmptyTrajectorySet);
    }
    for (entity, trajectories) in set {
        if trajectories.is_empty() {
            return Err(SstdError::EntityWithoutTrajectories(entity.clone()));
        }
        if trajectories.iter().any(|line| line.is_empty()) {
            return Err(SstdError::EmptyTrajectory(entity.clone()));
        }
    }
    Ok(())
}

/// Rasterize and average one entity's trajectories.
fn entity_density(trajectories: &[Trajectory], grid: &VoxelGrid) -> Volume {
    let mut accumulated = grid.empty_volume();
    for line in trajectories {
        let density = if line.len() > 1 {
            density_around_trajectory(line, grid)
        } else {
            density_around_one_point(&line[0], grid)
        };
        accumulated += &density;
    }
    accumulated /= trajectories.len() as f64;
    accumulated
}

/// Compute the stacked, doubly-normalized density volume of a trajectory set
/// on the given grid.
pub fn stacked_density(set: &TrajectorySet, grid: &VoxelGrid) -> Result<Volume, SstdError> {
    validate(set)?;

    let entities: Vec<&Vec<Trajectory>> = set.values().collect();

    #[cfg(feature = "progress")]
    let bar = {
        let bar = ProgressBar::new(entities.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} entities | ETA {eta}")
                .expect("indicatif template"),
        );
        bar
    };

    let volumes: Vec<Volume> = entities
        .par_iter()
        .map(|trajectories| {
            let volume = entity_density(trajectories, grid);
            #[cfg(feature = "progress")]
            bar.inc(1);
            volume
        })
        .collect();

    #[cfg(feature = "progress")]
    bar.finish_and_clear();

    let mut total = grid.empty_volume();
    for volume in &volumes {
        total += volume;
    }
    total /= entities.len() as f64;
    Ok(total)
}
