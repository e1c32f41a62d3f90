use thiserror::Error;

use crate::constants::{EntityId, Meter};

/// Failure conditions of the density engine.
///
/// Every precondition violation is detected **before** grid construction, so a
/// failed run never allocates a partial grid or volume. None of these
/// conditions is retryable with the same input; the host may retry with a
/// narrower data slice (shorter time window, fewer entities) to shrink the
/// measured spread below the admission bound.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SstdError {
    #[error("Trajectory set is empty: at least one entity is required")]
    EmptyTrajectorySet,

    #[error("Entity {0} has no trajectories")]
    EntityWithoutTrajectories(EntityId),

    #[error("Entity {0} has a trajectory with no samples")]
    EmptyTrajectory(EntityId),

    #[error("No records provided: a batch must contain at least one record")]
    EmptyRecordBatch,

    #[error("Geographic span too large: measured spread of {spread} m exceeds the 1,000,000 m bound")]
    ExtentTooLarge { spread: Meter },

    #[error("Degenerate grid extent: all samples coincide on voxel boundaries")]
    DegenerateExtent,
}
