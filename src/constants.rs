//! # Constants and type definitions for sstd
//!
//! This module centralizes the **unit aliases**, **identifier types**, and **container
//! definitions** used throughout the `sstd` library.
//!
//! ## Overview
//!
//! - Unit aliases for planar, geographic, and temporal quantities
//! - The [`EntityId`] identifier for tracked entities
//! - Container types for storing trajectories ([`Trajectory`], [`TrajectorySet`])
//! - The admission-control bound on the planar spread of a data slice
//!
//! These definitions are used by all main modules, including the grid builder, the
//! rasterizers, and the aggregation pipeline.

use crate::trajectories::Sample;
use ahash::RandomState;
use smallvec::SmallVec;
use std::collections::HashMap;

// -------------------------------------------------------------------------------------------------
// Physical constants and bounds
// -------------------------------------------------------------------------------------------------

/// Earth equatorial radius in meters (GRS1980/WGS84), the sphere radius of the
/// spherical Mercator projection.
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Largest planar spread (meters) a data slice may cover before the engine
/// refuses to build a grid for it. Spreads above this bound would allocate
/// arbitrarily large volumes, so the check runs before any allocation.
pub const MAX_RAW_SPREAD: Meter = 1_000_000.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in meters (planar projected units; the temporal axis is rescaled
/// into the same units)
pub type Meter = f64;
/// Seconds since the Unix epoch
pub type UnixSeconds = f64;

// -------------------------------------------------------------------------------------------------
// Identifiers and data containers
// -------------------------------------------------------------------------------------------------

/// Identifier of a tracked entity (an individual whose movement is recorded).
///
/// This can be:
/// - A numeric tag identifier (e.g. `Int(42)`)
/// - A named identifier as found in tracking studies (e.g. `"gull-221"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum EntityId {
    /// Integer-based tag identifier
    Int(u32),
    /// String-based identifier
    String(String),
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::Int(n) => write!(f, "{n}"),
            EntityId::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<u32> for EntityId {
    fn from(n: u32) -> Self {
        EntityId::Int(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::String(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::String(s.to_string())
    }
}

impl std::str::FromStr for EntityId {
    type Err = std::num::ParseIntError;

    /// Try to parse an `EntityId` from a string.
    /// - Pure digits → `Int(u32)`
    /// - Otherwise  → `String(String)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u32>() {
            Ok(n) => Ok(EntityId::Int(n)),
            Err(e) => {
                if s.chars().any(|c| !c.is_ascii_digit()) {
                    Ok(EntityId::String(s.to_string()))
                } else {
                    Err(e)
                }
            }
        }
    }
}

/// A small, inline-optimized container for the time-ordered samples of a single
/// (entity, day) trajectory.
pub type Trajectory = SmallVec<[Sample; 6]>;

/// All trajectories of a data slice, one bucket per entity holding that
/// entity's per-day trajectories in day order.
pub type TrajectorySet = HashMap<EntityId, Vec<Trajectory>, RandomState>;
