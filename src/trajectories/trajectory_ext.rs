//! Building a [`TrajectorySet`] from raw tracking records.
//!
//! Overview
//! -----------------
//! Hosts hand the engine raw per-entity records: (entity, longitude,
//! latitude, epoch) rows in arbitrary order. This module turns them into the
//! engine's working form:
//!
//! 1. Project `(lon, lat)` to planar meters through the [`Projection`]
//!    capability object.
//! 2. Split each entity's records into **one trajectory per UTC day** (the day
//!    bucket is the floor of the epoch's Modified Julian Date).
//! 3. Order the samples of every trajectory by time.
//! 4. Rescale the elapsed-time fraction of each record into planar units:
//!    `t = (epoch − start) / duration · spread`, where `spread` is the largest
//!    planar coordinate span of the whole batch. This makes spatial and
//!    temporal kernel radii comparable, and is a precondition of the grid
//!    builder.
//!
//! The rescaling is defined over the **whole batch**, so a set is built in one
//! shot rather than appended to: feeding records in two batches would scale
//! their temporal axes differently.
//!
//! Errors
//! -----------------
//! An empty batch is rejected with [`SstdError::EmptyRecordBatch`]. Column
//! slices of mismatched lengths are a programming error and panic.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::HashMap;

use ahash::RandomState;
use hifitime::Epoch;
use ordered_float::OrderedFloat;

use crate::constants::{Degree, EntityId, Meter, Trajectory, TrajectorySet, UnixSeconds};
use crate::grid::extent_distance;
use crate::projection::Projection;
use crate::sstd_errors::SstdError;
use crate::trajectories::{GeoRecord, Sample};

/// A thin, column-oriented view used to ingest tracking records without
/// copying when the host already holds columnar data.
///
/// All four columns must have the same length; row `i` of each column forms
/// one record.
#[derive(Debug, Clone)]
pub struct RecordBatch<'a> {
    pub entities: Cow<'a, [EntityId]>,
    pub lon: Cow<'a, [Degree]>,
    pub lat: Cow<'a, [Degree]>,
    pub epoch: Cow<'a, [UnixSeconds]>,
}

impl<'a> RecordBatch<'a> {
    /// Borrow columns the host already owns.
    pub fn from_slices(
        entities: &'a [EntityId],
        lon: &'a [Degree],
        lat: &'a [Degree],
        epoch: &'a [UnixSeconds],
    ) -> Self {
        RecordBatch {
            entities: Cow::Borrowed(entities),
            lon: Cow::Borrowed(lon),
            lat: Cow::Borrowed(lat),
            epoch: Cow::Borrowed(epoch),
        }
    }

    /// Build an owned batch from row-oriented records.
    pub fn from_records(records: &[GeoRecord]) -> RecordBatch<'static> {
        RecordBatch {
            entities: Cow::Owned(records.iter().map(|r| r.entity.clone()).collect()),
            lon: Cow::Owned(records.iter().map(|r| r.lon).collect()),
            lat: Cow::Owned(records.iter().map(|r| r.lat).collect()),
            epoch: Cow::Owned(records.iter().map(|r| r.epoch).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// UTC day bucket of an epoch: the floor of its Modified Julian Date.
///
/// MJD days begin at midnight UTC, so consecutive records of one entity land
/// in the same bucket exactly when they fall on the same calendar day.
pub fn utc_day_of(epoch: UnixSeconds) -> i64 {
    Epoch::from_unix_seconds(epoch).to_mjd_utc_days().floor() as i64
}

/// Constructors for [`TrajectorySet`] over raw tracking records.
pub trait TrajectoryExt: Sized {
    /// Build a trajectory set from a columnar record batch.
    ///
    /// Arguments
    /// -----------------
    /// * `projection`: planar projection used for every record
    /// * `batch`: the records; all columns must have equal length
    ///
    /// Return
    /// ------
    /// * One bucket per entity, holding its per-day trajectories in day
    ///   order, samples time-ordered, `t` rescaled into planar units.
    fn new_from_records(
        projection: &dyn Projection,
        batch: &RecordBatch<'_>,
    ) -> Result<Self, SstdError>;

    /// Convenience over [`TrajectoryExt::new_from_records`] for row-oriented
    /// records.
    fn new_from_geo_records(
        projection: &dyn Projection,
        records: &[GeoRecord],
    ) -> Result<Self, SstdError> {
        Self::new_from_records(projection, &RecordBatch::from_records(records))
    }
}

impl TrajectoryExt for TrajectorySet {
    fn new_from_records(
        projection: &dyn Projection,
        batch: &RecordBatch<'_>,
    ) -> Result<Self, SstdError> {
        if batch.is_empty() {
            return Err(SstdError::EmptyRecordBatch);
        }
        let n = batch.len();
        assert_eq!(batch.lon.len(), n, "record batch columns differ in length");
        assert_eq!(batch.lat.len(), n, "record batch columns differ in length");
        assert_eq!(batch.epoch.len(), n, "record batch columns differ in length");

        // Project every record up front; the spread and the temporal rescale
        // both need the full planar picture.
        let planar: Vec<(Meter, Meter)> = batch
            .lon
            .iter()
            .zip(batch.lat.iter())
            .map(|(&lon, &lat)| projection.to_planar(lon, lat))
            .collect();

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in &planar {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
        let spread = extent_distance(min_x, max_x).max(extent_distance(min_y, max_y));

        let start = batch.epoch.iter().copied().fold(f64::INFINITY, f64::min);
        let end = batch.epoch.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let duration = end - start;

        // Group into (entity, day) buckets; BTreeMap keeps days ordered.
        let mut grouped: HashMap<EntityId, BTreeMap<i64, Trajectory>, RandomState> =
            HashMap::default();
        for i in 0..n {
            let epoch = batch.epoch[i];
            let t = if duration > 0.0 {
                (epoch - start) / duration * spread
            } else {
                // A single temporal instant has no elapsed fraction.
                0.0
            };
            let (x, y) = planar[i];
            grouped
                .entry(batch.entities[i].clone())
                .or_default()
                .entry(utc_day_of(epoch))
                .or_default()
                .push(Sample::new(x, y, t));
        }

        let mut set = TrajectorySet::default();
        for (entity, days) in grouped {
            let trajectories = days
                .into_values()
                .map(|mut trajectory| {
                    trajectory.sort_by_key(|s| OrderedFloat(s.t));
                    trajectory
                })
                .collect();
            set.insert(entity, trajectories);
        }
        Ok(set)
    }
}
