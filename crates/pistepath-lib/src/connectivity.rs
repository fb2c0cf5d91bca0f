use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{Catalog, Segment, SegmentId};
use crate::config::EngineConfig;
use crate::geo::Coordinate;

/// Source of truth for exit connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityMode {
    /// Use a segment's `connectsTo` list when present, geometry otherwise.
    #[default]
    Precomputed,
    /// Always derive connections from endpoint geometry.
    Geometric,
}

/// Resolves which segments can be entered after leaving a given segment.
#[derive(Debug, Clone, Copy)]
pub struct ConnectivityResolver<'a> {
    catalog: &'a Catalog,
    threshold_m: f64,
    mode: ConnectivityMode,
}

impl<'a> ConnectivityResolver<'a> {
    pub fn new(catalog: &'a Catalog, config: &EngineConfig) -> Self {
        Self {
            catalog,
            threshold_m: config.connection_threshold_m,
            mode: config.connectivity_mode,
        }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// Ids reachable from the exit point(s) of `segment`.
    pub fn exit_connections(&self, segment: &Segment) -> BTreeSet<SegmentId> {
        match (&segment.connects_to, self.mode) {
            (Some(precomputed), ConnectivityMode::Precomputed) => precomputed.clone(),
            _ => self.geometric_connections(segment),
        }
    }

    /// Connections derived from endpoint distances alone.
    ///
    /// Every other segment whose entry point (either end when bidirectional)
    /// lies within the threshold of one of `segment`'s exit points.
    pub fn geometric_connections(&self, segment: &Segment) -> BTreeSet<SegmentId> {
        let index = self.catalog.endpoints();
        let mut connections = BTreeSet::new();
        for exit in segment.exit_points() {
            for hit in index.entries_within(&exit, self.threshold_m) {
                let candidate = self.catalog.segment_at(hit.segment);
                if candidate.id != segment.id {
                    connections.insert(candidate.id.clone());
                }
            }
        }
        connections
    }

    /// Catalog positions of the segments reachable from the segment at `index`.
    ///
    /// Precomputed ids missing from the catalog are skipped.
    pub(crate) fn exit_connection_indices(&self, index: usize) -> Vec<usize> {
        let segment = self.catalog.segment_at(index);
        let mut resolved: Vec<usize> = self
            .exit_connections(segment)
            .iter()
            .filter_map(|id| {
                let target = self.catalog.index_of(id);
                if target.is_none() {
                    debug!(segment = %segment.id, target = %id, "skipping unknown connection");
                }
                target
            })
            .collect();
        resolved.sort_unstable();
        resolved
    }

    /// Shortest distance in metres from an exit of `from` to an entry of `to`.
    pub fn gap_between(&self, from: &Segment, to: &Segment) -> f64 {
        min_distance(&from.exit_points(), &to.entry_points())
    }

    /// Longest exit-to-entry gap a single connection may bridge.
    ///
    /// Geometric links never exceed the threshold; precomputed lists may name
    /// segments further away.
    pub fn max_hop_gap(&self) -> f64 {
        if self.mode == ConnectivityMode::Geometric {
            return self.threshold_m;
        }
        self.catalog
            .iter()
            .filter_map(|segment| segment.connects_to.as_ref().map(|ids| (segment, ids)))
            .flat_map(|(segment, ids)| {
                ids.iter()
                    .filter_map(|id| self.catalog.lookup(id))
                    .map(move |target| self.gap_between(segment, target))
            })
            .fold(self.threshold_m, f64::max)
    }

    /// Fastest rate in km/h at which any hop can close distance to a goal.
    ///
    /// One hop covers at most the gap into a segment plus the straight-line
    /// span of the segment itself. Returns `None` when a segment takes no time
    /// yet still covers ground, since no finite speed bounds such a chain.
    pub fn optimistic_speed_kmh(&self) -> Option<f64> {
        let gap = self.max_hop_gap();
        let mut fastest: f64 = 0.0;
        for segment in self.catalog.iter() {
            let reach = segment.entry().distance_to(&segment.exit()) + gap;
            let minutes = segment.estimated_minutes();
            if minutes <= 0.0 {
                if reach > 0.0 {
                    return None;
                }
                continue;
            }
            fastest = fastest.max(reach / 1000.0 / (minutes / 60.0));
        }
        Some(fastest)
    }

    /// Whether `to` can be entered after `from`, by list or by proximity.
    pub fn connects(&self, from: &Segment, to: &Segment) -> bool {
        self.exit_connections(from).contains(&to.id)
            || self.gap_between(from, to) <= self.threshold_m
    }
}

pub(crate) fn min_distance(from: &[Coordinate], to: &[Coordinate]) -> f64 {
    from.iter()
        .flat_map(|a| to.iter().map(move |b| a.distance_to(b)))
        .fold(f64::INFINITY, f64::min)
}
