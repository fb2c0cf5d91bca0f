//! KD-tree index over segment endpoints for radius queries.
//!
//! Every distinct endpoint position in the catalog is stored once, together
//! with the segments that enter or leave there. Queries run against the
//! earth-centred cartesian position of each endpoint: a chord radius query
//! returns a superset of the great-circle matches, which are then filtered by
//! exact haversine distance.
//!
//! Deduplicating positions keeps identical snapped station coordinates from
//! piling up in a single KD-tree bucket.

use std::collections::HashMap;
use std::fmt;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::catalog::Segment;
use crate::geo::Coordinate;

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Role a segment endpoint plays at an indexed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointRole {
    Entry,
    Exit,
}

/// A segment endpoint found by a radius query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointMatch {
    /// Position of the segment in catalog order.
    pub segment: usize,
    pub role: EndpointRole,
    /// Haversine distance from the query point in metres.
    pub distance: f64,
}

#[derive(Debug, Clone)]
struct IndexNode {
    coordinate: Coordinate,
    members: Vec<(usize, EndpointRole)>,
}

/// Spatial index of segment entry and exit points.
pub struct EndpointIndex {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<IndexNode>,
}

impl fmt::Debug for EndpointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointIndex")
            .field("positions", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

impl EndpointIndex {
    /// Index the entry and exit points of `segments`.
    ///
    /// Bidirectional segments register both ends in both roles. Segment
    /// positions in the index are the slice indices of `segments`.
    pub fn build(segments: &[Segment]) -> Self {
        let mut nodes: Vec<IndexNode> = Vec::new();
        let mut by_position: HashMap<(u64, u64), usize> = HashMap::new();

        let mut register = |coordinate: Coordinate, segment: usize, role: EndpointRole| {
            let key = (
                coordinate.longitude.to_bits(),
                coordinate.latitude.to_bits(),
            );
            let node = *by_position.entry(key).or_insert_with(|| {
                nodes.push(IndexNode {
                    coordinate,
                    members: Vec::new(),
                });
                nodes.len() - 1
            });
            nodes[node].members.push((segment, role));
        };

        for (index, segment) in segments.iter().enumerate() {
            for entry in segment.entry_points() {
                register(entry, index, EndpointRole::Entry);
            }
            for exit in segment.exit_points() {
                register(exit, index, EndpointRole::Exit);
            }
        }

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, node) in nodes.iter().enumerate() {
            tree.add(&node.coordinate.to_cartesian(), index);
        }

        debug!(positions = nodes.len(), "built endpoint index");

        Self { tree, nodes }
    }

    /// Number of distinct indexed positions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every endpoint with the given role within `radius_m` of `point`.
    ///
    /// A segment appears at most once, at its closest qualifying endpoint.
    /// Results are sorted by distance, then by segment position.
    pub fn within(
        &self,
        point: &Coordinate,
        radius_m: f64,
        role: EndpointRole,
    ) -> Vec<EndpointMatch> {
        if radius_m < 0.0 || self.nodes.is_empty() {
            return Vec::new();
        }

        let query = point.to_cartesian();
        let candidates = self
            .tree
            .within::<SquaredEuclidean>(&query, radius_m * radius_m);

        let mut closest: HashMap<usize, f64> = HashMap::new();
        for neighbour in candidates {
            let node = &self.nodes[neighbour.item];
            let distance = point.distance_to(&node.coordinate);
            if distance > radius_m {
                continue;
            }
            for &(segment, member_role) in &node.members {
                if member_role != role {
                    continue;
                }
                closest
                    .entry(segment)
                    .and_modify(|best| *best = best.min(distance))
                    .or_insert(distance);
            }
        }

        let mut matches: Vec<EndpointMatch> = closest
            .into_iter()
            .map(|(segment, distance)| EndpointMatch {
                segment,
                role,
                distance,
            })
            .collect();
        matches.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.segment.cmp(&b.segment))
        });
        matches
    }

    /// Segments that can be entered within `radius_m` of `point`.
    pub fn entries_within(&self, point: &Coordinate, radius_m: f64) -> Vec<EndpointMatch> {
        self.within(point, radius_m, EndpointRole::Entry)
    }

    /// Segments that can be left within `radius_m` of `point`.
    pub fn exits_within(&self, point: &Coordinate, radius_m: f64) -> Vec<EndpointMatch> {
        self.within(point, radius_m, EndpointRole::Exit)
    }
}
