//! Route planning between two segment endpoints.
//!
//! This module provides:
//! - [`RoutePoint`] - a `(segment, start|end)` anchor for the search
//! - [`RouteRequest`] - endpoints, difficulty ceiling and search budget
//! - [`RoutePlan`] - the planned segment sequence
//! - [`plan_route`] - main entry point returning `Result<RoutePlan>`
//! - [`find_route`] - the same search folded into a [`RouteOutcome`]
//!
//! # Example
//!
//! ```no_run
//! use pistepath_lib::{load_catalog, plan_route, EngineConfig, RoutePoint, RouteRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = load_catalog(std::path::Path::new("catalog.json"))?;
//! let request = RouteRequest::new(
//!     RoutePoint::start("lift-village"),
//!     RoutePoint::end("piste-blue-run"),
//! );
//! let plan = plan_route(&catalog, &EngineConfig::default(), &request)?;
//! println!("{} segments, {:.1} min", plan.steps.len(), plan.total_minutes);
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, Difficulty, Segment, SegmentCategory, SegmentId};
use crate::config::EngineConfig;
use crate::connectivity::ConnectivityResolver;
use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::search::{AStarSearch, SearchBudget, SearchResult};

/// Which end of a segment a [`RoutePoint`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointPosition {
    Start,
    End,
}

impl fmt::Display for EndpointPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndpointPosition::Start => "start",
            EndpointPosition::End => "end",
        })
    }
}

/// Search anchor: one end of a catalog segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutePoint {
    pub segment: SegmentId,
    pub position: EndpointPosition,
}

impl RoutePoint {
    pub fn start(segment: impl Into<SegmentId>) -> Self {
        Self {
            segment: segment.into(),
            position: EndpointPosition::Start,
        }
    }

    pub fn end(segment: impl Into<SegmentId>) -> Self {
        Self {
            segment: segment.into(),
            position: EndpointPosition::End,
        }
    }

    /// Parse `id`, `id:start` or `id:end`, using `default` when no suffix is given.
    pub fn parse_with_default(value: &str, default: EndpointPosition) -> Self {
        match value.rsplit_once(':') {
            Some((segment, "start")) => Self::start(segment),
            Some((segment, "end")) => Self::end(segment),
            _ => Self {
                segment: value.to_string(),
                position: default,
            },
        }
    }

    /// Coordinate of this anchor in the catalog.
    pub fn resolve(&self, catalog: &Catalog) -> Result<Coordinate> {
        let segment = catalog
            .lookup(&self.segment)
            .ok_or_else(|| Error::InvalidEndpoint {
                id: self.segment.clone(),
            })?;
        Ok(match self.position {
            EndpointPosition::Start => segment.entry(),
            EndpointPosition::End => segment.exit(),
        })
    }
}

impl fmt::Display for RoutePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.segment, self.position)
    }
}

impl FromStr for RoutePoint {
    type Err = std::convert::Infallible;

    /// Bare ids anchor at the segment's start.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse_with_default(value, EndpointPosition::Start))
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: RoutePoint,
    pub end: RoutePoint,
    /// Hardest slope difficulty allowed; `None` allows everything.
    pub max_difficulty: Option<Difficulty>,
    /// Overrides the budget derived from [`EngineConfig`] when set.
    pub budget: Option<SearchBudget>,
}

impl RouteRequest {
    pub fn new(start: RoutePoint, end: RoutePoint) -> Self {
        Self {
            start,
            end,
            max_difficulty: None,
            budget: None,
        }
    }

    pub fn with_max_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.max_difficulty = Some(difficulty);
        self
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// One entry of a planned or user-built route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub id: SegmentId,
    pub name: String,
    pub kind: SegmentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub minutes: f64,
}

impl RouteSegment {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            id: segment.id.clone(),
            name: segment.name.clone(),
            kind: segment.category(),
            difficulty: segment.difficulty(),
            minutes: segment.estimated_minutes(),
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub start: RoutePoint,
    pub end: RoutePoint,
    pub max_difficulty: Option<Difficulty>,
    pub steps: Vec<SegmentId>,
    pub total_minutes: f64,
    /// Node expansions performed by the search.
    pub iterations: usize,
}

impl RoutePlan {
    pub fn segment_count(&self) -> usize {
        self.steps.len()
    }

    /// Resolve the steps into display records. Unknown ids are skipped.
    pub fn route_segments(&self, catalog: &Catalog) -> Vec<RouteSegment> {
        self.steps
            .iter()
            .filter_map(|id| catalog.lookup(id))
            .map(RouteSegment::from_segment)
            .collect()
    }
}

/// Structured search result for callers that prefer values over errors.
#[derive(Debug, Clone, Serialize)]
pub struct RouteOutcome {
    pub success: bool,
    pub route: Vec<RouteSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteOutcome {
    pub fn from_result(catalog: &Catalog, result: Result<RoutePlan>) -> Self {
        match result {
            Ok(plan) => Self {
                success: true,
                route: plan.route_segments(catalog),
                message: None,
            },
            Err(err) => Self {
                success: false,
                route: Vec::new(),
                message: Some(failure_message(&err)),
            },
        }
    }
}

/// Human-readable explanation of a planning failure.
pub fn failure_message(err: &Error) -> String {
    match err {
        Error::NoPathFound { start, goal } => {
            format!("No route found between {start} and {goal}.")
        }
        Error::SearchBudgetExceeded { iterations } => format!(
            "Search budget exceeded after {iterations} expansions; the route may exist but was not found."
        ),
        Error::SearchCancelled { iterations } => {
            format!("Search cancelled after {iterations} expansions.")
        }
        Error::InvalidEndpoint { id } => format!("Invalid route endpoint '{id}'."),
        other => other.to_string(),
    }
}

/// Heuristic speed in km/h; zero disables the heuristic.
///
/// A configured speed wins even when it is slower than what the catalog
/// allows, trading optimality for fewer expansions.
fn heuristic_speed(resolver: &ConnectivityResolver<'_>, config: &EngineConfig) -> f64 {
    config
        .heuristic_speed_kmh
        .or_else(|| resolver.optimistic_speed_kmh())
        .unwrap_or(0.0)
}

/// Compute the fastest route between two endpoints.
///
/// 1. Resolves both anchors to coordinates
/// 2. Seeds the search with every admissible segment entered near the start
/// 3. Treats every segment leaving near the end as a goal
/// 4. Runs A* with travel time as cost
pub fn plan_route(
    catalog: &Catalog,
    config: &EngineConfig,
    request: &RouteRequest,
) -> Result<RoutePlan> {
    let start = request.start.resolve(catalog)?;
    let goal = request.end.resolve(catalog)?;

    if request.start.segment == request.end.segment {
        return Ok(same_segment_plan(catalog, request));
    }

    let threshold = config.connection_threshold_m;
    let index = catalog.endpoints();

    let seeds: Vec<usize> = index
        .entries_within(&start, threshold)
        .into_iter()
        .map(|hit| hit.segment)
        .collect();
    let goals: HashSet<usize> = index
        .exits_within(&goal, threshold)
        .into_iter()
        .map(|hit| hit.segment)
        .collect();

    debug!(
        start = %request.start,
        end = %request.end,
        seeds = seeds.len(),
        goals = goals.len(),
        max_difficulty = ?request.max_difficulty,
        "planning route"
    );

    let budget = request
        .budget
        .clone()
        .unwrap_or_else(|| SearchBudget::from_config(config));
    let resolver = ConnectivityResolver::new(catalog, config);
    let speed = heuristic_speed(&resolver, config);
    let search = AStarSearch::new(resolver, request.max_difficulty, speed);

    match search.run(&seeds, &goals, &goal, &budget) {
        SearchResult::Found {
            path,
            minutes,
            iterations,
        } => Ok(RoutePlan {
            start: request.start.clone(),
            end: request.end.clone(),
            max_difficulty: request.max_difficulty,
            steps: path
                .into_iter()
                .map(|index| catalog.segment_at(index).id.clone())
                .collect(),
            total_minutes: minutes,
            iterations,
        }),
        SearchResult::Exhausted { .. } => Err(Error::NoPathFound {
            start: request.start.to_string(),
            goal: request.end.to_string(),
        }),
        SearchResult::BudgetExceeded { iterations } => {
            Err(Error::SearchBudgetExceeded { iterations })
        }
        SearchResult::Cancelled { iterations } => Err(Error::SearchCancelled { iterations }),
    }
}

/// Start and end on one segment: ride it when going start to end, else stay put.
fn same_segment_plan(catalog: &Catalog, request: &RouteRequest) -> RoutePlan {
    let forward = request.start.position == EndpointPosition::Start
        && request.end.position == EndpointPosition::End;
    let steps = match catalog.lookup(&request.start.segment) {
        Some(segment) if forward && segment.within_difficulty(request.max_difficulty) => {
            vec![segment.id.clone()]
        }
        _ => Vec::new(),
    };
    let total_minutes = steps
        .iter()
        .filter_map(|id| catalog.lookup(id))
        .map(Segment::estimated_minutes)
        .sum();

    RoutePlan {
        start: request.start.clone(),
        end: request.end.clone(),
        max_difficulty: request.max_difficulty,
        steps,
        total_minutes,
        iterations: 0,
    }
}

/// Plan a route and fold the result into a [`RouteOutcome`].
pub fn find_route(
    catalog: &Catalog,
    config: &EngineConfig,
    request: &RouteRequest,
) -> RouteOutcome {
    RouteOutcome::from_result(catalog, plan_route(catalog, config, request))
}
