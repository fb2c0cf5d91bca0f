//! PistePath library entry points.
//!
//! This crate loads a ski resort segment catalog (lifts and slopes), resolves
//! which segments connect to each other, validates routes as they are built
//! and searches for the fastest route between two segment endpoints under a
//! difficulty ceiling. Higher-level consumers (the CLI) should only depend on
//! the items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod connectivity;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod output;
pub mod routing;
pub mod search;
pub mod spatial;
pub mod stats;
pub mod validator;

pub use catalog::{
    load_catalog, Catalog, Difficulty, Segment, SegmentCategory, SegmentId, SegmentKind,
};
pub use config::EngineConfig;
pub use connectivity::{ConnectivityMode, ConnectivityResolver};
pub use dataset::{default_catalog_path, open_catalog, resolve_catalog_path};
pub use error::{Error, Result};
pub use geo::Coordinate;
pub use output::{RouteRenderMode, RouteSummary};
pub use routing::{
    failure_message, find_route, plan_route, EndpointPosition, RouteOutcome, RoutePlan, RoutePoint,
    RouteRequest, RouteSegment,
};
pub use search::{CancellationToken, SearchBudget};
pub use stats::{DifficultyCounts, RouteStats};
pub use validator::{AppendValidation, RouteBuilder, RouteValidator};
