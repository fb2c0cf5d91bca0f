//! Route command handler for finding the fastest path between two endpoints.

use std::time::Duration;

use anyhow::{Context, Result};

use pistepath_lib::{
    plan_route, Catalog, Difficulty, EndpointPosition, EngineConfig, Error as RouteError,
    RoutePoint, RouteRequest, RouteSummary, SearchBudget,
};

use crate::commands::{format_unknown_segment_message, require_segment};
use crate::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Start anchor, `id[:start|end]`; bare ids start at the segment's start.
    pub from: String,
    /// Goal anchor, `id[:start|end]`; bare ids end at the segment's end.
    pub to: String,
    pub max_difficulty: Option<Difficulty>,
    pub max_iterations: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library [`RouteRequest`].
    pub fn to_request(&self, config: &EngineConfig) -> RouteRequest {
        let start = RoutePoint::parse_with_default(&self.from, EndpointPosition::Start);
        let end = RoutePoint::parse_with_default(&self.to, EndpointPosition::End);

        let mut budget =
            SearchBudget::iterations(self.max_iterations.unwrap_or(config.max_iterations));
        if let Some(ms) = self.timeout_ms {
            budget = budget.with_timeout(Duration::from_millis(ms));
        }

        let mut request = RouteRequest::new(start, end).with_budget(budget);
        request.max_difficulty = self.max_difficulty;
        request
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    catalog: &Catalog,
    config: &EngineConfig,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let request = args.to_request(config);
    require_segment(catalog, &request.start.segment)?;
    require_segment(catalog, &request.end.segment)?;

    let plan = match plan_route(catalog, config, &request) {
        Ok(plan) => plan,
        Err(err) => return Err(handle_route_failure(&request, err)),
    };

    let summary = RouteSummary::from_plan(catalog, &plan)
        .context("failed to build route summary for display")?;
    format
        .render_route(&summary)
        .context("failed to write route output")
}

fn handle_route_failure(request: &RouteRequest, err: RouteError) -> anyhow::Error {
    match err {
        RouteError::SegmentNotFound { id, suggestions } => {
            anyhow::anyhow!(format_unknown_segment_message(&id, &suggestions))
        }
        RouteError::NoPathFound { start, goal } => {
            anyhow::anyhow!(format_route_not_found_message(&start, &goal, request))
        }
        RouteError::SearchBudgetExceeded { iterations } => anyhow::anyhow!(
            "Search budget exceeded after {} expansions. Try raising --max-iterations.",
            iterations
        ),
        RouteError::SearchCancelled { iterations } => anyhow::anyhow!(
            "Search timed out after {} expansions. Try raising --timeout-ms.",
            iterations
        ),
        other => anyhow::Error::new(other),
    }
}

fn format_route_not_found_message(start: &str, goal: &str, request: &RouteRequest) -> String {
    let mut message = format!("No route found between {} and {}.", start, goal);
    match request.max_difficulty {
        Some(Difficulty::Black) | None => {
            message.push_str(" Try a larger --threshold if nearby segments should connect.")
        }
        Some(_) => message.push_str(" Try raising --max-difficulty or a larger --threshold."),
    }
    message
}
