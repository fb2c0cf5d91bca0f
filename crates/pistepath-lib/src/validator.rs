use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Segment, SegmentId};
use crate::config::EngineConfig;
use crate::connectivity::{min_distance, ConnectivityResolver};
use crate::error::{Error, Result};
use crate::stats::RouteStats;

/// Verdict on appending one segment to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AppendValidation {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Decides whether a candidate segment may follow the current route.
#[derive(Debug, Clone, Copy)]
pub struct RouteValidator<'a> {
    resolver: ConnectivityResolver<'a>,
}

impl<'a> RouteValidator<'a> {
    pub fn new(catalog: &'a Catalog, config: &EngineConfig) -> Self {
        Self {
            resolver: ConnectivityResolver::new(catalog, config),
        }
    }

    pub fn from_resolver(resolver: ConnectivityResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Check `candidate` against the last segment of `current`.
    pub fn validate_append<S: AsRef<str>>(
        &self,
        current: &[S],
        candidate: &str,
    ) -> AppendValidation {
        match self.check_append(current, candidate) {
            Ok(()) => AppendValidation::accepted(),
            Err(Error::InvalidConnection { reason, .. }) => AppendValidation::rejected(reason),
            Err(other) => AppendValidation::rejected(other.to_string()),
        }
    }

    /// Same rule as [`validate_append`](Self::validate_append), as a `Result`.
    pub fn check_append<S: AsRef<str>>(&self, current: &[S], candidate: &str) -> Result<()> {
        let catalog = self.resolver.catalog();
        let next = catalog.get(candidate)?;
        let Some(last) = current.last() else {
            return Ok(());
        };
        let previous = catalog.get(last.as_ref())?;
        self.check_link(previous, next)
    }

    /// Replay `route` as successive appends, failing at the first bad link.
    pub fn validate_route<S: AsRef<str>>(&self, route: &[S]) -> Result<()> {
        for index in 0..route.len() {
            self.check_append(&route[..index], route[index].as_ref())?;
        }
        Ok(())
    }

    fn check_link(&self, previous: &Segment, next: &Segment) -> Result<()> {
        if self.resolver.exit_connections(previous).contains(&next.id) {
            return Ok(());
        }

        let gap = self.resolver.gap_between(previous, next);
        let threshold = self.resolver.threshold_m();
        if gap <= threshold {
            debug!(from = %previous.id, to = %next.id, gap, "accepted link by proximity");
            return Ok(());
        }

        let mut reason = format!(
            "{} ({}) does not connect to {} ({}); nearest entry is {:.0} m away (limit {:.0} m)",
            previous.name, previous.id, next.name, next.id, gap, threshold
        );
        if !next.bidirectional {
            let reversed = min_distance(&previous.exit_points(), &[next.exit()]);
            if reversed <= threshold {
                reason.push_str(if next.is_lift() {
                    "; would require riding the lift backwards"
                } else {
                    "; would require traveling uphill"
                });
            }
        }

        Err(Error::InvalidConnection {
            from: previous.id.clone(),
            to: next.id.clone(),
            reason,
        })
    }
}

/// An in-progress route owned by one editing session.
///
/// Appends are validated; a rejected append leaves the route untouched.
#[derive(Debug, Clone)]
pub struct RouteBuilder<'a> {
    validator: RouteValidator<'a>,
    catalog: &'a Catalog,
    segments: Vec<SegmentId>,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(catalog: &'a Catalog, config: &EngineConfig) -> Self {
        Self {
            validator: RouteValidator::new(catalog, config),
            catalog,
            segments: Vec::new(),
        }
    }

    pub fn try_push(&mut self, id: &str) -> Result<()> {
        self.validator.check_append(&self.segments, id)?;
        self.segments.push(id.to_string());
        Ok(())
    }

    /// Preview whether `id` could be appended without changing the route.
    pub fn validate_next(&self, id: &str) -> AppendValidation {
        self.validator.validate_append(&self.segments, id)
    }

    /// Keep only the first `len` segments.
    pub fn truncate(&mut self, len: usize) {
        self.segments.truncate(len);
    }

    /// Remove the segment at `index`, if any.
    ///
    /// Removal does not re-validate the neighbours it brings together.
    pub fn remove(&mut self, index: usize) -> Option<SegmentId> {
        (index < self.segments.len()).then(|| self.segments.remove(index))
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn stats(&self) -> RouteStats {
        RouteStats::from_ids(self.catalog, &self.segments)
    }
}
