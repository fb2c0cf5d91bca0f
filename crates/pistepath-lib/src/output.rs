use std::fmt::Write;

use serde::Serialize;

use crate::catalog::{Catalog, Difficulty, SegmentCategory, SegmentId};
use crate::error::Result;
use crate::routing::{RoutePlan, RoutePoint};
use crate::stats::RouteStats;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
    Note,
}

/// Step taken during traversal of a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: SegmentId,
    pub name: String,
    pub kind: SegmentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub minutes: f64,
    pub cumulative_minutes: f64,
}

impl RouteStep {
    fn label(&self) -> String {
        match self.difficulty {
            Some(difficulty) => format!("{} {}", difficulty, self.kind),
            None => self.kind.to_string(),
        }
    }
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub start: RoutePoint,
    pub end: RoutePoint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_difficulty: Option<Difficulty>,
    pub total_minutes: f64,
    pub iterations: usize,
    pub steps: Vec<RouteStep>,
    pub stats: RouteStats,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with resolved segment details.
    pub fn from_plan(catalog: &Catalog, plan: &RoutePlan) -> Result<Self> {
        let mut cumulative = 0.0;
        let mut steps = Vec::with_capacity(plan.steps.len());
        for (index, id) in plan.steps.iter().enumerate() {
            let segment = catalog.get(id)?;
            let minutes = segment.estimated_minutes();
            cumulative += minutes;
            steps.push(RouteStep {
                index,
                id: segment.id.clone(),
                name: segment.name.clone(),
                kind: segment.category(),
                difficulty: segment.difficulty(),
                minutes,
                cumulative_minutes: cumulative,
            });
        }

        Ok(Self {
            start: plan.start.clone(),
            end: plan.end.clone(),
            max_difficulty: plan.max_difficulty,
            total_minutes: plan.total_minutes,
            iterations: plan.iterations,
            steps,
            stats: RouteStats::from_ids(catalog, &plan.steps),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
            RouteRenderMode::Note => self.render_note(),
        }
    }

    fn ceiling(&self) -> String {
        self.max_difficulty
            .map(|d| d.to_string())
            .unwrap_or_else(|| "any".to_string())
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} segments, {:.1} min, max difficulty: {})",
            self.start,
            self.end,
            self.steps.len(),
            self.total_minutes,
            self.ceiling()
        );
        if self.is_empty() {
            let _ = writeln!(buffer, "  already at destination");
        }
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}) [{}] {:.1} min (total {:.1})",
                step.index,
                step.name,
                step.id,
                step.label(),
                step.minutes,
                step.cumulative_minutes
            );
        }
        let _ = writeln!(
            buffer,
            "Vertical: +{:.0} m / -{:.0} m, lifts: {}, slopes: {}",
            self.stats.vertical_up,
            self.stats.vertical_down,
            self.stats.lift_count,
            self.stats.slope_count
        );
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} to {}_ ({} segments, {:.1} min, max difficulty: `{}`)",
            self.start,
            self.end,
            self.steps.len(),
            self.total_minutes,
            self.ceiling()
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`) {} {:.1} min",
                step.index,
                step.name,
                step.id,
                step.label(),
                step.minutes
            );
        }
        let _ = writeln!(
            buffer,
            "\n_Vertical: +{:.0} m / -{:.0} m_",
            self.stats.vertical_up, self.stats.vertical_down
        );
        buffer
    }

    fn render_note(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Route ({:.0} min):", self.total_minutes);
        for step in &self.steps {
            let _ = writeln!(buffer, "{}", step.name);
        }
        buffer
    }
}
