//! Segments command handler for listing the catalog.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use pistepath_lib::{Catalog, Difficulty, Segment, SegmentCategory};

use crate::output::{render_json, OutputFormat};
use crate::terminal::{badge_label, ColorPalette};

/// Filter accepted by `segments --kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Lift,
    Slope,
}

impl From<KindFilter> for SegmentCategory {
    fn from(value: KindFilter) -> Self {
        match value {
            KindFilter::Lift => SegmentCategory::Lift,
            KindFilter::Slope => SegmentCategory::Slope,
        }
    }
}

/// Listing row, also the JSON shape.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRow {
    pub id: String,
    pub name: String,
    pub kind: SegmentCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    pub minutes: f64,
    pub bidirectional: bool,
}

impl From<&Segment> for SegmentRow {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id.clone(),
            name: segment.name.clone(),
            kind: segment.category(),
            difficulty: segment.difficulty(),
            minutes: segment.estimated_minutes(),
            bidirectional: segment.bidirectional,
        }
    }
}

/// Handle the segments subcommand.
pub fn handle_segments_command(
    catalog: &Catalog,
    format: OutputFormat,
    kind: Option<KindFilter>,
) -> Result<()> {
    let rows: Vec<SegmentRow> = match kind {
        Some(filter) => catalog
            .all_of_kind(filter.into())
            .into_iter()
            .map(SegmentRow::from)
            .collect(),
        None => catalog.iter().map(SegmentRow::from).collect(),
    };

    match format {
        OutputFormat::Json => render_json(&rows)?,
        OutputFormat::Note => {
            for row in &rows {
                println!("{}", row.id);
            }
        }
        OutputFormat::Rich => {
            for row in &rows {
                println!(
                    "* **{}** (`{}`) {} {:.1} min",
                    row.name,
                    row.id,
                    describe(row),
                    row.minutes
                );
            }
        }
        OutputFormat::Text => {
            let p = ColorPalette::detect();
            let is_lift = |row: &SegmentRow| row.kind == SegmentCategory::Lift;
            for row in &rows {
                println!(
                    "{}{}{} {:<28} {:>5.1} min  {}",
                    p.badge(is_lift(row), row.difficulty),
                    badge_label(is_lift(row), row.difficulty),
                    p.reset,
                    row.id,
                    row.minutes,
                    row.name
                );
            }
            println!("{} segments", rows.len());
        }
    }
    Ok(())
}

fn describe(row: &SegmentRow) -> String {
    let base = match row.difficulty {
        Some(difficulty) => format!("{} {}", difficulty, row.kind),
        None => row.kind.to_string(),
    };
    if row.bidirectional {
        format!("{base}, both directions")
    } else {
        base
    }
}
