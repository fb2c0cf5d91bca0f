//! Validate command handler: replays a route as successive appends.

use anyhow::{bail, Result};
use serde::Serialize;

use pistepath_lib::{Catalog, EngineConfig, Error as LibError, RouteBuilder, RouteStats};

use crate::commands::friendly_error;
use crate::output::{render_json, stats_lines, OutputFormat};

/// First append the validator refused.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub id: String,
    pub reason: String,
}

/// Outcome of replaying a route.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub accepted: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected: Option<Rejection>,
    pub stats: RouteStats,
}

/// Append `ids` one by one, stopping at the first rejection.
///
/// Unknown ids fail the command outright instead of being reported as a
/// rejection.
pub fn build_report(
    catalog: &Catalog,
    config: &EngineConfig,
    ids: &[String],
) -> Result<ValidationReport> {
    let mut builder = RouteBuilder::new(catalog, config);
    let mut rejected = None;

    for (index, id) in ids.iter().enumerate() {
        match builder.try_push(id) {
            Ok(()) => {}
            Err(LibError::InvalidConnection { reason, .. }) => {
                rejected = Some(Rejection {
                    index,
                    id: id.clone(),
                    reason,
                });
                break;
            }
            Err(other) => return Err(friendly_error(other)),
        }
    }

    Ok(ValidationReport {
        valid: rejected.is_none(),
        accepted: builder.segments().to_vec(),
        rejected,
        stats: builder.stats(),
    })
}

/// Handle the validate subcommand.
pub fn handle_validate_command(
    catalog: &Catalog,
    config: &EngineConfig,
    format: OutputFormat,
    ids: &[String],
) -> Result<()> {
    let report = build_report(catalog, config, ids)?;

    if format.is_json() {
        render_json(&report)?;
    } else {
        for id in &report.accepted {
            println!("  ok      {}", id);
        }
        if let Some(rejection) = &report.rejected {
            println!("  reject  {}: {}", rejection.id, rejection.reason);
        } else {
            println!("Route is valid.");
            for line in stats_lines(&report.stats) {
                println!("{}", line);
            }
        }
    }

    if let Some(rejection) = report.rejected {
        bail!(
            "route is invalid at position {} ({})",
            rejection.index + 1,
            rejection.id
        );
    }
    Ok(())
}
