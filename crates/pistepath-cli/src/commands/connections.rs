//! Connections command handler: lists where a segment leads.

use anyhow::Result;
use serde::Serialize;

use pistepath_lib::{Catalog, ConnectivityMode, ConnectivityResolver, EngineConfig};

use crate::commands::require_segment;
use crate::output::{render_json, OutputFormat};

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionRow {
    pub id: String,
    pub name: String,
    /// Exit-to-entry distance in metres; absent when the target is not in the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionsReport {
    pub segment: String,
    /// `precomputed` or `geometric`.
    pub source: &'static str,
    pub threshold_m: f64,
    pub connections: Vec<ConnectionRow>,
}

pub fn build_report(
    catalog: &Catalog,
    config: &EngineConfig,
    id: &str,
    geometric: bool,
) -> Result<ConnectionsReport> {
    let segment = require_segment(catalog, id)?;
    let config = if geometric {
        config
            .clone()
            .with_connectivity_mode(ConnectivityMode::Geometric)
    } else {
        config.clone()
    };
    let resolver = ConnectivityResolver::new(catalog, &config);

    let source = if !geometric && segment.connects_to.is_some() {
        "precomputed"
    } else {
        "geometric"
    };

    let connections = resolver
        .exit_connections(segment)
        .into_iter()
        .map(|target| match catalog.lookup(&target) {
            Some(next) => ConnectionRow {
                name: next.name.clone(),
                gap_m: Some(resolver.gap_between(segment, next)),
                id: target,
            },
            None => ConnectionRow {
                name: String::from("<unknown>"),
                gap_m: None,
                id: target,
            },
        })
        .collect();

    Ok(ConnectionsReport {
        segment: segment.id.clone(),
        source,
        threshold_m: resolver.threshold_m(),
        connections,
    })
}

/// Handle the connections subcommand.
pub fn handle_connections_command(
    catalog: &Catalog,
    config: &EngineConfig,
    format: OutputFormat,
    id: &str,
    geometric: bool,
) -> Result<()> {
    let report = build_report(catalog, config, id, geometric)?;
    if format.is_json() {
        render_json(&report)?;
        return Ok(());
    }

    println!(
        "Exit connections from {} ({}, threshold {:.0} m):",
        report.segment, report.source, report.threshold_m
    );
    if report.connections.is_empty() {
        println!("  none");
    }
    for row in &report.connections {
        match row.gap_m {
            Some(gap) => println!("  - {} ({}) gap {:.0} m", row.id, row.name, gap),
            None => println!("  - {} (not in catalog)", row.id),
        }
    }
    Ok(())
}
