//! Stats command handler.

use anyhow::Result;
use tracing::warn;

use pistepath_lib::{Catalog, RouteStats};

use crate::output::{render_json, stats_lines, OutputFormat};

/// Handle the stats subcommand.
///
/// Unknown ids are counted as skipped rather than failing the command.
pub fn handle_stats_command(catalog: &Catalog, format: OutputFormat, ids: &[String]) -> Result<()> {
    for id in ids.iter().filter(|id| !catalog.contains(id)) {
        warn!(segment = %id, "skipping unknown segment id");
    }
    let stats = RouteStats::from_ids(catalog, ids);

    match format {
        OutputFormat::Json => render_json(&stats)?,
        OutputFormat::Rich => {
            for line in stats_lines(&stats) {
                println!("* {}", line);
            }
        }
        OutputFormat::Text | OutputFormat::Note => {
            for line in stats_lines(&stats) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
