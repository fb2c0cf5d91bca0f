use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pistepath_cli::commands::connections::handle_connections_command;
use pistepath_cli::commands::route::{handle_route_command, RouteCommandArgs};
use pistepath_cli::commands::segments::{handle_segments_command, KindFilter};
use pistepath_cli::commands::stats::handle_stats_command;
use pistepath_cli::commands::validate::handle_validate_command;
use pistepath_cli::output::{print_footer, print_logo, OutputFormat};
use pistepath_lib::{load_catalog, resolve_catalog_path, Catalog, Difficulty, EngineConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ski resort route planning and validation")]
struct Cli {
    /// Segment catalog JSON file. Falls back to PISTEPATH_CATALOG, then the data directory.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Maximum exit-to-entry gap in metres for two segments to connect.
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Suppress the banner and footer.
    #[arg(long, global = true)]
    no_logo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the fastest route between two segment endpoints.
    Route {
        /// Start as `id`, `id:start` or `id:end` (bare ids use the start).
        #[arg(long = "from")]
        from: String,
        /// Goal as `id`, `id:start` or `id:end` (bare ids use the end).
        #[arg(long = "to")]
        to: String,
        /// Hardest slope allowed: green, blue, red or black.
        #[arg(long)]
        max_difficulty: Option<Difficulty>,
        /// Node expansion cap for the search.
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Abort the search after this many milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Check that segments can be ridden in the given order.
    Validate {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Aggregate vertical, time and difficulty figures for a segment list.
    Stats {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List catalog segments.
    Segments {
        #[arg(long, value_enum)]
        kind: Option<KindFilter>,
    },
    /// Show which segments can be entered after leaving a segment.
    Connections {
        id: String,
        /// Ignore precomputed lists and use endpoint geometry only.
        #[arg(long)]
        geometric: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let started = Instant::now();

    let mut config = EngineConfig::from_env();
    if let Some(threshold) = cli.threshold {
        if !threshold.is_finite() || threshold < 0.0 {
            bail!("--threshold must be a non-negative number of metres, got {threshold}");
        }
        config = config.with_threshold(threshold);
    }

    let show_chrome = !cli.no_logo && cli.format.shows_chrome();
    if show_chrome {
        print_logo();
    }
    let catalog = open_catalog(cli.catalog.as_deref())?;
    let format = cli.format;

    match cli.command {
        Command::Route {
            from,
            to,
            max_difficulty,
            max_iterations,
            timeout_ms,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                max_difficulty,
                max_iterations,
                timeout_ms,
            };
            handle_route_command(&catalog, &config, format, &args)?;
        }
        Command::Validate { ids } => handle_validate_command(&catalog, &config, format, &ids)?,
        Command::Stats { ids } => handle_stats_command(&catalog, format, &ids)?,
        Command::Segments { kind } => handle_segments_command(&catalog, format, kind)?,
        Command::Connections { id, geometric } => {
            handle_connections_command(&catalog, &config, format, &id, geometric)?
        }
    }

    if show_chrome {
        print_footer(started.elapsed());
    }
    Ok(())
}

fn open_catalog(explicit: Option<&Path>) -> Result<Catalog> {
    let path = resolve_catalog_path(explicit).context("failed to locate the segment catalog")?;
    load_catalog(&path)
        .with_context(|| format!("failed to load segment catalog from {}", path.display()))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
