//! Output formatting for the `pistepath` commands.
//!
//! Route summaries come from the library; this module picks a renderer for
//! the requested [`OutputFormat`] and prints the banner and footer.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use pistepath_lib::output::RouteStep;
use pistepath_lib::{RouteRenderMode, RouteStats, RouteSummary, SegmentCategory};

use crate::terminal::{badge_label, format_meters, supports_color, supports_unicode, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, colored when the terminal allows it.
    #[default]
    Text,
    /// Markdown.
    Rich,
    /// Compact names-only note.
    Note,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }

    /// Whether the banner and footer belong in this format.
    pub fn shows_chrome(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Rich)
    }

    /// Print a route summary in this format.
    pub fn render_route(self, summary: &RouteSummary) -> io::Result<()> {
        match self {
            OutputFormat::Text => {
                let palette = ColorPalette::detect();
                if palette.is_plain() {
                    print!("{}", summary.render(RouteRenderMode::PlainText));
                } else {
                    RouteRenderer::new(palette).render(summary);
                }
                Ok(())
            }
            OutputFormat::Rich => {
                print!("{}", summary.render(RouteRenderMode::RichText));
                Ok(())
            }
            OutputFormat::Note => {
                print!("{}", summary.render(RouteRenderMode::Note));
                Ok(())
            }
            OutputFormat::Json => render_json(summary),
        }
    }
}

/// Print the CLI logo banner.
///
/// Falls back to ASCII when the locale is not UTF-8 and drops color under
/// `NO_COLOR` or `TERM=dumb`.
pub fn print_logo() {
    use crate::terminal::colors;

    let (orange, cyan, reset) = if supports_color() {
        (colors::ORANGE, colors::CYAN, colors::RESET)
    } else {
        ("", "", "")
    };

    if supports_unicode() {
        println!(
            "{cyan}╭──────────────────────────────╮{reset}
{cyan}│{orange}  ▲ P I S T E P A T H ▲       {cyan}│{reset}
{cyan}│{orange}     ski route planner        {cyan}│{reset}
{cyan}╰──────────────────────────────╯{reset}"
        );
    } else {
        println!(
            "{orange}+--------------------------------+
|  PISTEPATH                     |
|  >> SKI ROUTE PLANNER          |
+--------------------------------+{reset}"
        );
    }
}

/// Print the footer with elapsed time.
pub fn print_footer(elapsed: std::time::Duration) {
    use crate::terminal::colors;

    let (gray, reset) = if supports_color() {
        (colors::GRAY, colors::RESET)
    } else {
        ("", "")
    };

    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{}ms", elapsed_ms)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };

    println!("\n{gray}Completed in {}{reset}", time_str);
}

/// Serialize any value as pretty JSON to stdout.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Text lines describing aggregate route statistics.
pub fn stats_lines(stats: &RouteStats) -> Vec<String> {
    let histogram = &stats.difficulty;
    let mut lines = vec![
        format!(
            "Segments: {} ({} lifts, {} slopes)",
            stats.segment_count(),
            stats.lift_count,
            stats.slope_count
        ),
        format!("Vertical up: {}", format_meters(stats.vertical_up)),
        format!("Vertical down: {}", format_meters(stats.vertical_down)),
        format!("Estimated time: {:.1} min", stats.estimated_minutes),
        format!(
            "Difficulty: green {}, blue {}, red {}, black {}, unrated {}",
            histogram.green, histogram.blue, histogram.red, histogram.black, histogram.unrated
        ),
    ];
    if stats.skipped > 0 {
        lines.push(format!("Skipped unknown ids: {}", stats.skipped));
    }
    lines
}

/// Colored route view with per-segment badges.
pub struct RouteRenderer {
    palette: ColorPalette,
}

impl RouteRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn render(&self, summary: &RouteSummary) {
        let p = &self.palette;
        println!(
            "Route from {}{}{} to {}{}{} ({} segments, {}{:.1} min{}):",
            p.white_bold,
            summary.start,
            p.reset,
            p.white_bold,
            summary.end,
            p.reset,
            summary.steps.len(),
            p.cyan,
            summary.total_minutes,
            p.reset
        );
        if summary.is_empty() {
            println!("  {}already at destination{}", p.gray, p.reset);
        }
        for step in &summary.steps {
            self.render_step(step);
        }
        println!();
        for line in stats_lines(&summary.stats) {
            println!("{}{}{}", p.gray, line, p.reset);
        }
    }

    fn render_step(&self, step: &RouteStep) {
        let p = &self.palette;
        let is_lift = step.kind == SegmentCategory::Lift;
        println!(
            " {}{}{} {}{}{} {}({}){} {}{:.1} min{}",
            p.badge(is_lift, step.difficulty),
            badge_label(is_lift, step.difficulty),
            p.reset,
            p.white_bold,
            step.name,
            p.reset,
            p.gray,
            step.id,
            p.reset,
            p.cyan,
            step.minutes,
            p.reset
        );
    }
}
