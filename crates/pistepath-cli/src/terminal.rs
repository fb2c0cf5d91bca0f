//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions, color detection and small formatting helpers
//! shared by the route, stats and listing renderers.

use pistepath_lib::Difficulty;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    // Badge colors (bold reverse video)
    /// Bold reverse yellow for lift badges.
    pub const TAG_LIFT: &str = "\x1b[1;7;33m";
    /// Bold reverse green for green slopes.
    pub const TAG_GREEN: &str = "\x1b[1;7;32m";
    /// Bold reverse blue for blue slopes.
    pub const TAG_BLUE: &str = "\x1b[1;7;34m";
    /// Bold reverse red for red slopes.
    pub const TAG_RED: &str = "\x1b[1;7;31m";
    /// Bold reverse white for black slopes.
    pub const TAG_BLACK: &str = "\x1b[1;7;97m";
    /// Bold reverse magenta for unrated slopes.
    pub const TAG_UNRATED: &str = "\x1b[1;7;35m";

    /// Bright bold white for segment names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for ids and secondary text.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for banner borders and times.
    pub const CYAN: &str = "\x1b[36m";
    /// Orange (256-color) for banner text.
    pub const ORANGE: &str = "\x1b[38;5;208m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_lift: &'static str,
    pub tag_green: &'static str,
    pub tag_blue: &'static str,
    pub tag_red: &'static str,
    pub tag_black: &'static str,
    pub tag_unrated: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub orange: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_lift: colors::TAG_LIFT,
            tag_green: colors::TAG_GREEN,
            tag_blue: colors::TAG_BLUE,
            tag_red: colors::TAG_RED,
            tag_black: colors::TAG_BLACK,
            tag_unrated: colors::TAG_UNRATED,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            orange: colors::ORANGE,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_lift: "",
            tag_green: "",
            tag_blue: "",
            tag_red: "",
            tag_black: "",
            tag_unrated: "",
            white_bold: "",
            gray: "",
            cyan: "",
            orange: "",
        }
    }

    /// Pick `colored()` or `plain()` from terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn is_plain(&self) -> bool {
        self.reset.is_empty()
    }

    /// Badge color for a segment: lifts pass `is_lift = true`.
    pub fn badge(&self, is_lift: bool, difficulty: Option<Difficulty>) -> &'static str {
        if is_lift {
            return self.tag_lift;
        }
        match difficulty {
            Some(Difficulty::Green) => self.tag_green,
            Some(Difficulty::Blue) => self.tag_blue,
            Some(Difficulty::Red) => self.tag_red,
            Some(Difficulty::Black) => self.tag_black,
            None => self.tag_unrated,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Four-letter badge label for a segment.
pub fn badge_label(is_lift: bool, difficulty: Option<Difficulty>) -> &'static str {
    if is_lift {
        return "LIFT";
    }
    match difficulty {
        Some(Difficulty::Green) => "GRN ",
        Some(Difficulty::Blue) => "BLUE",
        Some(Difficulty::Red) => "RED ",
        Some(Difficulty::Black) => "BLK ",
        None => "----",
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check `LANG` and `LC_ALL` for a UTF-8 locale.
#[must_use]
pub fn supports_unicode() -> bool {
    for key in ["LANG", "LC_ALL"] {
        if let Ok(value) = std::env::var(key) {
            if value.to_uppercase().contains("UTF") {
                return true;
            }
        }
    }
    #[cfg(windows)]
    {
        if let Ok(term) = std::env::var("TERM") {
            return !term.eq_ignore_ascii_case("dumb");
        }
        return true;
    }
    #[cfg(not(windows))]
    {
        false
    }
}

/// Format a number with thousand separators (commas).
///
/// ```
/// # use pistepath_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(12500), "12,500");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Metres rounded to the nearest whole metre, with separators.
pub fn format_meters(meters: f64) -> String {
    format!("{} m", format_with_separators(meters.max(0.0).round() as u64))
}
