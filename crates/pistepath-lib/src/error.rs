use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the PistePath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Catalog could not be located at the resolved path.
    #[error("segment catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the segment catalog")]
    ProjectDirsUnavailable,

    /// Raised when catalog input fails validation at load time.
    #[error("invalid segment catalog: {message}")]
    CatalogValidation { message: String },

    /// Raised when a segment identifier could not be found in the catalog.
    #[error("unknown segment id: {id}{}", format_suggestions(.suggestions))]
    SegmentNotFound {
        id: String,
        suggestions: Vec<String>,
    },

    /// Raised when the validator rejects appending a segment to a route.
    #[error("cannot connect {from} to {to}: {reason}")]
    InvalidConnection {
        from: String,
        to: String,
        reason: String,
    },

    /// Raised when a search endpoint cannot be resolved to a coordinate.
    #[error("invalid route endpoint: {id}")]
    InvalidEndpoint { id: String },

    /// Raised when the search space was exhausted without reaching the goal.
    #[error("no route found between {start} and {goal}")]
    NoPathFound { start: String, goal: String },

    /// Raised when the search gave up after reaching its iteration cap.
    #[error("search budget exceeded after {iterations} expansions")]
    SearchBudgetExceeded { iterations: usize },

    /// Raised when the caller cancelled the search or its deadline elapsed.
    #[error("search cancelled after {iterations} expansions")]
    SearchCancelled { iterations: usize },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
