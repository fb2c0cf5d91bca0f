// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments, loads the
// catalog once and dispatches to these handlers.

pub mod connections;
pub mod route;
pub mod segments;
pub mod stats;
pub mod validate;

use pistepath_lib::{Catalog, Error as LibError, Segment};

/// Look up a segment, turning a miss into a friendly "Did you mean" error.
pub fn require_segment<'a>(catalog: &'a Catalog, id: &str) -> anyhow::Result<&'a Segment> {
    catalog.get(id).map_err(friendly_error)
}

/// Rewrap library errors whose default text is terse for a terminal user.
pub fn friendly_error(err: LibError) -> anyhow::Error {
    match err {
        LibError::SegmentNotFound { id, suggestions } => {
            anyhow::anyhow!(format_unknown_segment_message(&id, &suggestions))
        }
        other => anyhow::Error::new(other),
    }
}

pub fn format_unknown_segment_message(id: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown segment '{}'.", id);
    if let [suggestion] = suggestions {
        message.push_str(&format!(" Did you mean '{suggestion}'?"));
    } else if !suggestions.is_empty() {
        let joined = suggestions
            .iter()
            .map(|s| format!("'{}'", s))
            .collect::<Vec<_>>()
            .join(", ");
        message.push_str(&format!(" Did you mean one of: {}?", joined));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_segment_message_lists_suggestions() {
        assert_eq!(
            format_unknown_segment_message("lift-x", &[]),
            "Unknown segment 'lift-x'."
        );
        assert_eq!(
            format_unknown_segment_message("lift-x", &["lift-a".into()]),
            "Unknown segment 'lift-x'. Did you mean 'lift-a'?"
        );
        assert_eq!(
            format_unknown_segment_message("lift-x", &["lift-a".into(), "lift-b".into()]),
            "Unknown segment 'lift-x'. Did you mean one of: 'lift-a', 'lift-b'?"
        );
    }
}
