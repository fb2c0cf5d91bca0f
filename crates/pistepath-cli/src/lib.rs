//! PistePath CLI library.
//!
//! Subcommand handlers, terminal styling and output formatting for the
//! `pistepath` binary.

pub mod commands;
pub mod output;
pub mod terminal;
