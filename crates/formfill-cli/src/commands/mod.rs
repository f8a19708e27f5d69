//! Subcommand implementations for the `formfill` binary.

pub mod generate;
pub mod schema;
pub mod submit;
