//! formfill command-line front end.

pub mod commands;
pub mod config;

pub use config::resolve_llm_config;
