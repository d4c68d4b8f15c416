//! Tooling
//!
//! Command-line surface over extraction, reconciliation, export and status.

pub mod cli;
pub mod format;

pub use cli::{Cli, CliContext, Commands};
pub use format::{format_run_report_text, format_section_heading, format_status_text, StoreStatus};
