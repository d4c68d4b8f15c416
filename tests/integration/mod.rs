//! Integration tests for the lectern extraction pipeline

mod cli_contracts;
mod dedup_reconcile;
mod serialize_output;
mod walker_nesting;
