//! Lectern: written-artifact extraction for block-world saves
//!
//! Walks decoded world data for books and signs, however deeply they are
//! nested inside containers, deduplicates them by content into a persistent
//! store, and re-emits them as game commands for several target versions.

pub mod artifact;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod schema;
pub mod serialize;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod walker;
pub mod warnings;
