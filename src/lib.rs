//! Basketball statistics extraction and loading pipeline.
//!
//! The pipeline has two halves joined by intermediate CSV files: an
//! extraction side that fetches from the stats API under strict pacing and
//! checkpoints its progress, and an offline load side that normalizes the
//! files into relational tuples and bulk-writes them idempotently into
//! SQLite.

pub mod checkpoint;
pub mod cli;
pub mod client;
pub mod config;
pub mod csvio;
pub mod endpoints;
pub mod extract;
pub mod load;
pub mod models;
pub mod normalize;
pub mod rate_limit;
pub mod store;
