//! Sawmill: concurrent access-log ingestion and statistics.
//!
//! A pool of worker threads streams `.log` files through a fixed line
//! grammar and folds every match into one set of running aggregates
//! (request totals, method and status-class frequencies, latency
//! extremes and averages, user-agent counts). A chunked trial-division
//! prime finder rides along as a second, share-nothing workload.

pub mod error;
pub mod ingest;
pub mod parse;
pub mod prime;
pub mod report;
pub mod scan;
pub mod stats;

pub use error::SawmillError;
pub use ingest::{ingest, Mode};
pub use parse::{parse_line, LogRecord};
pub use report::render;
pub use scan::scan;
pub use stats::{AggregateSnapshot, AggregateStats, LatencySummary};
