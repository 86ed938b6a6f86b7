//! Songplay ETL Library
//!
//! A Rust library for turning a music streaming service's song catalog and
//! user activity logs into an analytics star schema stored as partitioned
//! Apache Parquet files.
//!
//! This library provides tools for:
//! - Discovering and loading line-delimited JSON sources with malformed record counting
//! - Building the songs, artists, users and time dimensions
//! - Assembling the songplays fact table by joining plays to the catalog
//! - Writing Hive-style partitioned Parquet tables with overwrite semantics

pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod models;
pub mod processor;
pub mod schema;
pub mod transform;

// Re-export commonly used types
pub use config::{CompressionAlgorithm, EtlConfig, UserSnapshotStrategy, WriterOptions};
pub use context::ExecutionContext;
pub use error::{EtlError, Result};
pub use models::{RunSummary, TableWriteStats};
pub use processor::EtlProcessor;
pub use transform::StarSchema;
