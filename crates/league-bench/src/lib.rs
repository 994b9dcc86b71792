//! Cross-database benchmark harness for the league data stores.
//!
//! Drives an identical workload (bulk insert, a fixed select battery,
//! bulk update, bulk delete) against PostgreSQL, MySQL and MongoDB
//! under varying data volumes and indexing configurations, and reports
//! per-operation mean latencies as CSV.
//!
//! # Components
//!
//! - **Fixtures**: deterministic-shape, randomized-content records
//! - **Backends**: one [`backends::Backend`] impl per data store
//! - **Runner**: the {indexing mode × size × repeat} matrix with
//!   per-operation timing
//! - **Report**: mean aggregation and CSV rendering

pub mod backends;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod report;
pub mod runner;

pub use backends::{Backend, BackendId, IndexingMode, MockBackend, Operation};
pub use error::{BenchError, Result};
pub use fixtures::FixtureRecord;
pub use report::AggregateRow;
pub use runner::{RunPlan, TimingSample};
