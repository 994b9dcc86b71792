//! Backend adapters for the databases under test.
//!
//! Each adapter implements the same operation set against its native
//! protocol so cross-backend latency comparison stays valid. Query
//! semantics are reimplemented per backend, never inherited.

pub mod mock;
pub mod mongo;
pub mod mysql;
pub mod postgres;

pub use mock::MockBackend;
pub use mongo::MongoBackend;
pub use mysql::MySqlBackend;
pub use postgres::PostgresBackend;

use std::fmt;

use crate::error::Result;
use crate::fixtures::FixtureRecord;

/// Table/collection name shared by every backend.
pub const BENCH_TABLE: &str = "bench_items";

/// Inclusive `founded_year` range for the range-count query.
pub const YEAR_RANGE: (i32, i32) = (1900, 1950);

/// Records with `founded_year` below this are bulk-updated and bulk-deleted.
pub const YEAR_CUTOFF: i32 = 1900;

/// Row limit for the sorted top-N query.
pub const TOP_LIMIT: i64 = 50;

/// One of the data stores under test.
///
/// Declaration order is the canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackendId {
    Postgres,
    MySql,
    Mongo,
    Mock,
}

impl BackendId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Postgres => "postgres",
            BackendId::MySql => "mysql",
            BackendId::Mongo => "mongo",
            BackendId::Mock => "mockdb",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether secondary indexes exist at measurement time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexingMode {
    NoIndex,
    WithIndex,
}

impl IndexingMode {
    pub const ALL: [IndexingMode; 2] = [IndexingMode::NoIndex, IndexingMode::WithIndex];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexingMode::NoIndex => "no_index",
            IndexingMode::WithIndex => "with_index",
        }
    }
}

impl fmt::Display for IndexingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timed workload operation, in canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    Insert,
    Selects,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Insert,
        Operation::Selects,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Selects => "selects",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary-key position probed by the point lookups for a dataset of `n` rows.
pub fn probe_id(n: usize) -> i64 {
    ((n / 2).max(1)) as i64
}

/// Capability set implemented by every backend under test.
///
/// The scenario runner drives exactly this interface; connection
/// acquisition happens at construction time and is excluded from all
/// measurements, uniformly across backends.
pub trait Backend {
    fn id(&self) -> BackendId;

    /// Drop-if-exists then recreate the benchmark table/collection.
    ///
    /// `WithIndex` additionally builds a single-field index on `name`
    /// and a compound index on `(league_id, founded_year)`. Calling
    /// `setup` twice must leave exactly one working schema.
    fn setup(&mut self, mode: IndexingMode) -> Result<()>;

    /// Remove all records, preserving schema and indexes.
    fn clear(&mut self) -> Result<()>;

    /// Bulk-insert the records in order, batched rather than per-row.
    fn insert(&mut self, records: &[FixtureRecord]) -> Result<()>;

    /// The fixed select battery for a dataset of `n` rows: point lookup
    /// by primary key, point lookup by name, range count over
    /// [`YEAR_RANGE`], top-[`TOP_LIMIT`] ordered by `founded_year`
    /// descending. Runs whether or not indexes exist.
    fn run_selects(&mut self, n: usize) -> Result<()>;

    /// Assign a freshly generated payload to every record with
    /// `founded_year` below [`YEAR_CUTOFF`].
    fn update(&mut self) -> Result<()>;

    /// Remove every record with `founded_year` below [`YEAR_CUTOFF`].
    fn delete(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_id_has_a_floor_of_one() {
        assert_eq!(probe_id(1), 1);
        assert_eq!(probe_id(2), 1);
        assert_eq!(probe_id(100), 50);
        assert_eq!(probe_id(20000), 10000);
    }

    #[test]
    fn enum_order_matches_report_order() {
        assert!(BackendId::Postgres < BackendId::MySql);
        assert!(BackendId::MySql < BackendId::Mongo);
        assert!(IndexingMode::NoIndex < IndexingMode::WithIndex);
        let labels: Vec<_> = Operation::ALL.iter().map(|o| o.as_str()).collect();
        assert_eq!(labels, ["insert", "selects", "update", "delete"]);
    }
}
