//! In-memory mock backend.
//!
//! Implements the full operation set against a plain `Vec`, so the
//! runner and report can be exercised without any database running
//! (`league-bench --mock`). Latency numbers from this backend are
//! obviously not comparable to the real stores.

use crate::backends::{
    probe_id, Backend, BackendId, IndexingMode, TOP_LIMIT, YEAR_CUTOFF, YEAR_RANGE,
};
use crate::error::{BenchError, Result};
use crate::fixtures::{self, FixtureRecord, DEFAULT_PAYLOAD_KIB};

#[derive(Default)]
pub struct MockBackend {
    rows: Vec<FixtureRecord>,
    indexes: Vec<&'static str>,
    schema_ready: bool,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Secondary index names currently present.
    pub fn index_names(&self) -> &[&'static str] {
        &self.indexes
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn require_schema(&self) -> Result<()> {
        if self.schema_ready {
            Ok(())
        } else {
            Err(BenchError::Operation("schema not set up".into()))
        }
    }
}

impl Backend for MockBackend {
    fn id(&self) -> BackendId {
        BackendId::Mock
    }

    fn setup(&mut self, mode: IndexingMode) -> Result<()> {
        // Drop-then-create: leftover rows and indexes never survive.
        self.rows.clear();
        self.indexes.clear();
        if mode == IndexingMode::WithIndex {
            self.indexes.push("idx_bench_name");
            self.indexes.push("idx_bench_league_year");
        }
        self.schema_ready = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.require_schema()?;
        self.rows.clear();
        Ok(())
    }

    fn insert(&mut self, records: &[FixtureRecord]) -> Result<()> {
        self.require_schema()?;
        self.rows.extend_from_slice(records);
        Ok(())
    }

    fn run_selects(&mut self, n: usize) -> Result<()> {
        self.require_schema()?;
        let pick_id = probe_id(n);
        let pick_name = fixtures::team_name(pick_id);

        let _by_id = self.rows.iter().find(|r| r.id == pick_id);
        let _by_name = self.rows.iter().find(|r| r.name == pick_name);
        let _count = self
            .rows
            .iter()
            .filter(|r| r.founded_year >= YEAR_RANGE.0 && r.founded_year <= YEAR_RANGE.1)
            .count();

        let mut top: Vec<&FixtureRecord> = self.rows.iter().collect();
        top.sort_by(|a, b| b.founded_year.cmp(&a.founded_year));
        top.truncate(TOP_LIMIT as usize);

        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        self.require_schema()?;
        let payload = fixtures::fresh_payload(DEFAULT_PAYLOAD_KIB);
        for row in self.rows.iter_mut().filter(|r| r.founded_year < YEAR_CUTOFF) {
            row.payload = payload.clone();
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.require_schema()?;
        self.rows.retain(|r| r.founded_year >= YEAR_CUTOFF);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{generate, DEFAULT_BASE_YEAR};

    fn populated(mode: IndexingMode, n: usize) -> MockBackend {
        let mut db = MockBackend::new();
        db.setup(mode).unwrap();
        db.insert(&generate(n, DEFAULT_BASE_YEAR, 1)).unwrap();
        db
    }

    #[test]
    fn setup_twice_is_idempotent() {
        let mut db = populated(IndexingMode::WithIndex, 10);
        db.setup(IndexingMode::WithIndex).unwrap();
        assert_eq!(db.row_count(), 0, "setup must drop leftover data");
        assert_eq!(
            db.index_names(),
            ["idx_bench_name", "idx_bench_league_year"],
            "exactly the two specified indexes, no duplicates"
        );
    }

    #[test]
    fn setup_without_indexes_builds_none() {
        let db = populated(IndexingMode::NoIndex, 1);
        assert!(db.index_names().is_empty());
    }

    #[test]
    fn clear_preserves_schema_and_indexes() {
        let mut db = populated(IndexingMode::WithIndex, 100);
        db.clear().unwrap();
        assert_eq!(db.row_count(), 0);
        assert_eq!(db.index_names().len(), 2);
        // Still usable after clear.
        db.insert(&generate(5, DEFAULT_BASE_YEAR, 1)).unwrap();
        assert_eq!(db.row_count(), 5);
    }

    #[test]
    fn operations_before_setup_fail() {
        let mut db = MockBackend::new();
        assert!(matches!(db.clear(), Err(BenchError::Operation(_))));
        assert!(matches!(db.run_selects(1), Err(BenchError::Operation(_))));
    }

    #[test]
    fn delete_removes_only_pre_cutoff_rows() {
        // Years are 1850 + (id % 200); ids 1..=49 and 200 fall below
        // the 1900 cutoff, 50 rows in total.
        let mut db = populated(IndexingMode::NoIndex, 200);
        db.delete().unwrap();
        assert_eq!(db.row_count(), 150);
        assert!(db.rows.iter().all(|r| r.founded_year >= YEAR_CUTOFF));
    }

    #[test]
    fn update_rewrites_pre_cutoff_payloads() {
        let mut db = populated(IndexingMode::NoIndex, 200);
        let before: Vec<String> = db.rows.iter().map(|r| r.payload.clone()).collect();
        db.update().unwrap();
        for (row, old) in db.rows.iter().zip(&before) {
            if row.founded_year < YEAR_CUTOFF {
                assert_ne!(&row.payload, old);
            } else {
                assert_eq!(&row.payload, old);
            }
        }
    }

    #[test]
    fn selects_run_on_single_row_dataset() {
        let mut db = populated(IndexingMode::NoIndex, 1);
        db.run_selects(1).unwrap();
    }
}
