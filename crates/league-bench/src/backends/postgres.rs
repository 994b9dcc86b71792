//! PostgreSQL backend adapter.
//!
//! Requires a running PostgreSQL instance; the DSN comes from
//! `POSTGRES_DSN` (see [`crate::config`]).

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::runtime::Runtime;

use crate::backends::{
    probe_id, Backend, BackendId, IndexingMode, BENCH_TABLE, TOP_LIMIT, YEAR_CUTOFF, YEAR_RANGE,
};
use crate::error::{BenchError, Result};
use crate::fixtures::{self, FixtureRecord, DEFAULT_PAYLOAD_KIB};

/// Rows per multi-row INSERT statement. Five bind parameters per row
/// must stay under the wire-protocol limit of 65535 parameters.
const INSERT_CHUNK: usize = 1000;

pub struct PostgresBackend {
    pool: PgPool,
    rt: Runtime,
}

impl PostgresBackend {
    /// Connect to PostgreSQL. The pool lives for the whole backend run.
    pub fn connect(dsn: &str) -> Result<Self> {
        let rt = Runtime::new()
            .map_err(|e| BenchError::Connection(format!("tokio runtime: {e}")))?;
        let pool = rt
            .block_on(PgPoolOptions::new().max_connections(2).connect(dsn))
            .map_err(|e| BenchError::Connection(e.to_string()))?;
        Ok(Self { pool, rt })
    }
}

impl Backend for PostgresBackend {
    fn id(&self) -> BackendId {
        BackendId::Postgres
    }

    fn setup(&mut self, mode: IndexingMode) -> Result<()> {
        self.rt.block_on(async {
            sqlx::query(&format!("DROP TABLE IF EXISTS {BENCH_TABLE}"))
                .execute(&self.pool)
                .await?;
            sqlx::query(&format!(
                "CREATE TABLE {BENCH_TABLE} (
                    id BIGINT PRIMARY KEY,
                    name TEXT NOT NULL,
                    league_id INT NOT NULL,
                    founded_year INT NOT NULL,
                    payload TEXT NOT NULL
                )"
            ))
            .execute(&self.pool)
            .await?;

            if mode == IndexingMode::WithIndex {
                sqlx::query(&format!(
                    "CREATE INDEX idx_bench_name ON {BENCH_TABLE}(name)"
                ))
                .execute(&self.pool)
                .await?;
                sqlx::query(&format!(
                    "CREATE INDEX idx_bench_league_year ON {BENCH_TABLE}(league_id, founded_year)"
                ))
                .execute(&self.pool)
                .await?;
            }
            Ok(())
        })
    }

    fn clear(&mut self) -> Result<()> {
        self.rt.block_on(async {
            sqlx::query(&format!("TRUNCATE TABLE {BENCH_TABLE}"))
                .execute(&self.pool)
                .await?;
            Ok(())
        })
    }

    fn insert(&mut self, records: &[FixtureRecord]) -> Result<()> {
        self.rt.block_on(async {
            let mut tx = self.pool.begin().await?;
            for chunk in records.chunks(INSERT_CHUNK) {
                let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
                    "INSERT INTO {BENCH_TABLE} (id, name, league_id, founded_year, payload) "
                ));
                qb.push_values(chunk, |mut b, rec| {
                    b.push_bind(rec.id)
                        .push_bind(&rec.name)
                        .push_bind(rec.league_id)
                        .push_bind(rec.founded_year)
                        .push_bind(&rec.payload);
                });
                qb.build().execute(&mut *tx).await?;
            }
            tx.commit().await?;
            Ok(())
        })
    }

    fn run_selects(&mut self, n: usize) -> Result<()> {
        let pick_id = probe_id(n);
        let pick_name = fixtures::team_name(pick_id);

        self.rt.block_on(async {
            sqlx::query(&format!("SELECT * FROM {BENCH_TABLE} WHERE id = $1"))
                .bind(pick_id)
                .fetch_optional(&self.pool)
                .await?;

            sqlx::query(&format!("SELECT * FROM {BENCH_TABLE} WHERE name = $1"))
                .bind(&pick_name)
                .fetch_optional(&self.pool)
                .await?;

            let _count: i64 = sqlx::query_scalar(&format!(
                "SELECT COUNT(*) FROM {BENCH_TABLE} WHERE founded_year BETWEEN $1 AND $2"
            ))
            .bind(YEAR_RANGE.0)
            .bind(YEAR_RANGE.1)
            .fetch_one(&self.pool)
            .await?;

            sqlx::query(&format!(
                "SELECT * FROM {BENCH_TABLE} ORDER BY founded_year DESC LIMIT $1"
            ))
            .bind(TOP_LIMIT)
            .fetch_all(&self.pool)
            .await?;

            Ok(())
        })
    }

    fn update(&mut self) -> Result<()> {
        let payload = fixtures::fresh_payload(DEFAULT_PAYLOAD_KIB);
        self.rt.block_on(async {
            sqlx::query(&format!(
                "UPDATE {BENCH_TABLE} SET payload = $1 WHERE founded_year < $2"
            ))
            .bind(&payload)
            .bind(YEAR_CUTOFF)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn delete(&mut self) -> Result<()> {
        self.rt.block_on(async {
            sqlx::query(&format!(
                "DELETE FROM {BENCH_TABLE} WHERE founded_year < $1"
            ))
            .bind(YEAR_CUTOFF)
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }
}
