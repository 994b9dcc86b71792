//! MongoDB backend adapter.
//!
//! Documents carry an explicit `_id` equal to the record's sequence
//! index, so the point lookup by primary key is a real `_id` lookup
//! rather than a second name lookup.

use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Database, IndexModel};
use tokio::runtime::Runtime;

use crate::backends::{
    probe_id, Backend, BackendId, IndexingMode, BENCH_TABLE, TOP_LIMIT, YEAR_CUTOFF, YEAR_RANGE,
};
use crate::error::{BenchError, Result};
use crate::fixtures::{self, FixtureRecord, DEFAULT_PAYLOAD_KIB};

pub struct MongoBackend {
    db: Database,
    rt: Runtime,
}

impl MongoBackend {
    /// Connect to MongoDB and verify the server is reachable.
    ///
    /// The driver connects lazily, so a `ping` forces connectivity
    /// failures to surface here instead of mid-scenario.
    pub fn connect(uri: &str, db_name: &str) -> Result<Self> {
        let rt = Runtime::new()
            .map_err(|e| BenchError::Connection(format!("tokio runtime: {e}")))?;
        let db = rt.block_on(async {
            let client = Client::with_uri_str(uri)
                .await
                .map_err(|e| BenchError::Connection(e.to_string()))?;
            let db = client.database(db_name);
            db.run_command(doc! { "ping": 1 })
                .await
                .map_err(|e| BenchError::Connection(e.to_string()))?;
            Ok::<_, BenchError>(db)
        })?;
        Ok(Self { db, rt })
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(BENCH_TABLE)
    }
}

impl Backend for MongoBackend {
    fn id(&self) -> BackendId {
        BackendId::Mongo
    }

    fn setup(&mut self, mode: IndexingMode) -> Result<()> {
        let col = self.collection();
        self.rt.block_on(async {
            // Dropping the collection also drops its indexes.
            col.drop().await?;

            if mode == IndexingMode::WithIndex {
                col.create_index(
                    IndexModel::builder().keys(doc! { "name": 1 }).build(),
                )
                .await?;
                col.create_index(
                    IndexModel::builder()
                        .keys(doc! { "league_id": 1, "founded_year": 1 })
                        .build(),
                )
                .await?;
            }
            Ok(())
        })
    }

    fn clear(&mut self) -> Result<()> {
        let col = self.collection();
        self.rt.block_on(async {
            col.delete_many(doc! {}).await?;
            Ok(())
        })
    }

    fn insert(&mut self, records: &[FixtureRecord]) -> Result<()> {
        let docs: Vec<Document> = records
            .iter()
            .map(|rec| {
                doc! {
                    "_id": rec.id,
                    "name": rec.name.as_str(),
                    "league_id": rec.league_id,
                    "founded_year": rec.founded_year,
                    "payload": rec.payload.as_str(),
                }
            })
            .collect();

        let col = self.collection();
        self.rt.block_on(async {
            col.insert_many(docs).ordered(true).await?;
            Ok(())
        })
    }

    fn run_selects(&mut self, n: usize) -> Result<()> {
        let pick_id = probe_id(n);
        let pick_name = fixtures::team_name(pick_id);

        let col = self.collection();
        self.rt.block_on(async {
            col.find_one(doc! { "_id": pick_id }).await?;

            col.find_one(doc! { "name": pick_name.as_str() }).await?;

            col.count_documents(doc! {
                "founded_year": { "$gte": YEAR_RANGE.0, "$lte": YEAR_RANGE.1 }
            })
            .await?;

            let cursor = col
                .find(doc! {})
                .sort(doc! { "founded_year": -1 })
                .limit(TOP_LIMIT)
                .await?;
            let _top: Vec<Document> = cursor.try_collect().await?;

            Ok(())
        })
    }

    fn update(&mut self) -> Result<()> {
        let payload = fixtures::fresh_payload(DEFAULT_PAYLOAD_KIB);
        let col = self.collection();
        self.rt.block_on(async {
            col.update_many(
                doc! { "founded_year": { "$lt": YEAR_CUTOFF } },
                doc! { "$set": { "payload": payload.as_str() } },
            )
            .await?;
            Ok(())
        })
    }

    fn delete(&mut self) -> Result<()> {
        let col = self.collection();
        self.rt.block_on(async {
            col.delete_many(doc! { "founded_year": { "$lt": YEAR_CUTOFF } })
                .await?;
            Ok(())
        })
    }
}
