//! Benchmark fixture generation.
//!
//! Produces deterministic-shape, randomized-content records: field
//! derivation is a pure function of the 1-based sequence index, only
//! the payload bytes are random.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Base year for `founded_year` derivation.
pub const DEFAULT_BASE_YEAR: i32 = 1850;

/// Payload size per record, in KiB.
pub const DEFAULT_PAYLOAD_KIB: usize = 1;

/// Number of distinct league ids.
pub const LEAGUE_COUNT: i64 = 20;

/// Number of distinct founded years.
pub const YEAR_SPREAD: i64 = 200;

/// One synthetic row/document used as benchmark payload.
#[derive(Debug, Clone)]
pub struct FixtureRecord {
    /// 1-based sequence index, doubles as the primary key.
    pub id: i64,
    pub name: String,
    pub league_id: i32,
    pub founded_year: i32,
    pub payload: String,
}

/// Deterministic record name for a sequence index.
pub fn team_name(index: i64) -> String {
    format!("Team_{index:06}")
}

/// Generate `count` records with entropy-seeded payloads.
pub fn generate(count: usize, base_year: i32, payload_kib: usize) -> Vec<FixtureRecord> {
    let mut seed_rng = rand::thread_rng();
    generate_seeded(count, base_year, payload_kib, seed_rng.next_u64())
}

/// Generate `count` records with a fixed payload seed, for reproducible runs.
pub fn generate_seeded(
    count: usize,
    base_year: i32,
    payload_kib: usize,
    seed: u64,
) -> Vec<FixtureRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count as i64)
        .map(|i| FixtureRecord {
            id: i,
            name: team_name(i),
            league_id: (i % LEAGUE_COUNT) as i32,
            founded_year: base_year + (i % YEAR_SPREAD) as i32,
            payload: payload_blob(&mut rng, payload_kib),
        })
        .collect()
}

/// A single payload blob with a throwaway entropy seed.
///
/// Used by the bulk-update operation, which assigns one fresh blob to
/// every matched record.
pub fn fresh_payload(payload_kib: usize) -> String {
    payload_blob(&mut StdRng::from_entropy(), payload_kib)
}

fn payload_blob(rng: &mut StdRng, payload_kib: usize) -> String {
    (0..payload_kib * 1024)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}
