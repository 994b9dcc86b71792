//! Benchmark harness binary.
//!
//! Runs the full matrix against every selected backend in sequence and
//! prints the CSV report to stdout. Diagnostics go to stderr so the
//! report stays machine-readable. Exit status is 0 whenever a report
//! was produced, even if some backends failed.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use league_bench::backends::{MockBackend, MongoBackend, MySqlBackend, PostgresBackend};
use league_bench::{config, report, runner, Backend, BackendId, RunPlan};

#[derive(Parser, Debug)]
#[command(
    name = "league-bench",
    about = "Cross-database benchmark for the league data stores"
)]
struct Cli {
    /// Row counts to benchmark (comma-separated, ascending).
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Repeats per (indexing mode, size) cell, between 1 and 10.
    #[arg(long, default_value_t = runner::DEFAULT_REPEATS)]
    repeats: u32,

    /// Skip backends (comma-separated: postgres, mysql, mongo).
    #[arg(long, value_delimiter = ',')]
    skip: Vec<String>,

    /// Run only the in-memory mock backend; no databases required.
    #[arg(long)]
    mock: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.repeats < 1 || cli.repeats > 10 {
        anyhow::bail!("--repeats must be between 1 and 10, got {}", cli.repeats);
    }
    if let Some(sizes) = &cli.sizes {
        if sizes.is_empty() || sizes.contains(&0) {
            anyhow::bail!("--sizes must list at least one nonzero row count");
        }
    }

    let plan = RunPlan::new(
        cli.sizes.unwrap_or_else(|| runner::DEFAULT_SIZES.to_vec()),
        cli.repeats,
    );

    let selected: Vec<BackendId> = if cli.mock {
        vec![BackendId::Mock]
    } else {
        let skip: Vec<String> = cli.skip.iter().map(|s| s.to_lowercase()).collect();
        [BackendId::Postgres, BackendId::MySql, BackendId::Mongo]
            .into_iter()
            .filter(|id| !skip.contains(&id.as_str().to_string()))
            .collect()
    };
    if selected.is_empty() {
        anyhow::bail!("all backends skipped; nothing to benchmark");
    }

    info!(
        sizes = ?plan.sizes,
        repeats = plan.repeats,
        backends = ?selected.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
        "starting benchmark run"
    );

    let mut samples = Vec::new();
    for id in selected {
        // Configuration and connection failures disqualify one backend;
        // the rest of the run continues.
        let mut backend = match build_backend(id) {
            Ok(b) => b,
            Err(e) => {
                error!(backend = %id, error = %e, "backend skipped");
                continue;
            }
        };
        info!(backend = %id, "connected");

        if let Err(e) = runner::run_backend(backend.as_mut(), &plan, &mut samples) {
            error!(backend = %id, error = %e, "backend run aborted");
        } else {
            info!(backend = %id, "backend run complete");
        }
    }

    if samples.is_empty() {
        anyhow::bail!("no backend produced any samples; no report to emit");
    }

    let rows = report::aggregate(&samples);
    report::write_csv(&mut std::io::stdout().lock(), &rows)?;
    Ok(())
}

fn build_backend(id: BackendId) -> league_bench::Result<Box<dyn Backend>> {
    match id {
        BackendId::Postgres => {
            let dsn = config::postgres_dsn()?;
            Ok(Box::new(PostgresBackend::connect(&dsn)?))
        }
        BackendId::MySql => {
            let uri = config::mysql_uri()?;
            Ok(Box::new(MySqlBackend::connect(&uri)?))
        }
        BackendId::Mongo => {
            let uri = config::mongo_uri()?;
            let db = config::mongo_db()?;
            Ok(Box::new(MongoBackend::connect(&uri, &db)?))
        }
        BackendId::Mock => Ok(Box::new(MockBackend::new())),
    }
}
