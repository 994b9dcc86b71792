//! Scenario runner.
//!
//! Drives one backend through the {indexing mode × size × repeat}
//! matrix, timing each workload operation with a monotonic clock.

use std::time::Instant;

use tracing::{info, warn};

use crate::backends::{Backend, BackendId, IndexingMode, Operation};
use crate::error::{BenchError, Result};
use crate::fixtures::{self, DEFAULT_BASE_YEAR, DEFAULT_PAYLOAD_KIB};

/// Default data volumes, ascending.
pub const DEFAULT_SIZES: [usize; 6] = [1, 100, 2000, 4000, 8000, 20000];

/// Default repeats per (indexing mode, size) cell.
pub const DEFAULT_REPEATS: u32 = 10;

/// The benchmark matrix for one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub sizes: Vec<usize>,
    pub repeats: u32,
    pub base_year: i32,
    pub payload_kib: usize,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            repeats: DEFAULT_REPEATS,
            base_year: DEFAULT_BASE_YEAR,
            payload_kib: DEFAULT_PAYLOAD_KIB,
        }
    }
}

impl RunPlan {
    pub fn new(sizes: Vec<usize>, repeats: u32) -> Self {
        Self {
            sizes,
            repeats,
            ..Self::default()
        }
    }
}

/// One timed operation at one scenario coordinate. Immutable once
/// recorded; lives only until aggregation.
#[derive(Debug, Clone)]
pub struct TimingSample {
    pub backend: BackendId,
    pub mode: IndexingMode,
    pub size: usize,
    pub repeat: u32,
    pub op: Operation,
    pub elapsed_ms: f64,
}

/// Run the full matrix against one backend, appending samples.
///
/// `setup` runs exactly once per indexing mode, not once per scenario.
/// A failed operation aborts the remaining operations of its
/// (size, repeat) scenario and the runner moves on; samples already
/// recorded stay valid. A `setup` failure is fatal for the backend and
/// is returned to the caller.
pub fn run_backend(
    backend: &mut dyn Backend,
    plan: &RunPlan,
    samples: &mut Vec<TimingSample>,
) -> Result<()> {
    let id = backend.id();
    let mut sizes = plan.sizes.clone();
    sizes.sort_unstable();

    for mode in IndexingMode::ALL {
        backend.setup(mode)?;
        info!(backend = %id, mode = %mode, "schema ready");

        for &size in &sizes {
            for repeat in 1..=plan.repeats {
                if let Err(abort) = run_scenario(backend, plan, mode, size, repeat, samples) {
                    warn!(
                        backend = %id,
                        mode = %mode,
                        size,
                        repeat,
                        op = abort.stage,
                        error = %abort.error,
                        "scenario aborted"
                    );
                }
            }
        }
    }
    Ok(())
}

/// A scenario abort: which stage failed, plus the underlying error.
///
/// The stage is the operation name, or "clear" for the untimed
/// pre-insert wipe, so diagnostics always name what failed.
struct ScenarioAbort {
    stage: &'static str,
    error: BenchError,
}

/// One (size, repeat) iteration: clear, then the four timed operations
/// in workload order. Clear precedes insert so earlier repeats never
/// pollute the dataset, and update/delete run after the selects so the
/// select timings see the full inserted volume.
fn run_scenario(
    backend: &mut dyn Backend,
    plan: &RunPlan,
    mode: IndexingMode,
    size: usize,
    repeat: u32,
    samples: &mut Vec<TimingSample>,
) -> std::result::Result<(), ScenarioAbort> {
    backend.clear().map_err(|error| ScenarioAbort {
        stage: "clear",
        error,
    })?;

    // Fixture generation is not part of the insert measurement.
    let records = fixtures::generate(size, plan.base_year, plan.payload_kib);

    let backend_id = backend.id();
    let record = |op: Operation, elapsed_ms: f64, samples: &mut Vec<TimingSample>| {
        samples.push(TimingSample {
            backend: backend_id,
            mode,
            size,
            repeat,
            op,
            elapsed_ms,
        });
    };

    let abort = |op: Operation| {
        move |error: BenchError| ScenarioAbort {
            stage: op.as_str(),
            error,
        }
    };

    let ms = time_op(|| backend.insert(&records)).map_err(abort(Operation::Insert))?;
    record(Operation::Insert, ms, samples);

    let ms = time_op(|| backend.run_selects(size)).map_err(abort(Operation::Selects))?;
    record(Operation::Selects, ms, samples);

    let ms = time_op(|| backend.update()).map_err(abort(Operation::Update))?;
    record(Operation::Update, ms, samples);

    let ms = time_op(|| backend.delete()).map_err(abort(Operation::Delete))?;
    record(Operation::Delete, ms, samples);

    Ok(())
}

/// Time a single operation in milliseconds. A failed operation yields
/// no measurement.
fn time_op<F: FnOnce() -> Result<()>>(f: F) -> Result<f64> {
    let start = Instant::now();
    f()?;
    Ok(start.elapsed().as_secs_f64() * 1_000.0)
}
