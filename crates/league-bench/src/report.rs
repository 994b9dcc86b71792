//! Results aggregation and CSV rendering.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::backends::{BackendId, IndexingMode, Operation};
use crate::runner::TimingSample;

/// Mean latency for one (backend, mode, size, operation) group.
///
/// This is the only externally reported artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub backend: BackendId,
    pub mode: IndexingMode,
    pub size: usize,
    pub op: Operation,
    pub mean_ms: f64,
}

/// Reduce timing samples to one row per observed group.
///
/// The mean is taken over however many samples the group holds, so
/// partially aborted scenarios still report. Output order is backend,
/// indexing mode, size ascending, then the canonical operation order,
/// deterministic regardless of sample order.
pub fn aggregate(samples: &[TimingSample]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<(BackendId, IndexingMode, usize, Operation), Vec<f64>> =
        BTreeMap::new();

    for s in samples {
        groups
            .entry((s.backend, s.mode, s.size, s.op))
            .or_default()
            .push(s.elapsed_ms);
    }

    groups
        .into_iter()
        .map(|((backend, mode, size, op), ms)| AggregateRow {
            backend,
            mode,
            size,
            op,
            mean_ms: ms.iter().sum::<f64>() / ms.len() as f64,
        })
        .collect()
}

/// CSV header line.
pub const CSV_HEADER: &str = "db,scenario,n,op,avg_ms";

/// Write the report as CSV: header plus one line per aggregate row,
/// mean formatted to 3 decimal places.
pub fn write_csv<W: Write>(out: &mut W, rows: &[AggregateRow]) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{:.3}",
            row.backend, row.mode, row.size, row.op, row.mean_ms
        )?;
    }
    Ok(())
}

/// Render the report to a string.
pub fn render_csv(rows: &[AggregateRow]) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    write_csv(&mut buf, rows).expect("in-memory write");
    String::from_utf8(buf).expect("CSV output is ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(
        backend: BackendId,
        mode: IndexingMode,
        size: usize,
        repeat: u32,
        op: Operation,
        elapsed_ms: f64,
    ) -> TimingSample {
        TimingSample {
            backend,
            mode,
            size,
            repeat,
            op,
            elapsed_ms,
        }
    }

    #[test]
    fn mean_is_arithmetic_over_the_group() {
        let samples: Vec<TimingSample> = (1..=10)
            .map(|r| {
                sample(
                    BackendId::Postgres,
                    IndexingMode::NoIndex,
                    100,
                    r,
                    Operation::Insert,
                    r as f64,
                )
            })
            .collect();

        let rows = aggregate(&samples);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].mean_ms - 5.5).abs() < 1e-9);
    }

    #[test]
    fn partial_groups_average_what_is_present() {
        // 3 of the nominal 10 repeats, simulating a mid-run abort.
        let samples = vec![
            sample(BackendId::Mongo, IndexingMode::WithIndex, 2000, 1, Operation::Delete, 4.0),
            sample(BackendId::Mongo, IndexingMode::WithIndex, 2000, 2, Operation::Delete, 5.0),
            sample(BackendId::Mongo, IndexingMode::WithIndex, 2000, 3, Operation::Delete, 9.0),
        ];

        let rows = aggregate(&samples);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].mean_ms - 6.0).abs() < 1e-9);
    }

    #[test]
    fn ordering_is_canonical_regardless_of_sample_order() {
        // Deliberately scrambled input.
        let samples = vec![
            sample(BackendId::MySql, IndexingMode::WithIndex, 100, 1, Operation::Delete, 1.0),
            sample(BackendId::Postgres, IndexingMode::WithIndex, 1, 1, Operation::Insert, 1.0),
            sample(BackendId::Postgres, IndexingMode::NoIndex, 100, 1, Operation::Update, 1.0),
            sample(BackendId::Postgres, IndexingMode::NoIndex, 100, 1, Operation::Insert, 1.0),
            sample(BackendId::Postgres, IndexingMode::NoIndex, 1, 1, Operation::Selects, 1.0),
        ];

        let rows = aggregate(&samples);
        let coords: Vec<(BackendId, IndexingMode, usize, Operation)> = rows
            .iter()
            .map(|r| (r.backend, r.mode, r.size, r.op))
            .collect();
        assert_eq!(
            coords,
            vec![
                (BackendId::Postgres, IndexingMode::NoIndex, 1, Operation::Selects),
                (BackendId::Postgres, IndexingMode::NoIndex, 100, Operation::Insert),
                (BackendId::Postgres, IndexingMode::NoIndex, 100, Operation::Update),
                (BackendId::Postgres, IndexingMode::WithIndex, 1, Operation::Insert),
                (BackendId::MySql, IndexingMode::WithIndex, 100, Operation::Delete),
            ]
        );
    }

    #[test]
    fn end_to_end_csv_for_a_fixed_latency_backend() {
        // One mock backend, sizes [1, 100], repeats 2: insert takes a
        // fixed 5ms, every other operation a fixed 2ms.
        let mut samples = Vec::new();
        for mode in IndexingMode::ALL {
            for size in [1usize, 100] {
                for repeat in 1..=2 {
                    for op in Operation::ALL {
                        let ms = if op == Operation::Insert { 5.0 } else { 2.0 };
                        samples.push(sample(BackendId::Mock, mode, size, repeat, op, ms));
                    }
                }
            }
        }

        let rows = aggregate(&samples);
        assert_eq!(rows.len(), 16);

        let csv = render_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 17, "header plus 16 rows");
        assert_eq!(lines[0], "db,scenario,n,op,avg_ms");
        assert_eq!(
            &lines[1..=4],
            &[
                "mockdb,no_index,1,insert,5.000",
                "mockdb,no_index,1,selects,2.000",
                "mockdb,no_index,1,update,2.000",
                "mockdb,no_index,1,delete,2.000",
            ]
        );
        assert_eq!(lines[5], "mockdb,no_index,100,insert,5.000");
        assert_eq!(lines[9], "mockdb,with_index,1,insert,5.000");
        assert_eq!(lines[16], "mockdb,with_index,100,delete,2.000");

        // no_index rows appear strictly before with_index rows.
        let split = lines
            .iter()
            .position(|l| l.contains(",with_index,"))
            .unwrap();
        assert!(lines[1..split].iter().all(|l| l.contains(",no_index,")));
        assert!(lines[split..].iter().all(|l| l.contains(",with_index,")));
    }

    #[test]
    fn formatting_rounds_to_three_decimals() {
        let rows = vec![AggregateRow {
            backend: BackendId::Postgres,
            mode: IndexingMode::NoIndex,
            size: 1,
            op: Operation::Insert,
            mean_ms: 1.23456,
        }];
        assert_eq!(render_csv(&rows), "db,scenario,n,op,avg_ms\npostgres,no_index,1,insert,1.235\n");
    }
}
