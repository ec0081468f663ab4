//! CSV exclusivity-table loader.
//!
//! # CSV format
//!
//! One row per mover-type pair.  Pairs are symmetric, so `car,pedestrian`
//! also sets `pedestrian,car`.
//!
//! ```csv
//! lhs,rhs,policy,slow_speed_mps
//! pedestrian,pedestrian,shared,
//! civil,pedestrian,shared_when_slow,1.2
//! ```
//!
//! | Column           | Values                                           |
//! |------------------|--------------------------------------------------|
//! | `lhs`, `rhs`     | `car`, `pedestrian`, `civil`, `emergency`        |
//! | `policy`         | `exclusive`, `shared`, `shared_when_slow`        |
//! | `slow_speed_mps` | optional; the last non-empty value wins          |
//!
//! Pairs absent from the file stay `Exclusive`.  `unknown` is rejected: a
//! pair involving an unclassified agent is always exclusive.

use std::io::Read;
use std::path::Path;

use nav_core::MoverType;
use serde::Deserialize;

use crate::{ExclusivityTable, PairPolicy, ReservationError, ReservationResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PolicyRecord {
    lhs:    String,
    rhs:    String,
    policy: String,
    #[serde(default)]
    slow_speed_mps: Option<f32>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load an [`ExclusivityTable`] from a CSV file.
pub fn load_exclusivity_csv(path: &Path) -> ReservationResult<ExclusivityTable> {
    let file = std::fs::File::open(path)?;
    load_exclusivity_reader(file)
}

/// Like [`load_exclusivity_csv`] but accepts any `Read` source.
pub fn load_exclusivity_reader<R: Read>(reader: R) -> ReservationResult<ExclusivityTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut table = ExclusivityTable::all_exclusive();

    for (line, result) in csv_reader.deserialize::<PolicyRecord>().enumerate() {
        let row = result.map_err(|e| ReservationError::Parse(e.to_string()))?;
        // Header is line 1.
        let line = line + 2;
        let lhs = parse_mover(&row.lhs, line)?;
        let rhs = parse_mover(&row.rhs, line)?;
        let policy: PairPolicy = row
            .policy
            .parse()
            .map_err(|e| ReservationError::Parse(format!("line {line}: {e}")))?;
        table.set(lhs, rhs, policy);

        if let Some(speed) = row.slow_speed_mps {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(ReservationError::Parse(format!(
                    "line {line}: slow_speed_mps must be a non-negative number, got {speed}"
                )));
            }
            table.slow_speed_mps = speed;
        }
    }

    Ok(table)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_mover(s: &str, line: usize) -> ReservationResult<MoverType> {
    let mover: MoverType = s
        .parse()
        .map_err(|e| ReservationError::Parse(format!("line {line}: {e}")))?;
    if !mover.is_known() {
        return Err(ReservationError::Parse(format!(
            "line {line}: `unknown` pairs are always exclusive and cannot be configured"
        )));
    }
    Ok(mover)
}
