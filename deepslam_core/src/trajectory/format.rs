// deepslam_core/src/trajectory/format.rs

//! Plain-text trajectory format: one line per frame,
//! `timestamp r00 r01 r02 tx r10 r11 r12 ty r20 r21 r22 tz`, space separated,
//! no header.
//!
//! Values are written with the shortest decimal representation that parses
//! back to the same `f64`, so a written file is both stable and lossless.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::TrajectoryRecord;
use crate::error::TrajectoryError;
use crate::types::{Pose, POSE_BLOCK_LEN};

/// Fields per line: the timestamp plus the 3x4 block.
const FIELDS_PER_LINE: usize = 1 + POSE_BLOCK_LEN;

/// Writes every record, in order, to `writer`.
pub fn write_records<W: Write>(
    writer: &mut W,
    records: &[TrajectoryRecord],
) -> std::io::Result<()> {
    for record in records {
        write!(writer, "{}", record.timestamp())?;
        for value in record.pose().row_major_block() {
            write!(writer, " {}", value)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Reads a trajectory file previously produced by [`write_records`].
pub fn read_trajectory(path: &Path) -> Result<Vec<TrajectoryRecord>, TrajectoryError> {
    let content = fs::read_to_string(path).map_err(|e| TrajectoryError::io(path, e))?;
    parse_trajectory(&content, path)
}

/// Parses trajectory text. Blank lines and `#` comments are skipped.
/// `origin` is only used to label errors.
pub fn parse_trajectory(
    content: &str,
    origin: &Path,
) -> Result<Vec<TrajectoryRecord>, TrajectoryError> {
    let mut records = Vec::new();
    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parse_error = |reason: String| TrajectoryError::Parse {
            path: origin.to_path_buf(),
            line: idx + 1,
            reason,
        };

        let values = line
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<f64>()
                    .map_err(|e| parse_error(format!("'{}': {}", field, e)))
            })
            .collect::<Result<Vec<f64>, _>>()?;

        if values.len() != FIELDS_PER_LINE {
            return Err(parse_error(format!(
                "expected {} fields, found {}",
                FIELDS_PER_LINE,
                values.len()
            )));
        }

        let pose = Pose::from_row_slice(&values[1..])?;
        records.push(TrajectoryRecord::new(values[0], pose));
    }
    Ok(records)
}
