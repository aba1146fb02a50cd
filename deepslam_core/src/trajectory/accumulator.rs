// deepslam_core/src/trajectory/accumulator.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::format::write_records;
use super::{TrajectoryRecord, POSES_FILE_NAME};
use crate::error::TrajectoryError;
use crate::types::{Pose, Timestamp};

/// Lifecycle of the accumulated trajectory for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulatorState {
    /// Records are being collected. Initial state.
    #[default]
    Accumulating,
    /// The current records have been written out. Recording may continue;
    /// a later export is a fresh, independent snapshot.
    Exported,
}

/// Buffers `(timestamp, pose)` pairs in arrival order and writes them out as
/// a `poses.txt` trajectory file.
///
/// There is no internal synchronization: `record` takes `&mut self`, so the
/// borrow checker already guarantees a single writer.
#[derive(Debug, Default, Clone)]
pub struct TrajectoryAccumulator {
    records: Vec<TrajectoryRecord>,
    state: AccumulatorState,
    /// How many recorded timestamps went backwards relative to the previous one.
    timestamp_regressions: usize,
}

impl TrajectoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one record. Timestamps that go backwards are accepted but
    /// counted and logged.
    pub fn record(&mut self, pose: Pose, timestamp: Timestamp) {
        if let Some(prev) = self.records.last() {
            if timestamp < prev.timestamp() {
                self.timestamp_regressions += 1;
                warn!(
                    "Timestamp went backwards: {} after {} (record #{})",
                    timestamp,
                    prev.timestamp(),
                    self.records.len()
                );
            }
        }
        self.records.push(TrajectoryRecord::new(timestamp, pose));
        self.state = AccumulatorState::Accumulating;
    }

    /// Records a pose given as a flat row-major buffer of 12 or 16 values.
    /// A buffer of any other length is rejected and nothing is appended.
    pub fn record_raw(
        &mut self,
        values: &[f64],
        timestamp: Timestamp,
    ) -> Result<(), TrajectoryError> {
        let pose = Pose::from_row_slice(values)?;
        self.record(pose, timestamp);
        Ok(())
    }

    /// Writes every record to `dir/poses.txt`, creating `dir` and any missing
    /// parents first. An existing file is overwritten. Returns the file path.
    ///
    /// If this fails midway the file contents are undefined; call it again.
    pub fn export(&mut self, dir: &Path) -> Result<PathBuf, TrajectoryError> {
        fs::create_dir_all(dir).map_err(|e| TrajectoryError::io(dir, e))?;

        let path = dir.join(POSES_FILE_NAME);
        let file = File::create(&path).map_err(|e| TrajectoryError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| TrajectoryError::io(&path, e))?;

        self.state = AccumulatorState::Exported;
        info!(
            "Exported {} poses to {}",
            self.records.len(),
            path.display()
        );
        Ok(path)
    }

    /// Writes the trajectory text to an arbitrary writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_records(writer, &self.records)
    }

    /// Drops all records so the accumulator can be reused for another run.
    pub fn reset(&mut self) {
        debug!("Resetting trajectory ({} records dropped)", self.records.len());
        self.records.clear();
        self.timestamp_regressions = 0;
        self.state = AccumulatorState::Accumulating;
    }

    pub fn records(&self) -> &[TrajectoryRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&TrajectoryRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn state(&self) -> AccumulatorState {
        self.state
    }

    pub fn timestamp_regressions(&self) -> usize {
        self.timestamp_regressions
    }
}
