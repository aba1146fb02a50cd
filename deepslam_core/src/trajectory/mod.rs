// deepslam_core/src/trajectory/mod.rs

//! Buffering of per-frame pose estimates and the `poses.txt` file format.

use crate::types::{Pose, Timestamp};

/// Fixed name of the exported trajectory file inside the target directory.
pub const POSES_FILE_NAME: &str = "poses.txt";

/// One timestamped pose, in the order it was received. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRecord {
    timestamp: Timestamp,
    pose: Pose,
}

impl TrajectoryRecord {
    pub fn new(timestamp: Timestamp, pose: Pose) -> Self {
        Self { timestamp, pose }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }
}

// --- Declare the implementation sub-modules ---
mod accumulator;
mod format;

// --- Re-export the public items for a clean API ---
pub use accumulator::{AccumulatorState, TrajectoryAccumulator};
pub use format::{parse_trajectory, read_trajectory, write_records};
