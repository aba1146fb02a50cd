// deepslam_core/src/estimation/replay.rs

use std::path::Path;

use crate::estimation::{EstimationError, Frame, PoseEstimator};
use crate::trajectory::{read_trajectory, TrajectoryRecord};
use crate::types::{Pose, Timestamp};

/// Default maximum distance, in seconds, between a frame and the replayed pose.
pub const DEFAULT_REPLAY_TOLERANCE: f64 = 0.02;

/// Replays poses from a previously recorded trajectory.
///
/// Each frame gets the pose whose timestamp is closest to the frame's own.
/// Frames with nothing within `tolerance` are reported as errors so the driver
/// can decide to skip them.
#[derive(Debug, Clone)]
pub struct ReplayEstimator {
    /// Sorted by timestamp.
    records: Vec<TrajectoryRecord>,
    tolerance: f64,
}

impl ReplayEstimator {
    pub fn new(mut records: Vec<TrajectoryRecord>, tolerance: f64) -> Self {
        records.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));
        Self {
            records,
            tolerance: tolerance.abs(),
        }
    }

    /// Loads a `poses.txt` file.
    pub fn from_file(path: &Path, tolerance: f64) -> Result<Self, EstimationError> {
        let records = read_trajectory(path)?;
        log::info!(
            "Loaded {} poses for replay from {}",
            records.len(),
            path.display()
        );
        Ok(Self::new(records, tolerance))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record closest in time to `timestamp`, if any lies within tolerance.
    fn nearest(&self, timestamp: Timestamp) -> Option<&TrajectoryRecord> {
        // First record not earlier than `timestamp`; its predecessor is the other candidate.
        let upper = self
            .records
            .partition_point(|r| r.timestamp() < timestamp);
        let after = self.records.get(upper);
        let before = upper.checked_sub(1).and_then(|i| self.records.get(i));

        let best = match (before, after) {
            (Some(b), Some(a)) => {
                if (timestamp - b.timestamp()).abs() <= (a.timestamp() - timestamp).abs() {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        ((best.timestamp() - timestamp).abs() <= self.tolerance).then_some(best)
    }
}

impl PoseEstimator for ReplayEstimator {
    fn name(&self) -> &str {
        "replay"
    }

    fn estimate(&mut self, frame: &Frame) -> Result<Pose, EstimationError> {
        self.nearest(frame.timestamp)
            .map(|r| *r.pose())
            .ok_or(EstimationError::NoPoseNear {
                timestamp: frame.timestamp,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::Intrinsics;
    use std::path::PathBuf;

    fn frame_at(timestamp: f64) -> Frame {
        Frame {
            index: 0,
            image: PathBuf::from("frame.png"),
            intrinsics: Intrinsics::new(500.0, 500.0, 320.0, 240.0),
            timestamp,
        }
    }

    fn replay() -> ReplayEstimator {
        // Deliberately out of order; the constructor sorts.
        let records = vec![
            TrajectoryRecord::new(0.2, Pose::from_translation(2.0, 0.0, 0.0)),
            TrajectoryRecord::new(0.0, Pose::from_translation(0.0, 0.0, 0.0)),
            TrajectoryRecord::new(0.1, Pose::from_translation(1.0, 0.0, 0.0)),
        ];
        ReplayEstimator::new(records, 0.02)
    }

    #[test]
    fn test_picks_closest_timestamp() {
        let mut est = replay();
        assert_eq!(est.estimate(&frame_at(0.101)).unwrap().translation()[0], 1.0);
        assert_eq!(est.estimate(&frame_at(0.189)).unwrap().translation()[0], 2.0);
        assert_eq!(est.estimate(&frame_at(-0.01)).unwrap().translation()[0], 0.0);
        assert_eq!(est.estimate(&frame_at(0.21)).unwrap().translation()[0], 2.0);
    }

    #[test]
    fn test_outside_tolerance_is_an_error() {
        let mut est = replay();
        match est.estimate(&frame_at(0.15)) {
            Err(EstimationError::NoPoseNear { timestamp }) => assert_eq!(timestamp, 0.15),
            other => panic!("expected NoPoseNear, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_replay_never_matches() {
        let mut est = ReplayEstimator::new(Vec::new(), 1.0);
        assert!(est.is_empty());
        assert!(est.estimate(&frame_at(0.0)).is_err());
    }
}
