// deepslam_core/src/estimation/static_pose.rs

use crate::estimation::{EstimationError, Frame, PoseEstimator};
use crate::types::Pose;

/// A placeholder estimator that reports the same pose for every frame.
/// It is used when no model backend is configured, so the rest of the
/// pipeline can still be exercised end to end.
#[derive(Debug, Clone, Default)]
pub struct StaticEstimator {
    pose: Pose,
}

impl StaticEstimator {
    pub fn new(pose: Pose) -> Self {
        Self { pose }
    }
}

impl PoseEstimator for StaticEstimator {
    fn name(&self) -> &str {
        "static"
    }

    fn estimate(&mut self, _frame: &Frame) -> Result<Pose, EstimationError> {
        Ok(self.pose)
    }
}
