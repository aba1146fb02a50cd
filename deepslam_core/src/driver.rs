// deepslam_core/src/driver.rs

//! The frame-processing loop: frames in, poses recorded.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::dataset::{DatasetError, FrameStream};
use crate::estimation::{EstimationError, PoseEstimator};
use crate::trajectory::TrajectoryAccumulator;

/// What the driver does when the estimator fails on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log the failure, count the frame as skipped, and carry on.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverOptions {
    /// Stop after this many frames.
    pub max_frames: Option<usize>,
    /// Log progress every N frames. Zero disables progress logging.
    pub progress_interval: usize,
    pub on_estimation_error: ErrorPolicy,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            progress_interval: 50,
            on_estimation_error: ErrorPolicy::Abort,
        }
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("frame source failed after {frames_seen} frames: {source}")]
    Dataset {
        frames_seen: usize,
        #[source]
        source: DatasetError,
    },

    #[error("estimator '{estimator}' failed on frame {frame}: {source}")]
    Estimation {
        estimator: String,
        frame: usize,
        #[source]
        source: EstimationError,
    },
}

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames_seen: usize,
    pub poses_recorded: usize,
    pub frames_skipped: usize,
    pub timestamp_regressions: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Processed frames per second, if any time elapsed.
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.frames_seen as f64 / secs)
    }
}

/// Feeds every frame of a stream through an estimator and records the
/// resulting poses. Strictly sequential: one frame, one estimate, one record.
pub struct SlamDriver<E: PoseEstimator> {
    estimator: E,
    options: DriverOptions,
}

impl<E: PoseEstimator> SlamDriver<E> {
    pub fn new(estimator: E, options: DriverOptions) -> Self {
        Self { estimator, options }
    }

    /// Consumes `frames` until it ends (or `max_frames` is reached).
    ///
    /// Dataset errors always stop the run. Estimator errors stop it too unless
    /// the policy is [`ErrorPolicy::Skip`]. Poses recorded before an error stay
    /// in `accumulator`.
    pub fn run(
        &mut self,
        frames: FrameStream,
        accumulator: &mut TrajectoryAccumulator,
    ) -> Result<RunSummary, DriverError> {
        let start = Instant::now();
        let regressions_before = accumulator.timestamp_regressions();
        let mut summary = RunSummary::default();

        info!(
            "Running estimator '{}' (max_frames: {:?})",
            self.estimator.name(),
            self.options.max_frames
        );

        // `take` stops before pulling the frame past the limit.
        let limit = self.options.max_frames.unwrap_or(usize::MAX);
        for item in frames.take(limit) {
            let frame = item.map_err(|source| DriverError::Dataset {
                frames_seen: summary.frames_seen,
                source,
            })?;
            summary.frames_seen += 1;

            match self.estimator.estimate(&frame) {
                Ok(pose) => {
                    accumulator.record(pose, frame.timestamp);
                    summary.poses_recorded += 1;
                }
                Err(source) => match self.options.on_estimation_error {
                    ErrorPolicy::Skip => {
                        warn!("Skipping frame {} ({}): {}", frame.index, frame.timestamp, source);
                        summary.frames_skipped += 1;
                    }
                    ErrorPolicy::Abort => {
                        return Err(DriverError::Estimation {
                            estimator: self.estimator.name().to_string(),
                            frame: frame.index,
                            source,
                        });
                    }
                },
            }

            let interval = self.options.progress_interval;
            if interval > 0 && summary.frames_seen % interval == 0 {
                info!(
                    "Processed {} frames ({} poses, {} skipped)",
                    summary.frames_seen, summary.poses_recorded, summary.frames_skipped
                );
            }
        }

        if summary.frames_seen == limit {
            debug!("Reached max_frames ({}), stopping early", limit);
        }
        summary.timestamp_regressions = accumulator.timestamp_regressions() - regressions_before;
        summary.elapsed = start.elapsed();
        Ok(summary)
    }
}
