// deepslam_core/src/estimation/mod.rs

use nalgebra::Matrix3;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::TrajectoryError;
use crate::types::{Pose, Timestamp};

// =========================================================================
// == Frame Data Structures ==
// =========================================================================

/// Pinhole camera intrinsics in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intrinsics {
    pub fx: f64, // focal length x
    pub fy: f64, // focal length y
    pub cx: f64, // principal point x
    pub cy: f64, // principal point y
}

impl Intrinsics {
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// The 3x3 camera matrix `K`.
    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Intrinsics for an image resized by `(sx, sy)`.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self {
            fx: self.fx * sx,
            fy: self.fy * sy,
            cx: self.cx * sx,
            cy: self.cy * sy,
        }
    }
}

/// One element of a frame stream: an image handle, its calibration and capture time.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position of the frame within its sequence.
    pub index: usize,
    /// Location of the image on disk. Decoding is left to the estimator.
    pub image: PathBuf,
    pub intrinsics: Intrinsics,
    pub timestamp: Timestamp,
}

// =========================================================================
// == The Estimator Trait ("Contract") ==
// =========================================================================

#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("no pose within tolerance of timestamp {timestamp}")]
    NoPoseNear { timestamp: Timestamp },

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    /// Failure inside a model backend.
    #[error("estimator backend failed: {0}")]
    Backend(String),
}

/// The capability of turning a frame into a camera pose.
///
/// The driver owns one estimator and calls it once per frame, in stream
/// order. Implementations may keep internal state (keyframes, maps) between
/// calls.
pub trait PoseEstimator: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn estimate(&mut self, frame: &Frame) -> Result<Pose, EstimationError>;
}

impl<E: PoseEstimator + ?Sized> PoseEstimator for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn estimate(&mut self, frame: &Frame) -> Result<Pose, EstimationError> {
        (**self).estimate(frame)
    }
}

// --- Declare the implementation sub-modules ---
mod replay;
mod static_pose;

// --- Re-export the public structs for a clean API ---
pub use replay::{ReplayEstimator, DEFAULT_REPLAY_TOLERANCE};
pub use static_pose::StaticEstimator;
