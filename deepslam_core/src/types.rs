// deepslam_core/src/types.rs

use nalgebra::{Isometry3, Matrix4, Translation3};

use crate::error::TrajectoryError;

// --- Core Type Aliases ---
/// Seconds, as reported by the frame source. Expected to be non-decreasing.
pub type Timestamp = f64;

/// Number of values exported per pose (the top 3x4 block).
pub const POSE_BLOCK_LEN: usize = 12;
/// Number of values in a full homogeneous 4x4 pose.
pub const POSE_FULL_LEN: usize = 16;

// --- Core Pose Type ---
/// A 4x4 homogeneous rigid transform in double precision.
///
/// The rotation block is not validated: whatever the estimator produced is
/// carried through untouched, and only the first three rows are exported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose(pub Matrix4<f64>);

impl Pose {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// A pure translation with identity rotation.
    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self(Translation3::new(x, y, z).to_homogeneous())
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }

    /// Builds a pose from a flat row-major buffer.
    ///
    /// Accepts either the 12 values of a 3x4 block (the bottom row is then
    /// `[0 0 0 1]`) or the 16 values of a full 4x4 matrix. Any other length
    /// cannot be reshaped and is rejected.
    pub fn from_row_slice(values: &[f64]) -> Result<Self, TrajectoryError> {
        match values.len() {
            POSE_FULL_LEN => Ok(Self(Matrix4::from_row_slice(values))),
            POSE_BLOCK_LEN => {
                let mut matrix = Matrix4::identity();
                for (i, value) in values.iter().enumerate() {
                    matrix[(i / 4, i % 4)] = *value;
                }
                Ok(Self(matrix))
            }
            found => Err(TrajectoryError::MalformedPose { found }),
        }
    }

    /// The top 3x4 block flattened row-major:
    /// `r00 r01 r02 tx r10 r11 r12 ty r20 r21 r22 tz`.
    pub fn row_major_block(&self) -> [f64; POSE_BLOCK_LEN] {
        let mut block = [0.0; POSE_BLOCK_LEN];
        for (i, slot) in block.iter_mut().enumerate() {
            *slot = self.0[(i / 4, i % 4)];
        }
        block
    }

    pub fn translation(&self) -> [f64; 3] {
        [self.0[(0, 3)], self.0[(1, 3)], self.0[(2, 3)]]
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Matrix4<f64>> for Pose {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self(matrix)
    }
}

impl From<Isometry3<f64>> for Pose {
    fn from(iso: Isometry3<f64>) -> Self {
        Self(iso.to_homogeneous())
    }
}
