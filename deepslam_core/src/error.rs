// deepslam_core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while accumulating or persisting a trajectory.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// The pose buffer cannot be reshaped into a 3x4 (or 4x4) block.
    #[error("malformed pose: expected 12 (3x4) or 16 (4x4) values, found {found}")]
    MalformedPose { found: usize },

    /// Directory creation, file creation or a write failed.
    #[error("trajectory I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A trajectory file line could not be parsed back.
    #[error("invalid trajectory line {line} in {path}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl TrajectoryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
