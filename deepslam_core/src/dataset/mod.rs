// deepslam_core/src/dataset/mod.rs

//! Dataset adapters: each one turns a sequence on disk into a lazy stream of
//! [`Frame`]s.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::estimation::Frame;

// =========================================================================
// == Identifiers and Errors ==
// =========================================================================

/// The recorded datasets the demo knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Kitti,
    Nyu,
    Scannet,
    Tum,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Kitti,
        DatasetKind::Nyu,
        DatasetKind::Scannet,
        DatasetKind::Tum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Kitti => "kitti",
            DatasetKind::Nyu => "nyu",
            DatasetKind::Scannet => "scannet",
            DatasetKind::Tum => "tum",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| DatasetError::Unsupported(s.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unsupported dataset '{0}', expected one of: kitti, nyu, scannet, tum")]
    Unsupported(String),

    #[error("no sequences found under {0}")]
    NoSequences(PathBuf),

    #[error("sequence '{sequence}' not found (looked in {path})")]
    SequenceNotFound { sequence: String, path: PathBuf },

    #[error("dataset I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path} line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}

// =========================================================================
// == The Adapter Trait ==
// =========================================================================

/// Lazy, finite, non-restartable sequence of frames.
pub type FrameStream = Box<dyn Iterator<Item = Result<Frame, DatasetError>> + Send>;

/// A dataset rooted at a directory, holding one or more sequences.
pub trait FrameSource: Send + Sync {
    fn kind(&self) -> DatasetKind;

    fn root(&self) -> &Path;

    /// All sequence names available under the root, sorted.
    fn sequences(&self) -> Result<Vec<String>, DatasetError>;

    /// The sequence to use when none was requested: the first available one.
    fn default_sequence(&self) -> Result<String, DatasetError> {
        self.sequences()?
            .into_iter()
            .next()
            .ok_or_else(|| DatasetError::NoSequences(self.root().to_path_buf()))
    }

    /// Opens `sequence` for reading. Metadata errors surface here; per-frame
    /// problems surface as `Err` items of the stream.
    fn iterate_sequence(&self, sequence: &str) -> Result<FrameStream, DatasetError>;
}

// --- Shared helpers for the adapters ---

/// Sorted names of the sub-directories of `root`.
pub(crate) fn list_subdirectories(root: &Path) -> Result<Vec<String>, DatasetError> {
    let entries = fs::read_dir(root).map_err(|e| DatasetError::io(root, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DatasetError::io(root, e))?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Files in `dir` whose extension is one of `extensions` (case-insensitive), sorted by name.
pub(crate) fn list_images(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|e| DatasetError::io(dir, e))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DatasetError::io(dir, e))?.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                extensions.iter().any(|want| want.eq_ignore_ascii_case(ext))
            });
        if path.is_file() && matches {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

pub(crate) fn require_sequence_dir(path: PathBuf, sequence: &str) -> Result<PathBuf, DatasetError> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(DatasetError::SequenceNotFound {
            sequence: sequence.to_string(),
            path,
        })
    }
}

/// Streams image files at a fixed frame rate (datasets without per-frame timestamps).
pub(crate) fn fixed_rate_stream(
    images: Vec<PathBuf>,
    intrinsics: crate::estimation::Intrinsics,
    fps: f64,
) -> FrameStream {
    Box::new(images.into_iter().enumerate().map(move |(index, image)| {
        Ok(Frame {
            index,
            image,
            intrinsics,
            timestamp: index as f64 / fps,
        })
    }))
}

// --- Declare the implementation sub-modules ---
mod kitti;
mod nyu;
mod registry;
mod scannet;
mod tum;

// --- Re-export the public structs for a clean API ---
pub use kitti::{KittiRaw, KITTI_DEFAULT_SEQUENCE};
pub use nyu::NyuV2;
pub use registry::{DatasetRegistry, SourceConstructor};
pub use scannet::ScanNet;
pub use tum::TumRgbd;
