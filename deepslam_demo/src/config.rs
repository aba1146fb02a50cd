// deepslam_demo/src/config.rs

//! Loading of the run configuration: built-in defaults, then an optional TOML
//! file, then `DEEPSLAM_*` environment variables. Command-line flags are
//! applied on top by the caller.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use deepslam_core::dataset::DatasetKind;
use deepslam_core::driver::ErrorPolicy;
use deepslam_core::estimation::DEFAULT_REPLAY_TOLERANCE;

use crate::cli::LogLevel;

/// Prefix of environment overrides, e.g. `DEEPSLAM_DATASETS__TUM=/mnt/tum`.
pub const ENV_PREFIX: &str = "DEEPSLAM_";

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    pub datasets: DatasetRoots,
    pub run: RunConfig,
    pub replay: ReplayConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections of the TOML file.
// =========================================================================

/// Where each dataset lives on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetRoots {
    pub kitti: PathBuf,
    pub nyu: PathBuf,
    pub scannet: PathBuf,
    pub tum: PathBuf,
}

impl Default for DatasetRoots {
    fn default() -> Self {
        Self {
            kitti: "/media/datadrive/data/KITTI/raw".into(),
            nyu: "data/slam/nyu/".into(),
            scannet: "data/slam/scannet/".into(),
            tum: "data/slam/tum".into(),
        }
    }
}

impl DatasetRoots {
    pub fn root_for(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Kitti => &self.kitti,
            DatasetKind::Nyu => &self.nyu,
            DatasetKind::Scannet => &self.scannet,
            DatasetKind::Tum => &self.tum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Log progress every N frames (0 disables).
    pub progress_interval: usize,
    pub max_frames: Option<usize>,
    pub on_estimation_error: ErrorPolicy,
    pub log_level: LogLevel,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            progress_interval: 50,
            max_frames: None,
            on_estimation_error: ErrorPolicy::Abort,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    /// Largest accepted gap, in seconds, between a frame and a replayed pose.
    pub tolerance: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_REPLAY_TOLERANCE,
        }
    }
}

impl DemoConfig {
    /// The layered figment: defaults < TOML file < environment.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(DemoConfig::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(file).extract()
    }
}
