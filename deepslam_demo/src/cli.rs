// deepslam_demo/src/cli.rs

use clap::{Parser, ValueEnum};
use deepslam_core::dataset::DatasetKind;
use deepslam_core::profile::{DEFAULT_N_KEYFRAMES, DEFAULT_RATE};
use std::path::PathBuf;

/// deepslam: run a SLAM pose estimator over a recorded sequence and save the
/// camera trajectory.
///
/// This struct defines the command-line arguments of the `deepslam` binary.
/// Flags keep their historical snake_case spelling.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Which dataset to use.
    #[arg(long, value_enum, default_value_t = DatasetArg::Nyu)]
    pub dataset: DatasetArg,

    /// What video in the dataset to use. Defaults to the dataset's first sequence.
    #[arg(long)]
    pub sequence: Option<String>,

    // --- SLAM arguments ---
    /// Number of keyframes to use.
    #[arg(long = "n_keyframes", default_value_t = DEFAULT_N_KEYFRAMES)]
    pub n_keyframes: usize,

    /// Rate at which to add new frames.
    #[arg(long, default_value_t = DEFAULT_RATE)]
    pub rate: usize,

    // --- Visualization arguments ---
    /// Run visualization in cinematic mode.
    #[arg(long, default_value_t = false)]
    pub cinematic: bool,

    /// Where to save rendered images. Nothing is saved if omitted.
    #[arg(long = "render_path")]
    pub render_path: Option<PathBuf>,

    /// Directory where `poses.txt` is written.
    #[arg(long = "save_poses", default_value = "./")]
    pub save_poses: PathBuf,

    /// Only display the point cloud for the latest keyframe.
    #[arg(long = "clear_points", default_value_t = false)]
    pub clear_points: bool,

    // --- Run configuration ---
    /// TOML configuration file (dataset roots, run options).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides the configured root directory of the selected dataset.
    #[arg(long = "dataset_root")]
    pub dataset_root: Option<PathBuf>,

    /// Replay poses from an existing `poses.txt` instead of running a model.
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long = "max_frames")]
    pub max_frames: Option<usize>,

    /// Skip frames the estimator fails on instead of aborting the run.
    #[arg(long = "skip_failed", default_value_t = false)]
    pub skip_failed: bool,

    /// Log verbosity. `RUST_LOG` takes precedence when set.
    #[arg(long = "log_level", value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetArg {
    Kitti,
    Nyu,
    Scannet,
    Tum,
}

impl From<DatasetArg> for DatasetKind {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Kitti => DatasetKind::Kitti,
            DatasetArg::Nyu => DatasetKind::Nyu,
            DatasetArg::Scannet => DatasetKind::Scannet,
            DatasetArg::Tum => DatasetKind::Tum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}
