// deepslam_core/src/profile.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dataset::DatasetKind;

pub const DEFAULT_N_KEYFRAMES: usize = 3;
pub const DEFAULT_RATE: usize = 2;

/// Which pretrained network configuration a run uses, and how it is driven.
///
/// Outdoor driving (KITTI) has its own checkpoint; the indoor datasets share
/// one trained on NYU and ScanNet, which also enables the FCRN depth prior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProfile {
    /// Network/solver configuration file.
    pub config_file: PathBuf,
    /// Pretrained weights.
    pub checkpoint: PathBuf,
    /// Number of keyframes kept in the optimization window.
    pub n_keyframes: usize,
    /// Rate at which new frames are added. Only used by the indoor variant.
    pub rate: Option<usize>,
    /// Whether single-image depth initialization is enabled.
    pub use_fcrn: bool,
}

impl ModelProfile {
    pub fn for_dataset(kind: DatasetKind, n_keyframes: usize, rate: usize) -> Self {
        match kind {
            DatasetKind::Kitti => Self {
                config_file: PathBuf::from("cfgs/kitti.yaml"),
                checkpoint: PathBuf::from("models/kitti.ckpt"),
                n_keyframes,
                rate: None,
                use_fcrn: false,
            },
            DatasetKind::Nyu | DatasetKind::Scannet | DatasetKind::Tum => Self {
                config_file: PathBuf::from("cfgs/nyu.yaml"),
                checkpoint: PathBuf::from("models/nyu_scannet.ckpt"),
                n_keyframes,
                rate: Some(rate),
                use_fcrn: true,
            },
        }
    }
}
