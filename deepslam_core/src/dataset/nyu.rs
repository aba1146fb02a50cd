// deepslam_core/src/dataset/nyu.rs

use std::path::{Path, PathBuf};

use super::{
    list_images, list_subdirectories, require_sequence_dir, DatasetError, DatasetKind,
    FrameSource, FrameStream,
};
use crate::estimation::Intrinsics;

const NYU_FPS: f64 = 30.0;

/// NYU Depth V2 raw scenes, one directory of color images per sequence.
/// All scenes share the calibration of the same Kinect.
#[derive(Debug, Clone)]
pub struct NyuV2 {
    root: PathBuf,
}

impl NyuV2 {
    pub const INTRINSICS: Intrinsics = Intrinsics {
        fx: 518.857901,
        fy: 519.469611,
        cx: 325.582449,
        cy: 253.736166,
    };

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FrameSource for NyuV2 {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Nyu
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn sequences(&self) -> Result<Vec<String>, DatasetError> {
        list_subdirectories(&self.root)
    }

    fn iterate_sequence(&self, sequence: &str) -> Result<FrameStream, DatasetError> {
        let scene_dir = require_sequence_dir(self.root.join(sequence), sequence)?;
        let images = list_images(&scene_dir, &["png", "jpg", "ppm"])?;
        Ok(super::fixed_rate_stream(images, Self::INTRINSICS, NYU_FPS))
    }
}
