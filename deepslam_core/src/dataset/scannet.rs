// deepslam_core/src/dataset/scannet.rs

use std::fs;
use std::path::{Path, PathBuf};

use super::{
    list_images, list_subdirectories, require_sequence_dir, DatasetError, DatasetKind,
    FrameSource, FrameStream,
};
use crate::estimation::Intrinsics;

/// ScanNet exports carry no per-frame clock; the sensor runs at 30 Hz.
const SCANNET_FPS: f64 = 30.0;

/// ScanNet scenes exported with the `SensReader` tool:
/// `<root>/<scene>/color/<n>.jpg` and `<root>/<scene>/intrinsic/intrinsic_color.txt`.
#[derive(Debug, Clone)]
pub struct ScanNet {
    root: PathBuf,
}

impl ScanNet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// The color intrinsics are stored as a whitespace separated 4x4 matrix.
fn read_intrinsics(path: &Path) -> Result<Intrinsics, DatasetError> {
    let content = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    let values = content
        .split_whitespace()
        .map(str::parse::<f64>)
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| DatasetError::parse(path, 0, e.to_string()))?;
    if values.len() != 16 {
        return Err(DatasetError::parse(
            path,
            0,
            format!("expected a 4x4 matrix, found {} values", values.len()),
        ));
    }
    Ok(Intrinsics::new(values[0], values[5], values[2], values[6]))
}

/// Frame number from a `color/<n>.jpg` file name.
fn frame_number(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

impl FrameSource for ScanNet {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Scannet
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn sequences(&self) -> Result<Vec<String>, DatasetError> {
        list_subdirectories(&self.root)
    }

    fn iterate_sequence(&self, sequence: &str) -> Result<FrameStream, DatasetError> {
        let scene_dir = require_sequence_dir(self.root.join(sequence), sequence)?;
        let intrinsics = read_intrinsics(&scene_dir.join("intrinsic").join("intrinsic_color.txt"))?;

        // File names are unpadded frame numbers, so lexical order is wrong ("10" < "2").
        let mut images = list_images(&scene_dir.join("color"), &["jpg", "png"])?;
        images.sort_by_key(|p| frame_number(p).unwrap_or(u64::MAX));

        Ok(super::fixed_rate_stream(images, intrinsics, SCANNET_FPS))
    }
}
