// deepslam_core/src/dataset/tum.rs

use std::fs;
use std::path::{Path, PathBuf};

use super::{
    list_subdirectories, require_sequence_dir, DatasetError, DatasetKind, FrameSource,
    FrameStream,
};
use crate::estimation::{Frame, Intrinsics};

/// TUM RGB-D benchmark: `<root>/<sequence>/rgb.txt` lists `timestamp filename`
/// pairs, relative to the sequence directory.
#[derive(Debug, Clone)]
pub struct TumRgbd {
    root: PathBuf,
}

impl TumRgbd {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Factory calibration of the Kinect used for the sequence, picked from
    /// the `freiburgN` tag in its name.
    pub fn intrinsics_for(sequence: &str) -> Intrinsics {
        if sequence.contains("freiburg1") {
            Intrinsics::new(517.3, 516.5, 318.6, 255.3)
        } else if sequence.contains("freiburg2") {
            Intrinsics::new(520.9, 521.0, 325.1, 249.7)
        } else if sequence.contains("freiburg3") {
            Intrinsics::new(535.4, 539.2, 320.1, 247.6)
        } else {
            Intrinsics::new(525.0, 525.0, 319.5, 239.5)
        }
    }
}

/// Parses one `rgb.txt` line. `None` for blank and comment lines.
fn parse_rgb_line(
    list_path: &Path,
    sequence_dir: &Path,
    line_no: usize,
    line: &str,
) -> Option<Result<(f64, PathBuf), DatasetError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut fields = line.split_whitespace();
    let parsed = match (fields.next(), fields.next()) {
        (Some(stamp), Some(file)) => stamp
            .parse::<f64>()
            .map(|t| (t, sequence_dir.join(file)))
            .map_err(|e| DatasetError::parse(list_path, line_no, format!("'{}': {}", stamp, e))),
        _ => Err(DatasetError::parse(
            list_path,
            line_no,
            "expected 'timestamp filename'",
        )),
    };
    Some(parsed)
}

impl FrameSource for TumRgbd {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Tum
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn sequences(&self) -> Result<Vec<String>, DatasetError> {
        list_subdirectories(&self.root)
    }

    fn iterate_sequence(&self, sequence: &str) -> Result<FrameStream, DatasetError> {
        let sequence_dir = require_sequence_dir(self.root.join(sequence), sequence)?;
        let list_path = sequence_dir.join("rgb.txt");
        let content = fs::read_to_string(&list_path).map_err(|e| DatasetError::io(&list_path, e))?;
        let intrinsics = Self::intrinsics_for(sequence);

        let lines: Vec<String> = content.lines().map(str::to_owned).collect();
        let mut index = 0;
        let stream = lines
            .into_iter()
            .enumerate()
            .filter_map(move |(i, line)| {
                parse_rgb_line(&list_path, &sequence_dir, i + 1, &line).map(|parsed| {
                    parsed.map(|(timestamp, image)| {
                        let frame = Frame {
                            index,
                            image,
                            intrinsics,
                            timestamp,
                        };
                        index += 1;
                        frame
                    })
                })
            });
        Ok(Box::new(stream))
    }
}
