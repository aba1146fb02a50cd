// deepslam_core/src/dataset/kitti.rs

use std::fs;
use std::path::{Path, PathBuf};

use super::{
    list_images, list_subdirectories, DatasetError, DatasetKind, FrameSource, FrameStream,
};
use crate::estimation::{Frame, Intrinsics};

/// Drive used when no sequence is requested.
pub const KITTI_DEFAULT_SEQUENCE: &str = "2011_09_26_drive_0002";

/// Camera used for monocular SLAM (left color).
const CAMERA_DIR: &str = "image_02";
const CALIB_FILE: &str = "calib_cam_to_cam.txt";
const CALIB_KEY: &str = "P_rect_02:";

/// KITTI raw recordings, laid out as distributed:
/// `<root>/<date>/<date>_drive_<nnnn>_sync/image_02/{data/*.png, timestamps.txt}`
/// with the per-day calibration in `<root>/<date>/calib_cam_to_cam.txt`.
#[derive(Debug, Clone)]
pub struct KittiRaw {
    root: PathBuf,
}

impl KittiRaw {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `2011_09_26_drive_0002` lives under the `2011_09_26` day directory.
    fn date_of(sequence: &str) -> &str {
        sequence.get(..10).unwrap_or(sequence)
    }

    fn camera_dir(&self, sequence: &str) -> PathBuf {
        self.root
            .join(Self::date_of(sequence))
            .join(format!("{}_sync", sequence))
            .join(CAMERA_DIR)
    }
}

/// Reads `fx fy cx cy` from the rectified projection matrix of camera 2.
fn read_intrinsics(calib_path: &Path) -> Result<Intrinsics, DatasetError> {
    let content = fs::read_to_string(calib_path).map_err(|e| DatasetError::io(calib_path, e))?;
    for (i, line) in content.lines().enumerate() {
        let Some(rest) = line.trim().strip_prefix(CALIB_KEY) else {
            continue;
        };
        let values = rest
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| DatasetError::parse(calib_path, i + 1, e.to_string()))?;
        if values.len() != 12 {
            return Err(DatasetError::parse(
                calib_path,
                i + 1,
                format!("expected a 3x4 projection, found {} values", values.len()),
            ));
        }
        return Ok(Intrinsics::new(values[0], values[5], values[2], values[6]));
    }
    Err(DatasetError::parse(
        calib_path,
        0,
        format!("missing {}", CALIB_KEY.trim_end_matches(':')),
    ))
}

/// A `timestamps.txt` entry, split into a civil day number and the seconds
/// elapsed since that day's midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ClockStamp {
    day: i64,
    seconds: f64,
}

impl ClockStamp {
    /// Seconds from `origin` to `self`, correct across midnight.
    fn seconds_since(&self, origin: &ClockStamp) -> f64 {
        (self.day - origin.day) as f64 * 86_400.0 + (self.seconds - origin.seconds)
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Parses `2011-09-26 13:02:25.964389445`.
fn parse_clock_time(stamp: &str) -> Option<ClockStamp> {
    let mut fields = stamp.split_whitespace();
    let (date, clock) = (fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    let mut ymd = date.split('-');
    let year: i64 = ymd.next()?.parse().ok()?;
    let month: i64 = ymd.next()?.parse().ok()?;
    let day: i64 = ymd.next()?.parse().ok()?;
    if ymd.next().is_some() || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut parts = clock.split(':');
    let hours: f64 = parts.next()?.parse().ok()?;
    let minutes: f64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(ClockStamp {
        day: days_from_civil(year, month, day),
        seconds: hours * 3600.0 + minutes * 60.0 + seconds,
    })
}

impl FrameSource for KittiRaw {
    fn kind(&self) -> DatasetKind {
        DatasetKind::Kitti
    }

    fn root(&self) -> &Path {
        &self.root
    }

    /// Every `<date>_drive_<nnnn>` found under the day directories.
    fn sequences(&self) -> Result<Vec<String>, DatasetError> {
        let mut sequences = Vec::new();
        for day in list_subdirectories(&self.root)? {
            for drive in list_subdirectories(&self.root.join(&day))? {
                if let Some(name) = drive.strip_suffix("_sync") {
                    sequences.push(name.to_string());
                }
            }
        }
        sequences.sort();
        Ok(sequences)
    }

    fn default_sequence(&self) -> Result<String, DatasetError> {
        Ok(KITTI_DEFAULT_SEQUENCE.to_string())
    }

    fn iterate_sequence(&self, sequence: &str) -> Result<FrameStream, DatasetError> {
        let camera_dir = self.camera_dir(sequence);
        if !camera_dir.is_dir() {
            return Err(DatasetError::SequenceNotFound {
                sequence: sequence.to_string(),
                path: camera_dir,
            });
        }

        let calib_path = self.root.join(Self::date_of(sequence)).join(CALIB_FILE);
        let intrinsics = read_intrinsics(&calib_path)?;

        let images = list_images(&camera_dir.join("data"), &["png"])?;
        let stamps_path = camera_dir.join("timestamps.txt");
        let stamps: Vec<String> = fs::read_to_string(&stamps_path)
            .map_err(|e| DatasetError::io(&stamps_path, e))?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_owned)
            .collect();

        if stamps.len() != images.len() {
            return Err(DatasetError::parse(
                &stamps_path,
                0,
                format!("{} timestamps for {} images", stamps.len(), images.len()),
            ));
        }

        // Timestamps are reported relative to the first frame of the drive.
        let origin = match stamps.first() {
            Some(first) => parse_clock_time(first)
                .ok_or_else(|| DatasetError::parse(&stamps_path, 1, format!("'{}'", first)))?,
            None => ClockStamp { day: 0, seconds: 0.0 },
        };

        let stream = images
            .into_iter()
            .zip(stamps)
            .enumerate()
            .map(move |(index, (image, stamp))| -> Result<Frame, DatasetError> {
                let clock = parse_clock_time(&stamp).ok_or_else(|| {
                    DatasetError::parse(&stamps_path, index + 1, format!("'{}'", stamp))
                })?;
                Ok(Frame {
                    index,
                    image,
                    intrinsics,
                    timestamp: clock.seconds_since(&origin),
                })
            });
        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tempfile::TempDir;

    const CALIB: &str = "calib_time: 09-Jan-2012 13:57:47\n\
        P_rect_00: 7.215377e+02 0.000000e+00 6.095593e+02 0.000000e+00 0.000000e+00 7.215377e+02 1.728540e+02 0.000000e+00 0.000000e+00 0.000000e+00 1.000000e+00 0.000000e+00\n\
        P_rect_02: 7.215377e+02 0.000000e+00 6.095593e+02 4.485728e+01 0.000000e+00 7.215377e+02 1.728540e+02 2.163791e-01 0.000000e+00 0.000000e+00 1.000000e+00 2.745884e-03\n";

    fn fixture(frames: usize) -> TempDir {
        let dir = TempDir::new().unwrap();
        let day = dir.path().join("2011_09_26");
        let cam = day.join("2011_09_26_drive_0002_sync").join(CAMERA_DIR);
        fs::create_dir_all(cam.join("data")).unwrap();
        fs::write(day.join(CALIB_FILE), CALIB).unwrap();

        let mut stamps = String::new();
        for i in 0..frames {
            fs::write(cam.join("data").join(format!("{:010}.png", i)), b"").unwrap();
            stamps.push_str(&format!("2011-09-26 13:02:25.{:09}\n", 100_000_000 * i + 5));
        }
        fs::write(cam.join("timestamps.txt"), stamps).unwrap();
        dir
    }

    #[test]
    fn test_default_sequence_is_fixed() {
        let dir = TempDir::new().unwrap();
        let kitti = KittiRaw::new(dir.path());
        assert_eq!(kitti.default_sequence().unwrap(), KITTI_DEFAULT_SEQUENCE);
    }

    #[test]
    fn test_sequences_strip_sync_suffix() {
        let dir = fixture(1);
        let kitti = KittiRaw::new(dir.path());
        assert_eq!(kitti.sequences().unwrap(), vec!["2011_09_26_drive_0002"]);
    }

    #[test]
    fn test_frames_use_relative_timestamps_and_p_rect_02() {
        let dir = fixture(3);
        let kitti = KittiRaw::new(dir.path());
        let frames: Vec<Frame> = kitti
            .iterate_sequence(KITTI_DEFAULT_SEQUENCE)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(frames.len(), 3);
        assert_abs_diff_eq!(frames[0].timestamp, 0.0);
        assert_abs_diff_eq!(frames[2].timestamp, 0.2, epsilon = 1e-6);
        assert!(frames[1].image.ends_with("0000000001.png"));
        assert_abs_diff_eq!(frames[0].intrinsics.fx, 721.5377);
        assert_abs_diff_eq!(frames[0].intrinsics.cy, 172.854);
    }

    #[test]
    fn test_mismatched_timestamps_are_rejected() {
        let dir = fixture(2);
        let stamps = dir
            .path()
            .join("2011_09_26/2011_09_26_drive_0002_sync/image_02/timestamps.txt");
        fs::write(stamps, "2011-09-26 13:02:25.000000000\n").unwrap();

        let kitti = KittiRaw::new(dir.path());
        assert!(matches!(
            kitti.iterate_sequence(KITTI_DEFAULT_SEQUENCE),
            Err(DatasetError::Parse { .. })
        ));
    }

    #[test]
    fn test_clock_parsing() {
        let stamp = parse_clock_time("2011-09-26 01:00:01.5").unwrap();
        assert_eq!(stamp.seconds, 3601.5);
        assert_eq!(stamp.day, days_from_civil(2011, 9, 26));
        assert_eq!(parse_clock_time("13:02:25"), None);
        assert_eq!(parse_clock_time("2011-09-26 13:02"), None);
        assert_eq!(parse_clock_time("2011-13-26 13:02:25"), None);
    }

    #[test]
    fn test_civil_day_numbers() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2000, 3, 1), 11_017);
        assert_eq!(days_from_civil(2011, 9, 30) + 1, days_from_civil(2011, 10, 1));
        assert_eq!(days_from_civil(2012, 2, 29) + 1, days_from_civil(2012, 3, 1));
    }

    #[test]
    fn test_drive_across_midnight_keeps_increasing() {
        let dir = fixture(2);
        let stamps = dir
            .path()
            .join("2011_09_26/2011_09_26_drive_0002_sync/image_02/timestamps.txt");
        fs::write(
            stamps,
            "2011-09-26 23:59:59.750000000
2011-09-27 00:00:00.250000000
",
        )
        .unwrap();

        let kitti = KittiRaw::new(dir.path());
        let frames: Vec<Frame> = kitti
            .iterate_sequence(KITTI_DEFAULT_SEQUENCE)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_abs_diff_eq!(frames[0].timestamp, 0.0);
        assert_abs_diff_eq!(frames[1].timestamp, 0.5, epsilon = 1e-9);
    }
}
