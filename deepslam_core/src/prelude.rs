// deepslam_core/src/prelude.rs

// --- Core Abstractions (The main contracts of the library) ---
pub use crate::dataset::{FrameSource, FrameStream};
pub use crate::estimation::PoseEstimator;

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::estimation::{Frame, Intrinsics};
pub use crate::trajectory::{AccumulatorState, TrajectoryAccumulator, TrajectoryRecord};
pub use crate::types::{Pose, Timestamp};

// --- Errors ---
pub use crate::dataset::DatasetError;
pub use crate::driver::DriverError;
pub use crate::error::TrajectoryError;
pub use crate::estimation::EstimationError;

// --- Wiring (registries, profiles, the driver loop) ---
pub use crate::dataset::{DatasetKind, DatasetRegistry};
pub use crate::driver::{DriverOptions, ErrorPolicy, RunSummary, SlamDriver};
pub use crate::profile::ModelProfile;

// --- Concrete implementations (Export common ones for convenience) ---
pub use crate::estimation::{ReplayEstimator, StaticEstimator};
