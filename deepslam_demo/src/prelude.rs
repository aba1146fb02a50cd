// deepslam_demo/src/prelude.rs

// Re-export the entire deepslam_core prelude so you can easily access
// pure types like `Pose`, `TrajectoryAccumulator`, `PoseEstimator`, etc.
pub use deepslam_core::prelude::*;

// Re-export the demo-specific types.
pub use crate::app::{AppError, RunReport, RunSettings, VisualizationOptions};
pub use crate::cli::{Cli, DatasetArg, LogLevel};
pub use crate::config::DemoConfig;
