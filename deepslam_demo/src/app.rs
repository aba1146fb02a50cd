// deepslam_demo/src/app.rs

//! Wires one run together: dataset adapter, sequence, model profile,
//! estimator, driver loop and the final `poses.txt` export.

use log::{debug, info, warn};
use std::path::PathBuf;
use thiserror::Error;

use deepslam_core::prelude::*;

use crate::cli::Cli;
use crate::config::DemoConfig;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("cannot set up estimator: {0}")]
    Estimator(#[from] EstimationError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("cannot save poses: {0}")]
    Export(#[from] TrajectoryError),
}

/// Rendering switches carried for the viewer. No rendering backend ships with
/// this binary, so they are only reported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisualizationOptions {
    pub cinematic: bool,
    pub render_path: Option<PathBuf>,
    pub clear_points: bool,
}

impl VisualizationOptions {
    pub fn is_requested(&self) -> bool {
        self.cinematic || self.render_path.is_some() || self.clear_points
    }
}

/// Everything a run needs, after merging the config layers with the CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub dataset: DatasetKind,
    pub dataset_root: PathBuf,
    /// `None` means "the dataset's default sequence".
    pub sequence: Option<String>,
    pub profile: ModelProfile,
    pub visualization: VisualizationOptions,
    pub save_poses: PathBuf,
    pub replay: Option<PathBuf>,
    pub replay_tolerance: f64,
    pub driver: DriverOptions,
}

impl RunSettings {
    /// CLI flags win over the configuration file and environment.
    pub fn resolve(cli: &Cli, config: &DemoConfig) -> Self {
        let dataset = DatasetKind::from(cli.dataset);
        let dataset_root = cli
            .dataset_root
            .clone()
            .unwrap_or_else(|| config.datasets.root_for(dataset).to_path_buf());

        let on_estimation_error = if cli.skip_failed {
            ErrorPolicy::Skip
        } else {
            config.run.on_estimation_error
        };

        Self {
            dataset,
            dataset_root,
            sequence: cli.sequence.clone(),
            profile: ModelProfile::for_dataset(dataset, cli.n_keyframes, cli.rate),
            visualization: VisualizationOptions {
                cinematic: cli.cinematic,
                render_path: cli.render_path.clone(),
                clear_points: cli.clear_points,
            },
            save_poses: cli.save_poses.clone(),
            replay: cli.replay.clone(),
            replay_tolerance: config.replay.tolerance,
            driver: DriverOptions {
                max_frames: cli.max_frames.or(config.run.max_frames),
                progress_interval: config.run.progress_interval,
                on_estimation_error,
            },
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub sequence: String,
    pub summary: RunSummary,
    pub poses_file: PathBuf,
}

/// Picks the pose estimator for this run.
///
/// With `--replay` the poses come from an earlier trajectory file. Otherwise
/// no network backend is linked into this binary, and the static estimator
/// stands in so the dataset and export path can still be exercised.
pub fn build_estimator(settings: &RunSettings) -> Result<Box<dyn PoseEstimator>, AppError> {
    if let Some(path) = &settings.replay {
        let estimator = ReplayEstimator::from_file(path, settings.replay_tolerance)?;
        if estimator.is_empty() {
            warn!("Replay file {} holds no poses", path.display());
        }
        return Ok(Box::new(estimator));
    }

    warn!(
        "No model backend available for {} (config {}, n_keyframes {}); using the static estimator",
        settings.profile.checkpoint.display(),
        settings.profile.config_file.display(),
        settings.profile.n_keyframes
    );
    Ok(Box::new(StaticEstimator::default()))
}

/// Runs one sequence end to end and writes `poses.txt`.
pub fn run(settings: &RunSettings, registry: &DatasetRegistry) -> Result<RunReport, AppError> {
    let source = registry.build(settings.dataset, settings.dataset_root.clone())?;
    let sequence = match &settings.sequence {
        Some(sequence) => sequence.clone(),
        None => {
            let sequence = source.default_sequence()?;
            info!("No sequence given, using '{}'", sequence);
            sequence
        }
    };

    info!(
        "Dataset {} at {}, sequence '{}'",
        settings.dataset,
        settings.dataset_root.display(),
        sequence
    );
    debug!("Model profile: {:?}", settings.profile);
    if settings.visualization.is_requested() {
        warn!(
            "Visualization requested ({:?}) but no viewer is available; continuing headless",
            settings.visualization
        );
    }

    let estimator = build_estimator(settings)?;
    let frames = source.iterate_sequence(&sequence)?;

    let mut accumulator = TrajectoryAccumulator::new();
    let mut driver = SlamDriver::new(estimator, settings.driver.clone());
    let summary = driver.run(frames, &mut accumulator)?;

    debug!(
        "poses: ({}, 12), tstamps: ({}, 1)",
        accumulator.len(),
        accumulator.len()
    );
    if summary.timestamp_regressions > 0 {
        warn!(
            "{} timestamps went backwards in this sequence",
            summary.timestamp_regressions
        );
    }

    let poses_file = accumulator.export(&settings.save_poses)?;
    info!(
        "Done: {} frames, {} poses, {} skipped in {:.2?}",
        summary.frames_seen, summary.poses_recorded, summary.frames_skipped, summary.elapsed
    );
    if let Some(fps) = summary.throughput() {
        info!("Throughput: {:.1} frames/s", fps);
    }

    Ok(RunReport {
        sequence,
        summary,
        poses_file,
    })
}
