// deepslam_demo/src/main.rs

use clap::Parser;
use std::process::ExitCode;

use deepslam_demo::app::{self, AppError, RunSettings};
use deepslam_demo::cli::Cli;
use deepslam_demo::config::DemoConfig;
use deepslam_core::dataset::DatasetRegistry;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load config before logging so its log level can be applied; the error is reported below.
    let config = DemoConfig::load(cli.config.as_deref());

    let level = cli
        .log_level
        .or_else(|| config.as_ref().ok().map(|c| c.run.log_level))
        .unwrap_or(deepslam_demo::cli::LogLevel::Info);
    env_logger::Builder::new()
        .filter_level(level.to_filter())
        .parse_default_env()
        .init();

    match config.map_err(AppError::from).and_then(|config| {
        let settings = RunSettings::resolve(&cli, &config);
        app::run(&settings, &DatasetRegistry::with_defaults())
    }) {
        Ok(report) => {
            log::info!(
                "Saved {} poses for '{}' to {}",
                report.summary.poses_recorded,
                report.sequence,
                report.poses_file.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
