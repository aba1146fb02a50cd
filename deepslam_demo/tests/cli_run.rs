// deepslam_demo/tests/cli_run.rs

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use deepslam_demo::app::{self, AppError, RunSettings};
use deepslam_demo::prelude::*;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["deepslam"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

/// Two NYU-style scenes with a handful of images each.
fn nyu_fixture(root: &Path, frames: usize) {
    for scene in ["bathroom_0001", "kitchen_0002"] {
        let dir = root.join(scene);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..frames {
            fs::write(dir.join(format!("r-{:04}.ppm", i)), b"").unwrap();
        }
    }
}

#[test]
fn defaults_match_the_historical_flags() {
    let cli = parse(&[]);
    assert_eq!(cli.dataset, DatasetArg::Nyu);
    assert_eq!(cli.sequence, None);
    assert_eq!(cli.n_keyframes, 3);
    assert_eq!(cli.rate, 2);
    assert!(!cli.cinematic);
    assert!(!cli.clear_points);
    assert_eq!(cli.render_path, None);
    assert_eq!(cli.save_poses, PathBuf::from("./"));
}

#[test]
fn snake_case_flags_are_accepted() {
    let cli = parse(&[
        "--dataset",
        "kitti",
        "--sequence",
        "2011_09_26_drive_0005",
        "--n_keyframes",
        "5",
        "--rate",
        "4",
        "--cinematic",
        "--render_path",
        "renders",
        "--save_poses",
        "out/kitti",
        "--clear_points",
    ]);
    assert_eq!(cli.dataset, DatasetArg::Kitti);
    assert_eq!(cli.sequence.as_deref(), Some("2011_09_26_drive_0005"));
    assert_eq!(cli.n_keyframes, 5);
    assert_eq!(cli.rate, 4);
    assert!(cli.cinematic && cli.clear_points);
    assert_eq!(cli.render_path, Some(PathBuf::from("renders")));
    assert_eq!(cli.save_poses, PathBuf::from("out/kitti"));
}

#[test]
fn unknown_dataset_is_rejected_by_the_parser() {
    let result = Cli::try_parse_from(["deepslam", "--dataset", "euroc"]);
    assert!(result.is_err());
}

#[test]
fn settings_prefer_cli_over_config() {
    let mut config = DemoConfig::default();
    config.datasets.tum = PathBuf::from("/configured/tum");
    config.run.max_frames = Some(100);

    let cli = parse(&["--dataset", "tum", "--max_frames", "5", "--skip_failed"]);
    let settings = RunSettings::resolve(&cli, &config);
    assert_eq!(settings.dataset, DatasetKind::Tum);
    assert_eq!(settings.dataset_root, PathBuf::from("/configured/tum"));
    assert_eq!(settings.driver.max_frames, Some(5));
    assert_eq!(settings.driver.on_estimation_error, ErrorPolicy::Skip);
    assert_eq!(settings.profile.rate, Some(2));

    let cli = parse(&["--dataset", "tum", "--dataset_root", "/override"]);
    let settings = RunSettings::resolve(&cli, &config);
    assert_eq!(settings.dataset_root, PathBuf::from("/override"));
    assert_eq!(settings.driver.max_frames, Some(100));
    assert_eq!(settings.driver.on_estimation_error, ErrorPolicy::Abort);
}

#[test]
fn run_writes_one_line_per_frame_of_the_default_sequence() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    nyu_fixture(data.path(), 4);
    let save = out.path().join("nested").join("poses");

    let root = data.path().to_str().unwrap();
    let save_arg = save.to_str().unwrap();
    let cli = parse(&["--dataset_root", root, "--save_poses", save_arg]);
    let settings = RunSettings::resolve(&cli, &DemoConfig::default());

    let report = app::run(&settings, &DatasetRegistry::with_defaults()).unwrap();
    assert_eq!(report.sequence, "bathroom_0001");
    assert_eq!(report.summary.poses_recorded, 4);
    assert_eq!(report.poses_file, save.join("poses.txt"));

    let content = fs::read_to_string(&report.poses_file).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "0 1 0 0 0 0 1 0 0 0 0 1 0");
}

#[test]
fn run_with_replay_and_explicit_sequence() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    nyu_fixture(data.path(), 3);

    // NYU frames are stamped at 30 Hz.
    let replay = out.path().join("replay.txt");
    fs::write(
        &replay,
        "0 1 0 0 0 0 1 0 0 0 0 1 0\n\
         0.0333 1 0 0 1 0 1 0 0 0 0 1 0\n\
         0.0667 1 0 0 2 0 1 0 0 0 0 1 0\n",
    )
    .unwrap();

    let cli = parse(&[
        "--dataset_root",
        data.path().to_str().unwrap(),
        "--sequence",
        "kitchen_0002",
        "--replay",
        replay.to_str().unwrap(),
        "--save_poses",
        out.path().to_str().unwrap(),
    ]);
    let settings = RunSettings::resolve(&cli, &DemoConfig::default());
    let report = app::run(&settings, &DatasetRegistry::with_defaults()).unwrap();
    assert_eq!(report.sequence, "kitchen_0002");

    let content = fs::read_to_string(report.poses_file).unwrap();
    let tx: Vec<&str> = content
        .lines()
        .map(|l| l.split(' ').nth(4).unwrap())
        .collect();
    assert_eq!(tx, vec!["0", "1", "2"]);
}

#[test]
fn missing_sequence_is_an_error_and_writes_nothing() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    nyu_fixture(data.path(), 1);

    let cli = parse(&[
        "--dataset_root",
        data.path().to_str().unwrap(),
        "--sequence",
        "living_room_0099",
        "--save_poses",
        out.path().to_str().unwrap(),
    ]);
    let settings = RunSettings::resolve(&cli, &DemoConfig::default());
    match app::run(&settings, &DatasetRegistry::with_defaults()) {
        Err(AppError::Dataset(DatasetError::SequenceNotFound { sequence, .. })) => {
            assert_eq!(sequence, "living_room_0099")
        }
        other => panic!("expected SequenceNotFound, got {:?}", other),
    }
    assert!(!out.path().join("poses.txt").exists());
}
