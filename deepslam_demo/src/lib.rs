// deepslam_demo/src/lib.rs

// This prelude is for convenience for other files WITHIN the deepslam_demo crate.
pub mod prelude;

// Command line, layered configuration and the run wiring.
pub mod app;
pub mod cli;
pub mod config;
