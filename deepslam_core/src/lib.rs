// deepslam_core/src/lib.rs

// This file defines the public modules of the library.
pub mod dataset;
pub mod driver;
pub mod error;
pub mod estimation;
pub mod prelude;
pub mod profile;
pub mod trajectory;
pub mod types;
