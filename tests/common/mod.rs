//! Common test utilities module
//!
//! Provides shared utilities for tests including:
//! - Temporary file management
//! - Label catalogue fixtures
//! - Seeded random prediction batches

pub mod test_utils;

#[allow(unused_imports)]
pub use test_utils::{
    create_test_csv, create_test_file, klue_catalogue, klue_config_path, random_batch, TempTestDir,
};
