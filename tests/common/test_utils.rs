//! Test utilities for temporary files and fixtures

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relex_metrics::{EvalPrediction, LabelCatalogue, MetricsConfig};
use tempfile::TempDir;

/// Temporary directory removed on drop
pub struct TempTestDir {
    dir: TempDir,
}

impl TempTestDir {
    pub fn new() -> Self {
        TempTestDir {
            dir: tempfile::Builder::new()
                .prefix("relex_metrics_test_")
                .tempdir()
                .expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the directory
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Write a file with the given content into the directory
pub fn create_test_file(dir: &TempTestDir, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Write a CSV file with the given headers and rows
pub fn create_test_csv(dir: &TempTestDir, name: &str, headers: &[&str], rows: &[Vec<String>]) -> PathBuf {
    let mut content = headers.join(",");
    content.push('\n');
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }
    create_test_file(dir, name, &content)
}

/// Path of the bundled KLUE-RE configuration
pub fn klue_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/klue_re.toml")
}

/// The 30-label KLUE-RE catalogue
pub fn klue_catalogue() -> LabelCatalogue {
    MetricsConfig::from_file(klue_config_path())
        .expect("Failed to load klue_re.toml")
        .label_catalogue()
        .expect("Invalid KLUE catalogue")
}

/// Random batch of `n` examples over `num_labels` labels
///
/// Scores are multiples of 1/1000, so ties occur and distinct scores stay
/// far apart relative to rounding error.
pub fn random_batch(seed: u64, n: usize, num_labels: usize) -> EvalPrediction {
    let mut rng = StdRng::seed_from_u64(seed);
    let scores: Vec<f64> = (0..n * num_labels)
        .map(|_| rng.random_range(0..1000) as f64 / 1000.0)
        .collect();
    let labels: Vec<usize> = (0..n).map(|_| rng.random_range(0..num_labels)).collect();
    EvalPrediction::new(
        Array2::from_shape_vec((n, num_labels), scores).expect("shape"),
        labels,
    )
}
