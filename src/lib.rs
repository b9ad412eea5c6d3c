// 特定の警告を無効化
#![allow(clippy::result_large_err)]
#![allow(clippy::needless_return)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod io;
pub mod labels;
pub mod ml;

// Re-export commonly used types
pub use config::MetricsConfig;
pub use dataset::{RelationDataset, RelationRecord};
pub use error::{Error, Result};
pub use labels::{LabelCatalogue, LabelDictionary};
pub use ml::metrics::{
    ComputeMetrics, EvalPrediction, Evaluator, MetricReport, ZeroPositivePolicy,
};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
