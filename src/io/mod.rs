pub mod csv;
pub mod json;

// Re-export commonly used functions
pub use csv::{read_predictions_csv, read_relation_csv};
pub use json::{read_label_dictionary, write_label_dictionary, write_metric_report};
