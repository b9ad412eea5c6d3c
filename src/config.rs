//! Metrics configuration
//!
//! A configuration file names the label catalogue (inline or through a label
//! dictionary file) and the AUPRC zero-positive policy. TOML, YAML and JSON
//! are accepted, chosen by file extension.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::io::json::read_label_dictionary;
use crate::labels::LabelCatalogue;
use crate::ml::metrics::{Evaluator, ZeroPositivePolicy};

/// Label catalogue section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// Ordered label names, position is the id
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Path to a JSON label dictionary, used instead of `labels`
    #[serde(default)]
    pub dictionary: Option<PathBuf>,
    /// The "no relation" label
    pub default_label: String,
}

/// Metric options section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricOptions {
    #[serde(default)]
    pub zero_positive_policy: ZeroPositivePolicy,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub metrics: MetricOptions,
    /// Directory relative dictionary paths resolve against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl MetricsConfig {
    /// Load a configuration file, picking the format from the extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        log::debug!("loading metrics config from {}", path.display());

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let mut config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(Error::Format(format!(
                    "未対応の設定ファイル形式です: {:?}",
                    other
                )))
            }
        };
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the label catalogue from the inline list or the dictionary file
    pub fn label_catalogue(&self) -> Result<LabelCatalogue> {
        let section = &self.catalogue;
        match (&section.labels, &section.dictionary) {
            (Some(labels), None) => LabelCatalogue::new(labels.clone(), &section.default_label),
            (None, Some(path)) => {
                let path = match &self.base_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path.clone(),
                };
                let dictionary = read_label_dictionary(&path)?;
                LabelCatalogue::from_dictionary(&dictionary, &section.default_label)
            }
            (Some(_), Some(_)) => Err(Error::InvalidInput(
                "catalogue.labels と catalogue.dictionary は同時に指定できません".to_string(),
            )),
            (None, None) => Err(Error::InvalidInput(
                "catalogue.labels または catalogue.dictionary が必要です".to_string(),
            )),
        }
    }

    /// Evaluator configured with this catalogue and policy
    pub fn evaluator(&self) -> Result<Evaluator> {
        Ok(Evaluator::new(self.label_catalogue()?).with_policy(self.metrics.zero_positive_policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_inline_labels() {
        let config = MetricsConfig::from_toml_str(
            r#"
            [catalogue]
            labels = ["no_relation", "per:title", "org:members"]
            default_label = "no_relation"

            [metrics]
            zero_positive_policy = "skip"
            "#,
        )
        .unwrap();

        let evaluator = config.evaluator().unwrap();
        assert_eq!(evaluator.catalogue().len(), 3);
        assert_eq!(evaluator.policy(), ZeroPositivePolicy::Skip);
    }

    #[test]
    fn test_yaml_default_policy() {
        let config = MetricsConfig::from_yaml_str(
            "catalogue:\n  labels: [\"per:title\", no_relation]\n  default_label: no_relation\n",
        )
        .unwrap();

        assert_eq!(config.metrics.zero_positive_policy, ZeroPositivePolicy::Zero);
        assert_eq!(config.label_catalogue().unwrap().default_index(), 1);
    }

    #[test]
    fn test_json_config() {
        let config = MetricsConfig::from_json_str(
            r#"{"catalogue": {"labels": ["no_relation", "per:title"], "default_label": "no_relation"}}"#,
        )
        .unwrap();
        assert_eq!(config.label_catalogue().unwrap().len(), 2);
    }

    #[test]
    fn test_catalogue_source_required() {
        let config = MetricsConfig::from_toml_str(
            r#"
            [catalogue]
            default_label = "no_relation"
            "#,
        )
        .unwrap();
        assert!(matches!(
            config.label_catalogue(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result = MetricsConfig::from_toml_str(
            r#"
            [catalogue]
            labels = ["no_relation"]
            default_label = "no_relation"

            [metrics]
            zero_positive_policy = "half"
            "#,
        );
        assert!(matches!(result, Err(Error::Toml(_))));
    }
}
