//! Relation-extraction dataset records
//!
//! Tokenization and the framework-side dataset wrapper live outside this
//! crate; this module only carries the raw rows and encodes their labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::labels::LabelDictionary;

/// One row of the relation-extraction CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub id: String,
    pub sentence: String,
    pub subject_entity: String,
    pub object_entity: String,
    pub label: String,
    #[serde(default)]
    pub source: String,
}

/// Rows of a relation-extraction CSV file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationDataset {
    records: Vec<RelationRecord>,
}

impl RelationDataset {
    pub fn new(records: Vec<RelationRecord>) -> Self {
        RelationDataset { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RelationRecord] {
        &self.records
    }

    /// Label column as string slices
    pub fn labels(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.label.as_str()).collect()
    }

    /// Encode the label column as ids, failing on labels the dictionary lacks
    pub fn label_ids(&self, dictionary: &LabelDictionary) -> Result<Vec<usize>> {
        dictionary.label_to_num(&self.labels())
    }

    /// Number of rows per label
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.label.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl FromIterator<RelationRecord> for RelationDataset {
    fn from_iter<I: IntoIterator<Item = RelationRecord>>(iter: I) -> Self {
        RelationDataset::new(iter.into_iter().collect())
    }
}
