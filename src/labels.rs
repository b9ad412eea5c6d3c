//! Label catalogue and label dictionary
//!
//! The catalogue is the ordered list of relation labels; a label's position is
//! its integer id. The dictionary is the name -> id mapping used to persist the
//! catalogue and to encode dataset labels.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Ordered catalogue of relation labels with one designated default label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelCatalogue {
    labels: Vec<String>,
    default_index: usize,
    index: HashMap<String, usize>,
}

impl LabelCatalogue {
    /// Create a catalogue from an ordered list of label names
    pub fn new<S: Into<String>>(labels: Vec<S>, default_label: &str) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(Error::EmptyData("ラベルカタログが空です".to_string()));
        }

        let mut index = HashMap::with_capacity(labels.len());
        for (id, label) in labels.iter().enumerate() {
            if index.insert(label.clone(), id).is_some() {
                return Err(Error::DuplicateLabel(label.clone()));
            }
        }

        let default_index = *index
            .get(default_label)
            .ok_or_else(|| Error::KeyNotFound(default_label.to_string()))?;

        Ok(LabelCatalogue {
            labels,
            default_index,
            index,
        })
    }

    /// Rebuild the catalogue from a dictionary, ordering labels by id
    pub fn from_dictionary(dictionary: &LabelDictionary, default_label: &str) -> Result<Self> {
        let mut labels = vec![String::new(); dictionary.len()];
        for (label, &id) in dictionary.iter() {
            labels[id] = label.to_string();
        }
        Self::new(labels, default_label)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false, a catalogue holds at least one label
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Id of the "no relation" label
    pub fn default_index(&self) -> usize {
        self.default_index
    }

    pub fn default_label(&self) -> &str {
        &self.labels[self.default_index]
    }

    /// Look up the id of a label name
    pub fn id(&self, label: &str) -> Result<usize> {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::KeyNotFound(label.to_string()))
    }

    /// Look up the name of a label id
    pub fn label(&self, id: usize) -> Result<&str> {
        self.labels
            .get(id)
            .map(String::as_str)
            .ok_or(Error::LabelOutOfRange {
                id,
                num_labels: self.labels.len(),
            })
    }

    /// Ids of every label except the default, in catalogue order
    pub fn non_default_ids(&self) -> Vec<usize> {
        (0..self.labels.len())
            .filter(|&id| id != self.default_index)
            .collect()
    }

    /// Check that every id lies in `[0, len)`
    pub fn validate_ids(&self, ids: &[usize]) -> Result<()> {
        validate_label_ids(ids, self.labels.len())
    }

    /// Dictionary view of the catalogue
    pub fn to_dictionary(&self) -> LabelDictionary {
        LabelDictionary {
            label_to_id: self
                .labels
                .iter()
                .enumerate()
                .map(|(id, label)| (label.clone(), id))
                .collect(),
        }
    }
}

/// Check that every id lies in `[0, num_labels)`
pub fn validate_label_ids(ids: &[usize], num_labels: usize) -> Result<()> {
    match ids.iter().find(|&&id| id >= num_labels) {
        Some(&id) => Err(Error::LabelOutOfRange { id, num_labels }),
        None => Ok(()),
    }
}

/// Label name -> id mapping with dense, unique ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, usize>", into = "BTreeMap<String, usize>")]
pub struct LabelDictionary {
    label_to_id: BTreeMap<String, usize>,
}

impl LabelDictionary {
    /// Create a dictionary, rejecting duplicate or non-contiguous ids
    pub fn new(label_to_id: BTreeMap<String, usize>) -> Result<Self> {
        if label_to_id.is_empty() {
            return Err(Error::EmptyData("ラベル辞書が空です".to_string()));
        }

        let num_labels = label_to_id.len();
        let mut seen = vec![false; num_labels];
        for (label, &id) in &label_to_id {
            if id >= num_labels {
                return Err(Error::InvalidInput(format!(
                    "ラベル '{}' のID {} が連続していません (ラベル数 {})",
                    label, id, num_labels
                )));
            }
            if seen[id] {
                return Err(Error::InvalidInput(format!(
                    "ID {} が複数のラベルに割り当てられています",
                    id
                )));
            }
            seen[id] = true;
        }

        Ok(LabelDictionary { label_to_id })
    }

    pub fn len(&self) -> usize {
        self.label_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_to_id.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.label_to_id.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &usize)> {
        self.label_to_id.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encode label names as ids
    pub fn label_to_num<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                self.get(label)
                    .ok_or_else(|| Error::KeyNotFound(label.to_string()))
            })
            .collect()
    }

    /// Decode ids back to label names
    pub fn num_to_label(&self, ids: &[usize]) -> Result<Vec<String>> {
        let mut id_to_label = vec![""; self.len()];
        for (label, &id) in &self.label_to_id {
            id_to_label[id] = label.as_str();
        }

        ids.iter()
            .map(|&id| {
                id_to_label
                    .get(id)
                    .map(|label| label.to_string())
                    .ok_or(Error::LabelOutOfRange {
                        id,
                        num_labels: self.len(),
                    })
            })
            .collect()
    }
}

impl TryFrom<BTreeMap<String, usize>> for LabelDictionary {
    type Error = Error;

    fn try_from(map: BTreeMap<String, usize>) -> Result<Self> {
        LabelDictionary::new(map)
    }
}

impl From<LabelDictionary> for BTreeMap<String, usize> {
    fn from(dictionary: LabelDictionary) -> Self {
        dictionary.label_to_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> LabelCatalogue {
        LabelCatalogue::new(
            vec!["no_relation", "org:members", "per:title", "per:origin"],
            "no_relation",
        )
        .unwrap()
    }

    #[test]
    fn test_catalogue_lookup() {
        let catalogue = catalogue();
        assert_eq!(catalogue.len(), 4);
        assert_eq!(catalogue.default_index(), 0);
        assert_eq!(catalogue.id("per:title").unwrap(), 2);
        assert_eq!(catalogue.label(3).unwrap(), "per:origin");
        assert_eq!(catalogue.non_default_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_default_label_not_first() {
        let catalogue =
            LabelCatalogue::new(vec!["per:title", "no_relation", "org:members"], "no_relation")
                .unwrap();
        assert_eq!(catalogue.default_index(), 1);
        assert_eq!(catalogue.non_default_ids(), vec![0, 2]);
    }

    #[test]
    fn test_catalogue_rejects_bad_input() {
        let empty: Vec<String> = vec![];
        assert!(matches!(
            LabelCatalogue::new(empty, "no_relation"),
            Err(Error::EmptyData(_))
        ));
        assert!(matches!(
            LabelCatalogue::new(vec!["a", "b", "a"], "a"),
            Err(Error::DuplicateLabel(_))
        ));
        assert!(matches!(
            LabelCatalogue::new(vec!["a", "b"], "no_relation"),
            Err(Error::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_validate_ids() {
        let catalogue = catalogue();
        assert!(catalogue.validate_ids(&[0, 1, 2, 3]).is_ok());
        assert!(matches!(
            catalogue.validate_ids(&[0, 4]),
            Err(Error::LabelOutOfRange {
                id: 4,
                num_labels: 4
            })
        ));
    }

    #[test]
    fn test_dictionary_roundtrip_through_catalogue() {
        let catalogue = catalogue();
        let dictionary = catalogue.to_dictionary();
        let rebuilt = LabelCatalogue::from_dictionary(&dictionary, "no_relation").unwrap();
        assert_eq!(rebuilt, catalogue);
    }

    #[test]
    fn test_dictionary_encode_decode() {
        let dictionary = catalogue().to_dictionary();
        let ids = dictionary
            .label_to_num(&["per:origin", "no_relation", "org:members"])
            .unwrap();
        assert_eq!(ids, vec![3, 0, 1]);
        assert_eq!(
            dictionary.num_to_label(&ids).unwrap(),
            vec!["per:origin", "no_relation", "org:members"]
        );

        assert!(matches!(
            dictionary.label_to_num(&["per:spouse"]),
            Err(Error::KeyNotFound(_))
        ));
        assert!(dictionary.num_to_label(&[7]).is_err());
    }

    #[test]
    fn test_dictionary_rejects_sparse_ids() {
        let mut map = BTreeMap::new();
        map.insert("no_relation".to_string(), 0);
        map.insert("per:title".to_string(), 2);
        assert!(matches!(LabelDictionary::new(map), Err(Error::InvalidInput(_))));

        let mut map = BTreeMap::new();
        map.insert("no_relation".to_string(), 0);
        map.insert("per:title".to_string(), 0);
        assert!(matches!(LabelDictionary::new(map), Err(Error::InvalidInput(_))));
    }
}
