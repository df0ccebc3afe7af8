use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A member of the population being paired
///
/// Only the id and the exclusion set matter to the solver. Everything else a
/// caller attaches is carried through `attributes` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "excludedIds", alias = "closeFriends", default)]
    pub excluded_ids: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            excluded_ids: BTreeSet::new(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Builder-style helper to declare ids this item must never be paired with
    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// True if this item declared `other_id` as excluded
    #[inline]
    pub fn excludes(&self, other_id: &str) -> bool {
        self.excluded_ids.contains(other_id)
    }
}

/// A discrete pair chosen by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub first_id: String,
    pub second_id: String,
    /// Matching-matrix value that justified selecting the pair
    pub probability: f64,
    #[serde(skip)]
    pub first_index: usize,
    #[serde(skip)]
    pub second_index: usize,
}

impl Match {
    /// True if either side of the pair is `id`
    pub fn contains(&self, id: &str) -> bool {
        self.first_id == id || self.second_id == id
    }
}
