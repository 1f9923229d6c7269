//! Raw feature values collected from the form

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from feature key to the value entered for it.
///
/// Iteration order is arbitrary; vectors fed to the model are always
/// assembled through [`FeatureSchema::assemble`](crate::FeatureSchema::assemble).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputValues(HashMap<String, f64>);

impl InputValues {
    /// Create an empty set of inputs
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Set the value for a feature key, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a feature key
    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    /// Value for a feature key
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature keys in arbitrary order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for InputValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
