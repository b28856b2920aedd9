//! Parameter sets resolved for a visitor

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A single parameter value
pub type ParamValue = serde_json::Value;

/// Mapping from parameter key to value for one variation
///
/// Keys are unique. The map is ordered only so that serialized output is
/// stable; callers must not rely on key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, ParamValue>);

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing any previous value for the key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a parameter, returning the previous value if any
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Get the raw value for a key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Get a value converted into `T`
    ///
    /// Returns `Ok(None)` when the key is missing and an error when the value
    /// does not deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DomainError> {
        match self.0.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Get a string parameter
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(ParamValue::as_str)
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

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, ParamValue>> for ParameterSet {
    fn from(map: BTreeMap<String, ParamValue>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
