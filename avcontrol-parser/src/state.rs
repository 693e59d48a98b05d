//! Flat state mapping produced by a decoded event

use std::collections::hash_map;
use std::collections::HashMap;

use serde::Serialize;

/// Name of the AVTransport state variable carrying the transport state
pub const TRANSPORT_STATE: &str = "TransportState";

/// Value of one state variable in a decoded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    /// Plain `val` attribute, e.g. `PLAYING` or `0:03:58`
    Scalar(String),
    /// Fields of an embedded DIDL-Lite item keyed by qualified tag name
    Metadata(HashMap<String, String>),
}

impl StateValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            StateValue::Scalar(value) => Some(value),
            StateValue::Metadata(_) => None,
        }
    }

    pub fn as_metadata(&self) -> Option<&HashMap<String, String>> {
        match self {
            StateValue::Metadata(fields) => Some(fields),
            StateValue::Scalar(_) => None,
        }
    }
}

/// State variables reported for one `InstanceID` of a service
///
/// Built once per decoded event and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceState {
    values: HashMap<String, StateValue>,
}

impl InstanceState {
    pub(crate) fn insert(&mut self, key: String, value: StateValue) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.values.get(key)
    }

    /// Scalar value of `key`, `None` if absent or metadata-valued
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(StateValue::as_scalar)
    }

    /// Metadata mapping of `key`, `None` if absent or scalar-valued
    pub fn metadata(&self, key: &str) -> Option<&HashMap<String, String>> {
        self.get(key).and_then(StateValue::as_metadata)
    }

    pub fn transport_state(&self) -> Option<&str> {
        self.scalar(TRANSPORT_STATE)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, StateValue> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a InstanceState {
    type Item = (&'a String, &'a StateValue);
    type IntoIter = hash_map::Iter<'a, String, StateValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl FromIterator<(String, StateValue)> for InstanceState {
    fn from_iter<I: IntoIterator<Item = (String, StateValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
