use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Request parameters.
///
/// Sent as the query string for `GET` and as a JSON object body for every
/// other verb. Values are arbitrary JSON; nested arrays and objects are
/// flattened with bracket keys when they end up in a query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Like [`Params::set`], but leaves the key out entirely for `None`.
    pub fn set_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds every entry of `other`, overwriting existing keys.
    pub fn merge(mut self, other: Params) -> Self {
        self.0.extend(other.0);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Flattens the params into `key=value` pairs for a query string.
    ///
    /// `null` values are dropped, booleans become `1`/`0`, arrays become
    /// `key[0]`, `key[1]`, ... and objects become `key[field]`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            flatten_into(key, value, &mut pairs);
        }
        pairs
    }
}

fn flatten_into(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key.to_string(), if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => out.push((key.to_string(), n.to_string())),
        Value::String(s) => out.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_into(&format!("{key}[{i}]"), item, out);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                flatten_into(&format!("{key}[{field}]"), item, out);
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params(map.into_iter().collect())
    }
}
