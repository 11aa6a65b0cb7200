//! variable representation
//!
//! Resolved variables are a flat mapping from a (case-sensitive) name to a structured value:
//! - boolean (true/false)
//! - number (integer or decimal)
//! - string (utf-8)
//! - array ("list" of values)
//! - object (order-preserving "map"/"dictionary", where the key is of type string)
//! - null (only reachable through structured input)
//!
//! Values are plain [serde_json::Value]s. Key-value and environment input only ever produce strings.
//! Templates see the whole mapping as one json object, see [Variables::to_json].
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt::Formatter;

/// Name to value mapping produced by resolving a provider chain
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Variables(IndexMap<String, JsonValue>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    /// Writes every entry of `other` into `self`, replacing existing values
    pub fn overwrite_with(&mut self, other: Variables) {
        for (name, value) in other.0 {
            if let Some(previous) = self.0.insert(name, value) {
                tracing::trace!(?previous, "variable overridden");
            }
        }
    }

    /// Entries ordered lexicographically by name
    pub fn sorted(&self) -> Vec<(&String, &JsonValue)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// The mapping as a json object, the data a template is executed against
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Copy with keys ordered lexicographically
    pub fn to_sorted(&self) -> Variables {
        let mut map = self.0.clone();
        map.sort_keys();
        Variables(map)
    }
}

impl std::fmt::Display for Variables {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(&self.to_sorted()) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for Variables {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Variables(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, JsonValue>> for Variables {
    fn from(value: serde_json::Map<String, JsonValue>) -> Self {
        value.into_iter().collect()
    }
}

impl IntoIterator for Variables {
    type Item = (String, JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Name of a value's type, used where values themselves should not be shown
pub fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(num) if num.is_f64() => "decimal",
        JsonValue::Number(_) => "integer",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
