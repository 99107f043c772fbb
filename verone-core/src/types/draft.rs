//! 编辑草稿

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field map of a record as returned by the backing store.
pub type Record = Map<String, Value>;

/// In-progress, unsaved copy of a section's fields.
///
/// Cloning a draft copies every value, so a draft handed out by a getter can be
/// mutated freely without touching the coordinator's copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft(Map<String, Value>);

impl Draft {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String value of a field, `None` for missing or non-string values.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    #[must_use]
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Shallow merge: top-level keys of `partial` overwrite existing ones.
    pub fn merge(&mut self, partial: Self) {
        for (field, value) in partial.0 {
            self.0.insert(field, value);
        }
    }

    /// Replace every empty-string value with `null`.
    ///
    /// Nullable text columns must not end up holding `''` from a cleared input.
    pub fn normalize_empty_strings(&mut self) {
        for value in self.0.values_mut() {
            if value.as_str().is_some_and(str::is_empty) {
                *value = Value::Null;
            }
        }
    }

    /// Drop the given fields, returning how many were present.
    pub fn strip_fields(&mut self, fields: &[&str]) -> usize {
        fields
            .iter()
            .filter(|field| self.0.remove(**field).is_some())
            .count()
    }
}

impl From<Map<String, Value>> for Draft {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Draft> for Map<String, Value> {
    fn from(draft: Draft) -> Self {
        draft.0
    }
}

impl FromIterator<(String, Value)> for Draft {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Build a [`Draft`] from a JSON object literal.
///
/// Non-object values produce an empty draft.
impl From<Value> for Draft {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}
