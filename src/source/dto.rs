use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::GradeCategory;

/// A JSON file holds either a bare array of records or an API-style
/// envelope with the array under `data` (or `results`).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordList {
    Bare(Vec<Record>),
    Wrapped {
        #[serde(alias = "results")]
        data: Vec<Record>,
    },
}

impl RecordList {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            RecordList::Bare(records) => records,
            RecordList::Wrapped { data } => data,
        }
    }
}

/// One loosely-typed record as it comes off the wire.
///
/// The same concept can appear under a UI-facing key (`courseId`) and a
/// storage-facing key (`course_id_c`); lookups take every accepted key and
/// use the first one that carries a value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub fields: Map<String, Value>,
}

impl Record {
    /// First present value that is neither null nor an empty string.
    pub fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            })
    }

    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Numbers, or numeric strings such as `"35"` straight from a form field.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys)
            .and_then(value_as_number)
            .filter(|n| n.is_finite())
    }

    /// Whole number, truncating any fraction.
    pub fn integer(&self, keys: &[&str]) -> Option<i64> {
        self.number(keys).map(|n| n.trunc() as i64)
    }

    /// Foreign key given either as a plain id or as an embedded `{ "Id": .. }` object.
    pub fn reference(&self, keys: &[&str]) -> Option<i64> {
        match self.get(keys)? {
            Value::Object(obj) => ["Id", "id"]
                .iter()
                .filter_map(|k| obj.get(*k))
                .find_map(value_as_number)
                .map(|n| n.trunc() as i64),
            other => value_as_number(other).map(|n| n.trunc() as i64),
        }
    }

    /// Grade categories stored as a JSON array or as a JSON-encoded string.
    /// Anything unreadable yields no categories.
    pub fn categories(&self, keys: &[&str]) -> Vec<GradeCategory> {
        let items: Vec<Record> = match self.get(keys) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .map(|fields| Record { fields })
                .collect(),
            Some(Value::String(encoded)) => serde_json::from_str::<Vec<Record>>(encoded)
                .unwrap_or_else(|e| {
                    tracing::warn!("Unreadable grade categories {:?}: {}", encoded, e);
                    Vec::new()
                }),
            _ => Vec::new(),
        };

        items
            .iter()
            .map(|item| GradeCategory {
                name: item.text(&["name", "Name"]).unwrap_or_default(),
                weight: item.number(&["weight", "Weight"]).unwrap_or(0.0),
            })
            .collect()
    }
}

fn value_as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
