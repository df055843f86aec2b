// ── Point: one measurement on its way to a sink ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use unipoll_api::models::Flex;

/// A scalar field value. Sinks decide how each variant is serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    F64(f64),
    I64(i64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Numeric view for sinks that only speak floats (Prometheus).
    /// Text has no numeric form.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            Self::I64(v) => Some(*v as f64),
            Self::Bool(v) => Some(f64::from(u8::from(*v))),
            Self::Text(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::F64(v) => *v == 0.0,
            Self::I64(v) => *v == 0,
            Self::Bool(v) => !v,
            Self::Text(t) => t.is_empty(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Flex> for FieldValue {
    fn from(v: Flex) -> Self {
        Self::F64(v.val)
    }
}

/// One measurement: a table name, identity tags, scalar fields, and an
/// optional timestamp override (the report's snapshot time otherwise).
#[derive(Debug, Clone, Default)]
pub struct Point {
    pub table: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub ts: Option<DateTime<Utc>>,
}

impl Point {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            ..Self::default()
        }
    }

    /// Empty tag values break sink label cardinality; strip them before
    /// the point enters the channel.
    pub fn clean_tags(&mut self) {
        self.tags.retain(|_, v| !v.is_empty());
    }
}

/// Build a tag map from `(key, value)` pairs.
pub fn tags<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}

/// Build a field map from `(key, value)` pairs.
pub fn fields<const N: usize>(pairs: [(&str, FieldValue); N]) -> BTreeMap<String, FieldValue> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}

/// Merge several field maps; later maps win on key collisions.
pub fn combine(
    maps: impl IntoIterator<Item = BTreeMap<String, FieldValue>>,
) -> BTreeMap<String, FieldValue> {
    let mut out = BTreeMap::new();
    for map in maps {
        out.extend(map);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_tags_strips_empty_values() {
        let mut p = Point::new("usw");
        p.tags = tags([
            ("mac", "aa:bb".to_owned()),
            ("name", String::new()),
        ]);
        p.clean_tags();

        assert_eq!(p.tags.len(), 1);
        assert!(p.tags.contains_key("mac"));
    }

    #[test]
    fn field_value_zero_detection() {
        assert!(FieldValue::F64(0.0).is_zero());
        assert!(FieldValue::Bool(false).is_zero());
        assert!(!FieldValue::I64(3).is_zero());
        assert_eq!(FieldValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(FieldValue::Text("x".into()).as_f64(), None);
    }
}
