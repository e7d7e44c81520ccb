use indexmap::IndexMap;

use crate::engine::Value;

/// One result row: an insertion-ordered column → value map. Column order is
/// part of the output contract, so the map preserves it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(pub IndexMap<String, Value>);

impl Row {
    pub fn new() -> Row {
        Row(IndexMap::new())
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Row {
        Row(pairs.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Cloned lookup; a missing column reads as `Null` (rows produced by the
    /// evaluators always carry the full column set, so this only matters for
    /// hand-built rows in tests).
    pub fn value(&self, key: &str) -> Value {
        self.0.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (k, v) in &self.0 {
            map.insert(k.clone(), v.to_json());
        }
        serde_json::Value::Object(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Row(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rows_preserve_column_insertion_order() {
        let mut r = Row::new();
        r.insert("zeta", Value::int(1));
        r.insert("alpha", Value::int(2));
        r.insert("mid", Value::int(3));
        let cols: Vec<&str> = r.columns().collect();
        assert_eq!(cols, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_column_reads_as_null() {
        let r = Row::from_pairs([("a".to_string(), Value::int(1))]);
        assert_eq!(r.value("a"), Value::int(1));
        assert_eq!(r.value("b"), Value::Null);
        assert!(r.get("b").is_none());
    }

    #[test]
    fn to_json_keeps_order_and_types() {
        let r = Row::from_pairs([
            ("country".to_string(), Value::str("DE")),
            ("revenue".to_string(), Value::float(12.5)),
            ("orders".to_string(), Value::int(3)),
        ]);
        assert_eq!(
            r.to_json(),
            json!({ "country": "DE", "revenue": 12.5, "orders": 3 })
        );
    }
}
