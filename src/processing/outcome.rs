// Aggregation results and the empty-result sentinel
// Author: Gabriel Demetrios Lafis

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::data::Value;

/// Literal returned in place of an empty or failed aggregation
pub const NO_DATA: &str = "No Data";

/// A nested, insertion-ordered aggregation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Aggregate {
    Int(i64),
    Float(f64),
    Text(String),
    Map(IndexMap<String, Aggregate>),
}

impl Aggregate {
    /// An empty mapping
    pub fn map() -> Self {
        Aggregate::Map(IndexMap::new())
    }

    /// Leaf for a raw cell value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Integer(i) => Aggregate::Int(*i),
            Value::Float(f) => Aggregate::Float(*f),
            Value::String(s) => Aggregate::Text(s.clone()),
            other => Aggregate::Text(other.to_label()),
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Aggregate>> {
        match self {
            Aggregate::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Aggregate::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Aggregate::Int(i) => Some(*i as f64),
            Aggregate::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Aggregate::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Child of a mapping by key
    pub fn get(&self, key: &str) -> Option<&Aggregate> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Descendant by key path
    pub fn get_path(&self, path: &[&str]) -> Option<&Aggregate> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Number of entries of a mapping, 0 for leaves
    pub fn len(&self) -> usize {
        self.as_map().map_or(0, IndexMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable slot at `path`, creating intermediate mappings.
    ///
    /// A leaf found where a mapping is needed is replaced by an empty mapping.
    fn slot<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Aggregate {
        let mut node = self;
        for key in path {
            if !matches!(node, Aggregate::Map(_)) {
                *node = Aggregate::map();
            }
            node = match node {
                Aggregate::Map(map) => map
                    .entry(key.as_ref().to_string())
                    .or_insert_with(Aggregate::map),
                other => other,
            };
        }
        node
    }

    /// Set the leaf at `path`, keeping the position of an existing key
    pub fn insert_path<S: AsRef<str>>(&mut self, path: &[S], leaf: Aggregate) {
        *self.slot(path) = leaf;
    }

    /// Add `amount` to the integer leaf at `path`, starting from 0 and
    /// saturating at the `i64` bounds
    pub fn add_at_path<S: AsRef<str>>(&mut self, path: &[S], amount: i64) {
        let slot = self.slot(path);
        let current = match slot {
            Aggregate::Int(i) => *i,
            _ => 0,
        };
        *slot = Aggregate::Int(current.saturating_add(amount));
    }
}

impl From<i64> for Aggregate {
    fn from(i: i64) -> Self {
        Aggregate::Int(i)
    }
}

impl From<f64> for Aggregate {
    fn from(f: f64) -> Self {
        Aggregate::Float(f)
    }
}

impl From<String> for Aggregate {
    fn from(s: String) -> Self {
        Aggregate::Text(s)
    }
}

impl From<&str> for Aggregate {
    fn from(s: &str) -> Self {
        Aggregate::Text(s.to_string())
    }
}

impl From<IndexMap<String, Aggregate>> for Aggregate {
    fn from(map: IndexMap<String, Aggregate>) -> Self {
        Aggregate::Map(map)
    }
}

impl FromIterator<(String, Aggregate)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (String, Aggregate)>>(iter: I) -> Self {
        Aggregate::Map(iter.into_iter().collect())
    }
}

/// Result of a dataset query
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Data(Aggregate),
    NoData,
}

impl Outcome {
    /// Wrap an aggregate; an empty mapping becomes [`Outcome::NoData`]
    pub fn from_aggregate(aggregate: Aggregate) -> Self {
        match aggregate {
            Aggregate::Map(ref map) if map.is_empty() => Outcome::NoData,
            other => Outcome::Data(other),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Outcome::NoData)
    }

    pub fn data(&self) -> Option<&Aggregate> {
        match self {
            Outcome::Data(aggregate) => Some(aggregate),
            Outcome::NoData => None,
        }
    }

    /// Sequence-of-pairs form.
    ///
    /// The sentinel becomes `("No Data", "")`; a leaf result is a single pair
    /// with an empty key.
    pub fn to_pairs(&self) -> Vec<(String, Aggregate)> {
        match self {
            Outcome::NoData => vec![(NO_DATA.to_string(), Aggregate::from(""))],
            Outcome::Data(Aggregate::Map(map)) => {
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
            Outcome::Data(leaf) => vec![(String::new(), leaf.clone())],
        }
    }
}

impl From<Aggregate> for Outcome {
    fn from(aggregate: Aggregate) -> Self {
        Outcome::from_aggregate(aggregate)
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Data(aggregate) => aggregate.serialize(serializer),
            Outcome::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_at_path_saturates() {
        let mut agg = Aggregate::map();
        agg.add_at_path(&["80+"], i64::MAX);
        agg.add_at_path(&["80+"], 1);
        assert_eq!(agg.get("80+"), Some(&Aggregate::Int(i64::MAX)));
    }

    #[test]
    fn test_insert_and_add_paths() {
        let mut agg = Aggregate::map();
        agg.insert_path(&["זכר", "0-19"], Aggregate::Int(4));
        agg.add_at_path(&["זכר", "0-19"], 3);
        agg.add_at_path(&["נקבה", "20-29"], 1);

        assert_eq!(agg.get_path(&["זכר", "0-19"]), Some(&Aggregate::Int(7)));
        assert_eq!(agg.get_path(&["נקבה", "20-29"]), Some(&Aggregate::Int(1)));
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut agg = Aggregate::map();
        agg.insert_path(&["a"], 1.into());
        agg.insert_path(&["b"], 2.into());
        agg.insert_path(&["a"], 3.into());

        let keys: Vec<_> = agg.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(agg.get("a"), Some(&Aggregate::Int(3)));
    }

    #[test]
    fn test_empty_map_is_no_data() {
        assert!(Outcome::from_aggregate(Aggregate::map()).is_no_data());
        assert!(!Outcome::from_aggregate(Aggregate::Int(0)).is_no_data());
    }

    #[test]
    fn test_serialization() {
        let outcome = Outcome::from_aggregate(
            vec![("חיובי".to_string(), Aggregate::Int(117))].into_iter().collect(),
        );
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"חיובי":117}"#);
        assert_eq!(serde_json::to_string(&Outcome::NoData).unwrap(), r#""No Data""#);
    }

    #[test]
    fn test_pairs() {
        assert_eq!(
            Outcome::NoData.to_pairs(),
            vec![(NO_DATA.to_string(), Aggregate::from(""))]
        );
    }
}
