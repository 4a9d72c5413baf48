// Aggregate operations over grouped rows
// Author: Gabriel Demetrios Lafis

use indexmap::{IndexMap, IndexSet};

use crate::data::{Table, Value};
use super::{Aggregate, ProcessingError};

/// Rows of a table partitioned by the labels of some key columns.
///
/// Groups keep the order in which their key was first encountered.
pub struct GroupBy<'a> {
    table: &'a Table,
    groups: IndexMap<Vec<String>, Vec<usize>>,
}

impl Table {
    /// Group rows by the labels of `columns`
    pub fn group_by<S: AsRef<str>>(&self, columns: &[S]) -> Result<GroupBy<'_>, ProcessingError> {
        let indices = self.column_indices(columns)?;

        let mut groups: IndexMap<Vec<String>, Vec<usize>> = IndexMap::new();
        for (row_index, row) in self.data.iter().enumerate() {
            let key = indices.iter().map(|&i| row.values[i].to_label()).collect();
            groups.entry(key).or_default().push(row_index);
        }

        Ok(GroupBy { table: self, groups })
    }
}

impl<'a> GroupBy<'a> {
    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keys with the indices of their rows
    pub fn iter(&self) -> impl Iterator<Item = (&[String], &[usize])> {
        self.groups.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Row count per key
    pub fn count(&self) -> IndexMap<Vec<String>, i64> {
        self.groups
            .iter()
            .map(|(key, rows)| (key.clone(), rows.len() as i64))
            .collect()
    }

    /// Distinct values of `column` per key, in first-seen order
    pub fn unique_values(&self, column: &str) -> Result<IndexMap<Vec<String>, Vec<&'a Value>>, ProcessingError> {
        let index = self.table.column_index(column)?;
        let table = self.table;

        Ok(self
            .groups
            .iter()
            .map(|(key, rows)| {
                let mut seen = IndexSet::new();
                let values = rows
                    .iter()
                    .map(|&r| &table.data[r].values[index])
                    .filter(|v| seen.insert(v.to_label()))
                    .collect();
                (key.clone(), values)
            })
            .collect())
    }

    /// Occurrences of each label of `column` per key.
    ///
    /// When `sorted`, labels within a key are ordered by descending count with
    /// ties in first-seen order.
    pub fn value_counts(
        &self,
        column: &str,
        sorted: bool,
    ) -> Result<IndexMap<Vec<String>, IndexMap<String, i64>>, ProcessingError> {
        let index = self.table.column_index(column)?;
        let table = self.table;

        Ok(self
            .groups
            .iter()
            .map(|(key, rows)| {
                let mut counts: IndexMap<String, i64> = IndexMap::new();
                for &r in rows {
                    *counts.entry(table.data[r].values[index].to_label()).or_insert(0) += 1;
                }
                if sorted {
                    sort_desc(&mut counts);
                }
                (key.clone(), counts)
            })
            .collect())
    }
}

fn sort_desc<K>(counts: &mut IndexMap<K, i64>) {
    // stable, so equal counts keep first-seen order
    counts.sort_by(|_, a, _, b| b.cmp(a));
}

/// Nested counts of rows per distinct combination of `group_columns`
pub fn grouped_count<S: AsRef<str>>(
    table: &Table,
    group_columns: &[S],
    count_column: &str,
    sorted: bool,
) -> Result<Aggregate, ProcessingError> {
    table.column_index(count_column)?;
    let mut counts = table.group_by(group_columns)?.count();
    if sorted {
        sort_desc(&mut counts);
    }

    let mut result = Aggregate::map();
    for (key, count) in counts {
        result.insert_path(&key, Aggregate::Int(count));
    }
    Ok(result)
}

/// Occurrences of each label of `column`
pub fn value_counts(table: &Table, column: &str, sorted: bool) -> Result<Aggregate, ProcessingError> {
    let no_keys: [&str; 0] = [];
    let counts = table.group_by(&no_keys)?.value_counts(column, sorted)?;

    Ok(counts
        .into_values()
        .flatten()
        .map(|(label, n)| (label, Aggregate::Int(n)))
        .collect())
}

/// Nested `{group...: {label: n}}` occurrences of `value_column`
pub fn grouped_value_counts<S: AsRef<str>>(
    table: &Table,
    group_columns: &[S],
    value_column: &str,
    sorted: bool,
) -> Result<Aggregate, ProcessingError> {
    let counts = table.group_by(group_columns)?.value_counts(value_column, sorted)?;

    let mut result = Aggregate::map();
    for (mut key, labels) in counts {
        for (label, n) in labels {
            key.push(label);
            result.insert_path(&key, Aggregate::Int(n));
            key.pop();
        }
    }
    Ok(result)
}

/// Reshape distinct rows into `{key...: {value_column: value}}`.
///
/// Rows are deduplicated over key and value columns together; a later
/// distinct row with the same key replaces the earlier leaf in place.
pub fn grouped_unique_extract<K: AsRef<str>, V: AsRef<str>>(
    table: &Table,
    key_columns: &[K],
    value_columns: &[V],
) -> Result<Aggregate, ProcessingError> {
    let key_indices = table.column_indices(key_columns)?;
    let value_indices = table.column_indices(value_columns)?;

    let mut all: Vec<&str> = key_columns.iter().map(AsRef::as_ref).collect();
    all.extend(value_columns.iter().map(AsRef::as_ref));
    let groups = table.group_by(&all)?;

    let mut result = Aggregate::map();
    for (_, rows) in groups.iter() {
        let row = &table.data[rows[0]];
        let key: Vec<String> = key_indices.iter().map(|&i| row.values[i].to_label()).collect();
        let leaf = value_columns
            .iter()
            .zip(&value_indices)
            .map(|(name, &i)| (name.as_ref().to_string(), Aggregate::from_value(&row.values[i])))
            .collect();
        result.insert_path(&key, leaf);
    }
    Ok(result)
}

/// Distinct rows over `columns`, in first-seen order
pub fn distinct_records<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Vec<Vec<Value>>, ProcessingError> {
    let indices = table.column_indices(columns)?;
    let groups = table.group_by(columns)?;

    Ok(groups
        .iter()
        .map(|(_, rows)| {
            let row = &table.data[rows[0]];
            indices.iter().map(|&i| row.values[i].clone()).collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deaths() -> Table {
        Table::from_payload(&json!({"result": {"records": [
            {"gender": "זכר", "age_group": "80+", "Ventilated": "1"},
            {"gender": "נקבה", "age_group": "80+", "Ventilated": "0"},
            {"gender": "זכר", "age_group": "60-69", "Ventilated": "0"},
            {"gender": "זכר", "age_group": "80+", "Ventilated": "0"},
            {"gender": null, "age_group": "80+", "Ventilated": "0"}
        ]}}))
        .unwrap()
    }

    fn leaf_sum(agg: &Aggregate) -> i64 {
        match agg {
            Aggregate::Map(map) => map.values().map(leaf_sum).sum(),
            other => other.as_i64().unwrap_or(0),
        }
    }

    #[test]
    fn test_group_by_first_seen_order() {
        let table = deaths();
        let groups = table.group_by(&["gender"]).unwrap();
        let keys: Vec<_> = groups.iter().map(|(k, _)| k[0].clone()).collect();
        assert_eq!(keys, vec!["זכר", "נקבה", "NULL"]);
        assert_eq!(groups.count()[&vec!["זכר".to_string()]], 3);
    }

    #[test]
    fn test_grouped_count_conserves_rows() {
        let table = deaths();
        let result = grouped_count(&table, &["gender", "age_group", "Ventilated"], "age_group", false).unwrap();
        assert_eq!(leaf_sum(&result), table.len() as i64);
        assert_eq!(result.get_path(&["זכר", "80+", "0"]), Some(&Aggregate::Int(1)));
        assert_eq!(result.get_path(&["NULL", "80+", "0"]), Some(&Aggregate::Int(1)));
    }

    #[test]
    fn test_value_counts_sorted_ties_first_seen() {
        let table = deaths();
        let result = value_counts(&table, "age_group", true).unwrap();
        let keys: Vec<_> = result.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["80+", "60-69"]);

        let result = value_counts(&table, "gender", true).unwrap();
        let keys: Vec<_> = result.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["זכר", "נקבה", "NULL"]);
    }

    #[test]
    fn test_grouped_value_counts() {
        let result = grouped_value_counts(&deaths(), &["age_group"], "Ventilated", true).unwrap();
        assert_eq!(result.get_path(&["80+", "0"]), Some(&Aggregate::Int(3)));
        assert_eq!(result.get_path(&["80+", "1"]), Some(&Aggregate::Int(1)));
        let order: Vec<_> = result.get("80+").unwrap().as_map().unwrap().keys().cloned().collect();
        assert_eq!(order, vec!["0", "1"]);
    }

    #[test]
    fn test_unique_values() {
        let table = deaths();
        let groups = table.group_by(&["age_group"]).unwrap();
        let unique = groups.unique_values("gender").unwrap();
        assert_eq!(unique[&vec!["80+".to_string()]].len(), 3);
        assert!(groups.unique_values("missing").is_err());
    }

    #[test]
    fn test_grouped_unique_extract() {
        let table = Table::from_payload(&json!({"result": {"records": [
            {"Date": "2020-03-01", "nurses": "3", "physicians": "1"},
            {"Date": "2020-03-02", "nurses": "<15", "physicians": "2"},
            {"Date": "2020-03-01", "nurses": "3", "physicians": "1"}
        ]}}))
        .unwrap();

        let result = grouped_unique_extract(&table, &["Date"], &["nurses", "physicians"]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get_path(&["2020-03-02", "nurses"]), Some(&Aggregate::from("<15")));
        assert_eq!(result.get_path(&["2020-03-01", "physicians"]), Some(&Aggregate::from("1")));
    }

    #[test]
    fn test_distinct_records() {
        let records = distinct_records(&deaths(), &["age_group", "Ventilated"]).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec![Value::from("80+"), Value::from("1")]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::from_payload(&json!({"result": {"records": []}})).unwrap();
        assert!(matches!(
            value_counts(&table, "gender", false),
            Err(ProcessingError::ColumnNotFound { .. })
        ));
    }
}
