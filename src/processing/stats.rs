// Statistical operations over coerced count columns
// Author: Gabriel Demetrios Lafis

use indexmap::IndexMap;

use crate::data::{Coercer, Table, UnknownPolicy};
use super::{Aggregate, ProcessingError};

/// Key of the sum entry in most statistics mappings
pub const SUM_KEY: &str = "sum";

/// Key of the sum entry in per-group statistics mappings
pub const TOTAL_KEY: &str = "total";

/// Descriptive statistics of one integer column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub sum: i64,
    pub count: usize,
}

impl ColumnStats {
    /// Statistics of a sequence of counts; all zero when it is empty
    pub fn from_values<I: IntoIterator<Item = i64>>(values: I) -> Self {
        let mut stats = ColumnStats {
            min: i64::MAX,
            max: i64::MIN,
            mean: 0.0,
            sum: 0,
            count: 0,
        };

        for value in values {
            stats.min = stats.min.min(value);
            stats.max = stats.max.max(value);
            stats.sum = stats.sum.saturating_add(value);
            stats.count += 1;
        }

        if stats.count == 0 {
            stats.min = 0;
            stats.max = 0;
        } else {
            stats.mean = stats.sum as f64 / stats.count as f64;
        }
        stats
    }

    /// `{min, max, mean, <sum_key>}`, without the sum when `sum_key` is `None`
    pub fn to_aggregate(&self, sum_key: Option<&str>) -> Aggregate {
        let mut map = IndexMap::new();
        map.insert("min".to_string(), Aggregate::Int(self.min));
        map.insert("max".to_string(), Aggregate::Int(self.max));
        map.insert("mean".to_string(), Aggregate::Float(self.mean));
        if let Some(key) = sum_key {
            map.insert(key.to_string(), Aggregate::Int(self.sum));
        }
        Aggregate::Map(map)
    }
}

/// Statistics of a column.
///
/// Cells that are not integers yet go through the zero policy, so the result
/// depends only on the table.
pub fn column_statistics(table: &Table, column: &str, coercer: &Coercer) -> Result<ColumnStats, ProcessingError> {
    let index = table.column_index(column)?;
    Ok(ColumnStats::from_values(
        table
            .data
            .iter()
            .map(|row| coercer.to_int(&row.values[index], UnknownPolicy::ZeroOnUnknown)),
    ))
}

/// `{column: {min, max, mean, <sum_key>}}` after coercing `columns` per `policy`
pub fn statistics_by_columns<S: AsRef<str>>(
    table: &Table,
    columns: &[S],
    coercer: &Coercer,
    policy: UnknownPolicy,
    sum_key: Option<&str>,
) -> Result<Aggregate, ProcessingError> {
    let coerced = table.coerce_columns(columns, coercer, policy)?;

    columns
        .iter()
        .map(|column| {
            let stats = column_statistics(&coerced, column.as_ref(), coercer)?;
            Ok((column.as_ref().to_string(), stats.to_aggregate(sum_key)))
        })
        .collect()
}

/// `{group: {column: {min, max, mean, total}}}` for each label of `group_column`
pub fn column_stats_by_group<S: AsRef<str>>(
    table: &Table,
    group_column: &str,
    stat_columns: &[S],
    coercer: &Coercer,
    policy: UnknownPolicy,
) -> Result<Aggregate, ProcessingError> {
    let coerced = table.coerce_columns(stat_columns, coercer, policy)?;
    let indices = coerced.column_indices(stat_columns)?;
    let groups = coerced.group_by(&[group_column])?;

    let mut result = Aggregate::map();
    for (key, rows) in groups.iter() {
        for (column, &index) in stat_columns.iter().zip(&indices) {
            let stats = ColumnStats::from_values(
                rows.iter()
                    .map(|&r| coercer.to_int(&coerced.data[r].values[index], UnknownPolicy::ZeroOnUnknown)),
            );
            result.insert_path(&[key[0].as_str(), column.as_ref()], stats.to_aggregate(Some(TOTAL_KEY)));
        }
    }
    Ok(result)
}

/// `{group: value}` over the first `n` rows after sorting by `sort_columns`.
///
/// A group label seen again further down keeps its first position but takes
/// the value of its lowest-ranked row.
pub fn top_n_by_group(
    table: &Table,
    sort_columns: &[&str],
    group_column: &str,
    value_column: &str,
    n: usize,
    descending: bool,
) -> Result<Aggregate, ProcessingError> {
    let group_index = table.column_index(group_column)?;
    let value_index = table.column_index(value_column)?;
    let keys: Vec<(&str, bool)> = sort_columns.iter().map(|c| (*c, !descending)).collect();
    let top = table.sort_by_columns(&keys)?.head(n);

    let mut result: IndexMap<String, Aggregate> = IndexMap::new();
    for row in &top.data {
        result.insert(
            row.values[group_index].to_label(),
            Aggregate::from_value(&row.values[value_index]),
        );
    }
    Ok(Aggregate::Map(result))
}
