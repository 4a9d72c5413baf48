// Transform operations for table derivation
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use crate::data::{Coercer, Row, Schema, Table, UnknownPolicy, Value, ID_COLUMN};
use super::{DataProcessor, ProcessingError, ProcessorType};

impl Table {
    /// Position of a column, or `ColumnNotFound`
    pub fn column_index(&self, name: &str) -> Result<usize, ProcessingError> {
        self.schema
            .index_of(name)
            .ok_or_else(|| ProcessingError::column_not_found(name))
    }

    /// Positions of several columns, failing on the first missing one
    pub fn column_indices<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, ProcessingError> {
        names.iter().map(|n| self.column_index(n.as_ref())).collect()
    }

    /// Deep copy without the `_id` housekeeping column
    pub fn clean_copy(&self) -> Table {
        let keep: Vec<usize> = (0..self.schema.fields.len())
            .filter(|&i| self.schema.fields[i].name != ID_COLUMN)
            .collect();
        self.select_indices(&keep)
    }

    /// Table restricted to the named columns, in the given order
    pub fn project<S: AsRef<str>>(&self, columns: &[S]) -> Result<Table, ProcessingError> {
        let indices = self.column_indices(columns)?;
        Ok(self.select_indices(&indices))
    }

    fn select_indices(&self, indices: &[usize]) -> Table {
        let schema = Schema::new(indices.iter().map(|&i| self.schema.fields[i].clone()).collect());
        let data = self
            .data
            .iter()
            .map(|row| Row::new(indices.iter().map(|&i| row.values[i].clone()).collect()))
            .collect();

        Table {
            schema,
            data,
            total: self.total,
        }
    }

    /// Copy with every cell of `column` replaced by `f(cell)`
    pub fn map_column<F>(&self, column: &str, f: F) -> Result<Table, ProcessingError>
    where
        F: Fn(&Value) -> Value,
    {
        let index = self.column_index(column)?;
        let mut result = self.clone();
        for row in &mut result.data {
            if let Some(cell) = row.get_mut(index) {
                *cell = f(cell);
            }
        }
        Ok(result)
    }

    /// Copy with the named columns coerced to integer counts
    pub fn coerce_columns<S: AsRef<str>>(
        &self,
        columns: &[S],
        coercer: &Coercer,
        policy: UnknownPolicy,
    ) -> Result<Table, ProcessingError> {
        let indices = self.column_indices(columns)?;
        let mut result = self.clone();
        for row in &mut result.data {
            for &i in &indices {
                if let Some(cell) = row.get_mut(i) {
                    *cell = Value::Integer(coercer.to_int(cell, policy));
                }
            }
        }
        Ok(result)
    }

    /// Stable sort by several `(column, ascending)` keys
    pub fn sort_by_columns(&self, keys: &[(&str, bool)]) -> Result<Table, ProcessingError> {
        let resolved: Vec<(usize, bool)> = keys
            .iter()
            .map(|(name, ascending)| self.column_index(name).map(|i| (i, *ascending)))
            .collect::<Result<_, _>>()?;

        let mut result = self.clone();
        result.data.sort_by(|a, b| {
            resolved
                .iter()
                .map(|&(i, ascending)| {
                    let ord = a.values[i].total_cmp(&b.values[i]);
                    if ascending {
                        ord
                    } else {
                        ord.reverse()
                    }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Ok(result)
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        let mut result = self.clone();
        result.data.truncate(n);
        result
    }
}

/// Select specific columns from a table
pub struct SelectTransform {
    columns: Vec<String>,
}

impl SelectTransform {
    /// Create a new select transform with the given column names
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        SelectTransform {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl DataProcessor for SelectTransform {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        input.project(&self.columns[..])
    }

    fn name(&self) -> &str {
        "select"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Drop the `_id` housekeeping column
pub struct CleanCopyTransform;

impl DataProcessor for CleanCopyTransform {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        Ok(input.clean_copy())
    }

    fn name(&self) -> &str {
        "clean_copy"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Coerce columns to integer counts
pub struct CoerceTransform<'a> {
    columns: Vec<String>,
    coercer: &'a Coercer,
    policy: UnknownPolicy,
}

impl<'a> CoerceTransform<'a> {
    pub fn new<S: Into<String>>(columns: Vec<S>, coercer: &'a Coercer, policy: UnknownPolicy) -> Self {
        CoerceTransform {
            columns: columns.into_iter().map(Into::into).collect(),
            coercer,
            policy,
        }
    }
}

impl DataProcessor for CoerceTransform<'_> {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        input.coerce_columns(&self.columns[..], self.coercer, self.policy)
    }

    fn name(&self) -> &str {
        "coerce"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Coerce
    }
}

/// Replace every cell of a column through a function
pub struct MapColumnTransform {
    column: String,
    function: Box<dyn Fn(&Value) -> Value>,
}

impl MapColumnTransform {
    pub fn new<F>(column: &str, function: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        MapColumnTransform {
            column: column.to_string(),
            function: Box::new(function),
        }
    }
}

impl DataProcessor for MapColumnTransform {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        input.map_column(&self.column, &self.function)
    }

    fn name(&self) -> &str {
        "map_column"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Sort rows by one or more columns
pub struct SortTransform {
    keys: Vec<(String, bool)>,
}

impl SortTransform {
    /// Sort by `(column, ascending)` keys, earlier keys first
    pub fn new(keys: Vec<(String, bool)>) -> Self {
        SortTransform { keys }
    }
}

impl DataProcessor for SortTransform {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        let keys: Vec<(&str, bool)> = self.keys.iter().map(|(c, a)| (c.as_str(), *a)).collect();
        input.sort_by_columns(&keys)
    }

    fn name(&self) -> &str {
        "sort"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}

/// Keep the first rows of a table
pub struct LimitTransform {
    limit: usize,
}

impl LimitTransform {
    pub fn new(limit: usize) -> Self {
        LimitTransform { limit }
    }
}

impl DataProcessor for LimitTransform {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        Ok(input.head(self.limit))
    }

    fn name(&self) -> &str {
        "limit"
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Transform
    }
}
