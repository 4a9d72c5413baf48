// Filter operations for table derivation
// Author: Gabriel Demetrios Lafis

use crate::data::{Row, Table};
use super::{DataProcessor, ProcessingError, ProcessorType};

/// Filter rows based on a predicate
pub struct FilterProcessor {
    name: String,
    required_column: Option<String>,
    predicate: Box<dyn Fn(&Row, &Table) -> bool>,
}

impl FilterProcessor {
    /// Create a new filter processor with a predicate function
    pub fn new<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&Row, &Table) -> bool + 'static,
    {
        FilterProcessor {
            name: name.to_string(),
            required_column: None,
            predicate: Box::new(predicate),
        }
    }

    /// Create a filter that keeps rows whose column label equals `label`
    pub fn equals(column: &str, label: &str) -> Self {
        let owned_column = column.to_string();
        let label = label.to_string();
        let mut filter = Self::new(&format!("equals_{}", column), move |row, table| {
            table
                .value(row, &owned_column)
                .map_or(false, |value| value.to_label() == label)
        });
        filter.required_column = Some(column.to_string());
        filter
    }
}

impl DataProcessor for FilterProcessor {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        if let Some(column) = &self.required_column {
            input.column_index(column)?;
        }

        let mut result = Table::new(input.schema.clone());
        result.total = input.total;
        result.data = input
            .data
            .iter()
            .filter(|row| (self.predicate)(row, input))
            .cloned()
            .collect();

        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Filter
    }
}

impl Table {
    /// Rows whose `column` label equals `label`
    pub fn filter_eq(&self, column: &str, label: &str) -> Result<Table, ProcessingError> {
        FilterProcessor::equals(column, label).process(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> Table {
        Table::from_payload(&json!({"result": {"records": [
            {"test_date": "2020-10-03", "corona_result": "שלילי"},
            {"test_date": "2020-10-04", "corona_result": "חיובי"},
            {"test_date": "2020-10-03", "corona_result": "חיובי"}
        ]}}))
        .unwrap()
    }

    #[test]
    fn test_filter_eq() {
        let result = table().filter_eq("test_date", "2020-10-03").unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.column_names(), vec!["test_date", "corona_result"]);
    }

    #[test]
    fn test_filter_missing_column() {
        assert!(matches!(
            table().filter_eq("date", "2020-10-03"),
            Err(ProcessingError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_filter_predicate() {
        let filter = FilterProcessor::new("positive", |row, table| {
            table.value(row, "corona_result").and_then(|v| v.as_str()) == Some("חיובי")
        });
        assert_eq!(filter.process(&table()).unwrap().len(), 2);
        assert_eq!(filter.name(), "positive");
    }
}
