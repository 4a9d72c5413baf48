// Processing module for table derivation and aggregation
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod filter;
mod outcome;
mod stats;
mod transform;

pub use aggregate::*;
pub use filter::*;
pub use outcome::*;
pub use stats::*;
pub use transform::*;

use thiserror::Error;

use crate::data::{DataError, Table};

/// Represents a data processor that derives one table from another
pub trait DataProcessor {
    /// Process a table and return a new table
    fn process(&self, input: &Table) -> Result<Table, ProcessingError>;

    /// Get the processor name
    fn name(&self) -> &str;

    /// Get the processor type
    fn processor_type(&self) -> ProcessorType;
}

/// Represents a processor type
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessorType {
    Transform,
    Filter,
    Coerce,
    Custom(String),
}

/// Represents an error in the processing module
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// A query referenced a column the table does not have
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// The handler was built from a payload without a record list
    #[error("no table loaded")]
    NoTable,

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

impl ProcessingError {
    pub fn column_not_found<S: Into<String>>(column: S) -> Self {
        ProcessingError::ColumnNotFound {
            column: column.into(),
        }
    }
}

/// Pipeline for chaining multiple processors
pub struct Pipeline<'a> {
    name: String,
    processors: Vec<Box<dyn DataProcessor + 'a>>,
}

impl<'a> Pipeline<'a> {
    /// Create a new pipeline with the given name
    pub fn new(name: &str) -> Self {
        Pipeline {
            name: name.to_string(),
            processors: Vec::new(),
        }
    }

    /// Add a processor to the pipeline
    pub fn add<P: DataProcessor + 'a>(mut self, processor: P) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Execute the pipeline on a table
    pub fn execute(&self, input: &Table) -> Result<Table, ProcessingError> {
        let mut current = input.clone();

        for processor in &self.processors {
            current = processor.process(&current)?;
        }

        Ok(current)
    }
}

impl DataProcessor for Pipeline<'_> {
    fn process(&self, input: &Table) -> Result<Table, ProcessingError> {
        self.execute(input)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Custom("Pipeline".to_string())
    }
}
