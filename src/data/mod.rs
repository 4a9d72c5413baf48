// Data module for tabular records and their cell values
// Author: Gabriel Demetrios Lafis

mod coercion;
mod json;

pub use coercion::*;
pub use json::*;

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// Housekeeping column attached to every record by the datastore
pub const ID_COLUMN: &str = "_id";

/// Represents a table of records sharing one column set
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub schema: Schema,
    pub data: Vec<Row>,
    pub total: Option<i64>,
}

impl Table {
    /// Create a new empty table
    pub fn new(schema: Schema) -> Self {
        Table {
            schema,
            data: Vec::new(),
            total: None,
        }
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Row) -> Result<(), DataError> {
        if row.values.len() != self.schema.fields.len() {
            return Err(DataError::SchemaMismatch {
                expected: self.schema.fields.len(),
                actual: row.values.len(),
            });
        }

        self.data.push(row);
        Ok(())
    }

    /// Get the number of rows in the table
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Check whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.schema.index_of(name).is_some()
    }

    /// Get the value of a named column in a row
    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a Value> {
        self.schema.index_of(column).and_then(|i| row.get(i))
    }
}

/// Represents a row in a table
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    /// Create a new row with the given values
    pub fn new(values: Vec<Value>) -> Self {
        Row { values }
    }

    /// Get a reference to a value by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a mutable reference to a value by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }
}

/// Represents a raw cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the value as a string slice, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// String key used for grouping and for output mappings.
    ///
    /// Null is labelled `NULL`, matching the literal the datasets use for
    /// missing cells, so null keys group together instead of being dropped.
    pub fn to_label(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Boolean(true) => "True".to_string(),
            Value::Boolean(false) => "False".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format!("{:?}", f),
            Value::String(s) => s.clone(),
        }
    }

    /// Total ordering used by sort transforms.
    ///
    /// Nulls sort first, numbers compare numerically, strings lexicographically,
    /// and numbers sort before strings.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Null => 0,
                Value::Boolean(_) => 1,
                Value::Integer(_) | Value::Float(_) => 2,
                Value::String(_) => 3,
            }
        }

        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (a, b) if rank(a) == 2 && rank(b) == 2 => {
                let (x, y) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
                x.total_cmp(&y)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_label())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

/// Represents the column set of a table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema with the given fields
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    /// Schema of plain column names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Schema::new(
            names
                .iter()
                .map(|n| Field::new(n.as_ref().to_string(), true))
                .collect(),
        )
    }

    /// Get a reference to a field by name
    pub fn get_field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Position of a named field
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Represents a column in a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub nullable: bool,
}

impl Field {
    /// Create a new field
    pub fn new(name: String, nullable: bool) -> Self {
        Field { name, nullable }
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("row has {actual} values, schema has {expected} fields")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
