// JSON payload source for datastore search results
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use super::{DataError, Row, Schema, Table, Value};

/// Location of the record list inside a datastore search response
pub const RECORDS_PATH: &str = "result.records";

/// Location of the total record count inside a datastore search response
pub const TOTAL_PATH: &str = "result.total";

/// JSON payload source
pub struct JsonSource<'a> {
    payload: &'a JsonValue,
    array_path: String,
}

impl<'a> JsonSource<'a> {
    /// Create a source reading records from `result.records`
    pub fn new(payload: &'a JsonValue) -> Self {
        JsonSource {
            payload,
            array_path: RECORDS_PATH.to_string(),
        }
    }

    /// Read a whole payload document from disk
    pub fn load_payload<P: AsRef<Path>>(path: P) -> Result<JsonValue, DataError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Convert a JSON value to a cell value
    fn json_to_value(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            // arrays are kept as their JSON text; objects never reach here
            other => Value::String(other.to_string()),
        }
    }

    /// Flatten one record, nested objects becoming dotted column names
    fn flatten_record(prefix: &str, obj: &Map<String, JsonValue>, out: &mut IndexMap<String, Value>) {
        for (key, value) in obj {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                JsonValue::Object(inner) => Self::flatten_record(&name, inner, out),
                other => {
                    out.insert(name, Self::json_to_value(other));
                }
            }
        }
    }

    fn lookup(&self, path: &str) -> Option<&'a JsonValue> {
        path.split('.')
            .try_fold(self.payload, |current, part| current.get(part))
    }

    /// Total record count reported by the datastore, when present
    pub fn total(&self) -> Option<i64> {
        self.lookup(TOTAL_PATH).and_then(JsonValue::as_i64)
    }

    /// Build a table from the record array.
    ///
    /// Columns are the union of the record keys in first-seen order; a record
    /// missing a column gets a null cell.
    pub fn read(&self) -> Result<Table, DataError> {
        let records = self
            .lookup(&self.array_path)
            .ok_or_else(|| {
                DataError::MalformedPayload(format!("path '{}' not found in payload", self.array_path))
            })?
            .as_array()
            .ok_or_else(|| {
                DataError::MalformedPayload(format!("path '{}' is not a list", self.array_path))
            })?;

        let mut flattened = Vec::with_capacity(records.len());
        let mut columns: IndexMap<String, bool> = IndexMap::new();

        for item in records {
            let obj = item
                .as_object()
                .ok_or_else(|| DataError::MalformedPayload("record is not an object".to_string()))?;

            let mut record = IndexMap::new();
            Self::flatten_record("", obj, &mut record);

            for (name, value) in &record {
                let nullable = columns.entry(name.clone()).or_insert(false);
                *nullable |= value.is_null();
            }
            flattened.push(record);
        }

        let mut schema = Schema::from_names(&columns.keys().collect::<Vec<_>>());
        for field in &mut schema.fields {
            let present_everywhere = flattened.iter().all(|r| r.contains_key(&field.name));
            field.nullable = columns.get(&field.name).copied().unwrap_or(true) || !present_everywhere;
        }

        let mut table = Table::new(schema);
        for mut record in flattened {
            let values = table
                .schema
                .fields
                .iter()
                .map(|f| record.swap_remove(&f.name).unwrap_or(Value::Null))
                .collect();
            table.add_row(Row::new(values))?;
        }

        table.total = self.total();
        Ok(table)
    }
}

impl Table {
    /// Build a table from a datastore search payload
    pub fn from_payload(payload: &JsonValue) -> Result<Table, DataError> {
        JsonSource::new(payload).read()
    }
}
