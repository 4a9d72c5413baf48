// Hospitalized dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::{date_key_normalize, Value};
use crate::processing::{distinct_records, Aggregate, Outcome};
use crate::utils::{validate_date, Logger, ValidationError};
use super::{require_arg, rows_on_day, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

/// Date column of the hospitalized dataset ("date")
pub const HOSPITALIZED_DATE: &str = "תאריך";

const METHODS: &[&str] = &["hospitalized_total_stats", "hospitalized_stats_by_date"];

pub struct HospitalizedHandler {
    base: HandlerBase,
}

/// Leaf `{column: value}` over every column but the date
fn stats_leaf(columns: &[&str], record: &[Value]) -> Aggregate {
    columns
        .iter()
        .zip(record)
        .filter(|(name, _)| **name != HOSPITALIZED_DATE)
        .map(|(name, value)| (name.to_string(), Aggregate::from_value(value)))
        .collect()
}

impl HospitalizedHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        HospitalizedHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    /// Names accepted by the dynamic query entry point
    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{date: {column: value}}`, keyed by the date part of the timestamp
    pub fn hospitalized_total_stats(&self) -> Outcome {
        self.base.query("hospitalized_total_stats", &[], |table| {
            let date_index = table.column_index(HOSPITALIZED_DATE)?;
            let columns = table.column_names();

            let mut result = Aggregate::map();
            for record in distinct_records(table, &columns)? {
                let date = record[date_index].to_label();
                result.insert_path(&[date_key_normalize(&date)], stats_leaf(&columns, &record));
            }
            Ok(result)
        })
    }

    /// `{column: value}` of one day
    pub fn hospitalized_stats_by_date(&self, date: &str) -> Result<Outcome, ValidationError> {
        validate_date(date)?;

        Ok(self.base.query("hospitalized_stats_by_date", &[date], |table| {
            let day = rows_on_day(table, HOSPITALIZED_DATE, date)?;
            let columns = day.column_names();
            let records = distinct_records(&day, &columns)?;

            Ok(records
                .first()
                .map_or_else(Aggregate::map, |record| stats_leaf(&columns, record)))
        }))
    }
}

impl DataHandler for HospitalizedHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::Hospitalized
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "hospitalized_total_stats" => Ok(self.hospitalized_total_stats()),
            "hospitalized_stats_by_date" => Ok(self.hospitalized_stats_by_date(require_arg(method, arg)?)?),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}
