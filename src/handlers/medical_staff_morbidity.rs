// Medical staff morbidity dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::processing::{distinct_records, grouped_unique_extract, Aggregate, Outcome};
use crate::utils::{validate_date, Logger, ValidationError};
use super::{bool_arg, require_arg, rows_on_day, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const MEDICAL_STAFF_DATE: &str = "Date";

pub const CONFIRMED_COLUMNS: [&str; 3] = [
    "confirmed_cases_physicians",
    "confirmed_cases_nurses",
    "confirmed_cases_other_healthcare_workers",
];

pub const ISOLATED_COLUMNS: [&str; 3] = [
    "isolated_physicians",
    "isolated_nurses",
    "isolated_other_healthcare_workers",
];

const METHODS: &[&str] = &[
    "confirmed_cases",
    "isolated_cases",
    "confirmed_cases_by_date",
    "isolated_cases_by_date",
    "confirmed_cases_statistics",
    "isolated_cases_statistics",
];

pub struct MedicalStaffMorbidityHandler {
    base: HandlerBase,
}

impl MedicalStaffMorbidityHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        MedicalStaffMorbidityHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{date: {column: value}}` of the confirmed case columns
    pub fn confirmed_cases(&self, ascending: bool) -> Outcome {
        self.data_by_columns("confirmed_cases", &CONFIRMED_COLUMNS, ascending)
    }

    /// `{date: {column: value}}` of the isolation columns
    pub fn isolated_cases(&self, ascending: bool) -> Outcome {
        self.data_by_columns("isolated_cases", &ISOLATED_COLUMNS, ascending)
    }

    pub fn confirmed_cases_by_date(&self, date: &str) -> Result<Outcome, ValidationError> {
        self.data_by_date("confirmed_cases_by_date", date, &CONFIRMED_COLUMNS)
    }

    pub fn isolated_cases_by_date(&self, date: &str) -> Result<Outcome, ValidationError> {
        self.data_by_date("isolated_cases_by_date", date, &ISOLATED_COLUMNS)
    }

    pub fn confirmed_cases_statistics(&self) -> Outcome {
        self.base
            .statistics_by_columns("confirmed_cases_statistics", &CONFIRMED_COLUMNS)
    }

    pub fn isolated_cases_statistics(&self) -> Outcome {
        self.base
            .statistics_by_columns("isolated_cases_statistics", &ISOLATED_COLUMNS)
    }

    fn data_by_columns(&self, method: &str, columns: &[&str], ascending: bool) -> Outcome {
        let ascending_arg = ascending.to_string();
        self.base.query(method, &[ascending_arg.as_str()], |table| {
            let mut result = grouped_unique_extract(table, &[MEDICAL_STAFF_DATE], columns)?;
            if let Aggregate::Map(dates) = &mut result {
                dates.sort_by(|a, _, b, _| if ascending { a.cmp(b) } else { b.cmp(a) });
            }
            Ok(result)
        })
    }

    fn data_by_date(&self, method: &str, date: &str, columns: &[&str]) -> Result<Outcome, ValidationError> {
        validate_date(date)?;

        Ok(self.base.query(method, &[date], |table| {
            let day = rows_on_day(table, MEDICAL_STAFF_DATE, date)?;
            let records = distinct_records(&day, columns)?;

            Ok(records.first().map_or_else(Aggregate::map, |record| {
                columns
                    .iter()
                    .zip(record)
                    .map(|(name, value)| (name.to_string(), Aggregate::from_value(value)))
                    .collect()
            }))
        }))
    }
}

impl DataHandler for MedicalStaffMorbidityHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::MedicalStaffMorbidity
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "confirmed_cases" => Ok(self.confirmed_cases(bool_arg(method, arg, true)?)),
            "isolated_cases" => Ok(self.isolated_cases(bool_arg(method, arg, true)?)),
            "confirmed_cases_by_date" => Ok(self.confirmed_cases_by_date(require_arg(method, arg)?)?),
            "isolated_cases_by_date" => Ok(self.isolated_cases_by_date(require_arg(method, arg)?)?),
            "confirmed_cases_statistics" => Ok(self.confirmed_cases_statistics()),
            "isolated_cases_statistics" => Ok(self.isolated_cases_statistics()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}
