// Cities population dataset handler
// Author: Gabriel Demetrios Lafis

use chrono::Local;
use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::UnknownPolicy;
use crate::processing::{distinct_records, top_n_by_group, Aggregate, Outcome, ProcessingError};
use crate::utils::Logger;
use super::{rows_on_day, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const CITY_NAME: &str = "City_name";
const CITIES_DATE: &str = "Date";

/// Fields of a city record; the ones after the date are cumulative counts
pub const CITY_FIELDS: [&str; 8] = [
    CITY_NAME,
    "City_code",
    CITIES_DATE,
    "Cumulative_verified_cases",
    "Cumulated_recovered",
    "Cumulated_deaths",
    "Cumulated_number_of_tests",
    "Cumulated_number_of_diagnostic_tests",
];

/// Number of cities kept per field by [`CitiesHandler::top_cases_in_cities`]
pub const TOP_CITIES: usize = 10;

const METHODS: &[&str] = &["cities_by_date", "top_cases_in_cities", "cases_statistics"];

fn cumulative_fields() -> &'static [&'static str] {
    &CITY_FIELDS[3..]
}

pub struct CitiesHandler {
    base: HandlerBase,
}

impl CitiesHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        CitiesHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{City_name: {field: value}}` of one day, today when `date` is `None`
    pub fn cities_by_date(&self, date: Option<&str>) -> Outcome {
        let date = date.map_or_else(|| Local::now().format("%Y-%m-%d").to_string(), str::to_string);

        self.base.query("cities_by_date", &[date.as_str()], |table| {
            let day = rows_on_day(table, CITIES_DATE, &date)?;

            let mut result = Aggregate::map();
            for record in distinct_records(&day, &CITY_FIELDS)? {
                let city = record[0].to_label();
                let fields = CITY_FIELDS
                    .iter()
                    .zip(&record)
                    .map(|(name, value)| (name.to_string(), Aggregate::from_value(value)))
                    .collect();
                result.insert_path(&[city], fields);
            }
            Ok(result)
        })
    }

    /// `{field: {City_name: n}}` over the latest, largest entries of each cumulative field.
    ///
    /// A city ranked several times keeps its best position and the value of its
    /// lowest-ranked entry.
    pub fn top_cases_in_cities(&self) -> Outcome {
        self.base.query("top_cases_in_cities", &[], |table| {
            let fields = cumulative_fields();
            let table = table.coerce_columns(fields, self.base.coercer(), UnknownPolicy::RandomSmallOnUnknown)?;

            fields
                .iter()
                .map(|&field| {
                    let top = top_n_by_group(&table, &[CITIES_DATE, field], CITY_NAME, field, TOP_CITIES, true)?;
                    Ok::<_, ProcessingError>((field.to_string(), top))
                })
                .collect()
        })
    }

    /// `{field: {min, max, mean, sum}}` of each cumulative field
    pub fn cases_statistics(&self) -> Outcome {
        self.base.statistics_by_columns("cases_statistics", cumulative_fields())
    }
}

impl DataHandler for CitiesHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::CitiesPopulation
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "cities_by_date" => Ok(self.cities_by_date(arg)),
            "top_cases_in_cities" => Ok(self.top_cases_in_cities()),
            "cases_statistics" => Ok(self.cases_statistics()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(city: &str, code: &str, date: &str, cases: &str) -> JsonValue {
        json!({
            "City_name": city, "City_code": code, "Date": date,
            "Cumulative_verified_cases": cases, "Cumulated_recovered": "<15",
            "Cumulated_deaths": "0", "Cumulated_number_of_tests": "100",
            "Cumulated_number_of_diagnostic_tests": "90"
        })
    }

    fn handler() -> CitiesHandler {
        let payload = json!({"result": {"records": [
            record("אבו גוש", "472", "2020-10-01", "300"),
            record("אבו גוש", "472", "2020-10-02", "320"),
            record("אבו סנאן", "473", "2020-10-02", "150"),
            record("אופקים", "31", "2020-10-01", "<15")
        ], "total": 4}});
        let options = HandlerOptions {
            seed: Some(42),
            ..HandlerOptions::default()
        };
        CitiesHandler::new(Logger::new("cities"), &payload, &options)
    }

    #[test]
    fn test_cities_by_date() {
        let outcome = handler().cities_by_date(Some("2020-10-02"));
        let data = outcome.data().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(
            data.get_path(&["אבו סנאן", "Cumulative_verified_cases"]),
            Some(&Aggregate::from("150"))
        );
        assert!(handler().cities_by_date(Some("1999-01-01")).is_no_data());
    }

    #[test]
    fn test_top_cases_city_keeps_rank_takes_last_value() {
        let outcome = handler().top_cases_in_cities();
        let top = outcome.data().unwrap().get("Cumulative_verified_cases").unwrap();
        let cities: Vec<_> = top.as_map().unwrap().keys().cloned().collect();
        assert_eq!(cities, vec!["אבו גוש", "אבו סנאן", "אופקים"]);
        // ranked first on 2020-10-02, overwritten by its 2020-10-01 row
        assert_eq!(top.get("אבו גוש"), Some(&Aggregate::Int(300)));
    }

    #[test]
    fn test_cases_statistics() {
        let outcome = handler().cases_statistics();
        let deaths = outcome.data().unwrap().get("Cumulated_deaths").unwrap();
        assert_eq!(deaths.get("sum"), Some(&Aggregate::Int(0)));
        assert_eq!(
            outcome.data().unwrap().get_path(&["Cumulated_number_of_tests", "mean"]),
            Some(&Aggregate::Float(100.0))
        );
    }
}
