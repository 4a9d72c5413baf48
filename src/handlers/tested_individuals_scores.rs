// Tested individuals scores dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::{Table, UnknownPolicy};
use crate::processing::{distinct_records, Aggregate, Outcome};
use crate::utils::Logger;
use super::{require_arg, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const TEST_DATE: &str = "test_date";
const AGE_60_AND_ABOVE: &str = "age_60_and_above";

const METHODS: &[&str] = &["statistics", "statistics_by_date"];

pub struct TestedIndividualsScoresHandler {
    base: HandlerBase,
}

/// Every column other than the test date and the age flag
fn score_columns(table: &Table) -> Vec<String> {
    table
        .column_names()
        .into_iter()
        .filter(|name| *name != TEST_DATE && *name != AGE_60_AND_ABOVE)
        .map(str::to_string)
        .collect()
}

impl TestedIndividualsScoresHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        TestedIndividualsScoresHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{score_column: {age_60_and_above: Σ}}` over the distinct values of each age group
    pub fn statistics(&self) -> Outcome {
        self.base.query("statistics", &[], |table| {
            let coercer = self.base.coercer();
            table.column_index(AGE_60_AND_ABOVE)?;

            let mut result = Aggregate::map();
            for column in score_columns(table) {
                for pair in distinct_records(table, &[AGE_60_AND_ABOVE, column.as_str()])? {
                    let amount = coercer.to_int(&pair[1], UnknownPolicy::ZeroOnUnknown);
                    result.add_at_path(&[column.clone(), pair[0].to_label()], amount);
                }
            }
            Ok(result)
        })
    }

    /// `{age_60_and_above: {score_column: n}}` of one test day
    pub fn statistics_by_date(&self, date: &str) -> Outcome {
        self.base.query("statistics_by_date", &[date], |table| {
            let coercer = self.base.coercer();
            let day = table.filter_eq(TEST_DATE, date)?;
            let columns = score_columns(&day);
            let age_index = day.column_index(AGE_60_AND_ABOVE)?;
            let indices = day.column_indices(&columns)?;

            let all: Vec<&str> = day.column_names();
            let mut result = Aggregate::map();
            for record in distinct_records(&day, &all)? {
                let scores = columns
                    .iter()
                    .zip(&indices)
                    .map(|(column, &i)| {
                        let n = coercer.to_int(&record[i], UnknownPolicy::ZeroOnUnknown);
                        (column.clone(), Aggregate::Int(n))
                    })
                    .collect();
                result.insert_path(&[record[age_index].to_label()], scores);
            }
            Ok(result)
        })
    }
}

impl DataHandler for TestedIndividualsScoresHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::TestedIndividualsScores
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "statistics" => Ok(self.statistics()),
            "statistics_by_date" => Ok(self.statistics_by_date(require_arg(method, arg)?)),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> TestedIndividualsScoresHandler {
        let payload = json!({"result": {"records": [
            {"_id": 1, "test_date": "2020-03-11", "age_60_and_above": "No", "cough": "12", "fever": "3"},
            {"_id": 2, "test_date": "2020-03-11", "age_60_and_above": "Yes", "cough": "<15", "fever": "5"},
            {"_id": 3, "test_date": "2020-03-12", "age_60_and_above": "No", "cough": "20", "fever": "3"}
        ], "total": 3}});
        TestedIndividualsScoresHandler::new(Logger::new("scores"), &payload, &HandlerOptions::default())
    }

    #[test]
    fn test_statistics_sums_distinct_values() {
        let outcome = handler().statistics();
        let data = outcome.data().unwrap();
        assert_eq!(data.get_path(&["cough", "No"]), Some(&Aggregate::Int(32)));
        assert_eq!(data.get_path(&["cough", "Yes"]), Some(&Aggregate::Int(0)));
        // the repeated (No, 3) pair counts once
        assert_eq!(data.get_path(&["fever", "No"]), Some(&Aggregate::Int(3)));
    }

    #[test]
    fn test_statistics_by_date() {
        let outcome = handler().statistics_by_date("2020-03-11");
        let data = outcome.data().unwrap();
        assert_eq!(data.get_path(&["No", "cough"]), Some(&Aggregate::Int(12)));
        assert_eq!(data.get_path(&["Yes", "fever"]), Some(&Aggregate::Int(5)));
        assert!(handler().statistics_by_date("2020-01-01").is_no_data());
    }
}
