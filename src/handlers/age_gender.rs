// Age and gender weekly dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::UnknownPolicy;
use crate::processing::{column_stats_by_group, grouped_unique_extract, Outcome};
use crate::utils::Logger;
use super::{require_arg, rows_on_day, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const GENDER: &str = "gender";
const AGE_GROUP: &str = "age_group";
const FIRST_WEEK_DAY: &str = "first_week_day";

/// Weekly figures reported per gender and age group
pub const CALCULATED_FIELDS: [&str; 4] = ["weekly_tests_num", "weekly_newly_tested", "weekly_cases", "weekly_deceased"];

const METHODS: &[&str] = &[
    "statistics_by_gender",
    "statistics_by_given_first_week_day",
    "statistics_by_age_group",
];

pub struct AgeGenderHandler {
    base: HandlerBase,
}

impl AgeGenderHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        AgeGenderHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{gender: {first_week_day: {age_group: {field: value}}}}`
    pub fn statistics_by_gender(&self) -> Outcome {
        self.base.query("statistics_by_gender", &[], |table| {
            grouped_unique_extract(table, &[GENDER, FIRST_WEEK_DAY, AGE_GROUP], &CALCULATED_FIELDS)
        })
    }

    /// `{gender: {age_group: {field: value}}}` of the week starting on `week_day`
    pub fn statistics_by_given_first_week_day(&self, week_day: &str) -> Outcome {
        self.base.query("statistics_by_given_first_week_day", &[week_day], |table| {
            let week = rows_on_day(table, FIRST_WEEK_DAY, week_day)?;
            grouped_unique_extract(&week, &[GENDER, AGE_GROUP], &CALCULATED_FIELDS)
        })
    }

    /// `{age_group: {field: {min, max, mean, total}}}`
    pub fn statistics_by_age_group(&self) -> Outcome {
        self.base.query("statistics_by_age_group", &[], |table| {
            column_stats_by_group(
                table,
                AGE_GROUP,
                &CALCULATED_FIELDS,
                self.base.coercer(),
                UnknownPolicy::RandomSmallOnUnknown,
            )
        })
    }
}

impl DataHandler for AgeGenderHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::AgeGender
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "statistics_by_gender" => Ok(self.statistics_by_gender()),
            "statistics_by_given_first_week_day" => {
                Ok(self.statistics_by_given_first_week_day(require_arg(method, arg)?))
            }
            "statistics_by_age_group" => Ok(self.statistics_by_age_group()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::Aggregate;
    use serde_json::json;

    fn handler() -> AgeGenderHandler {
        let payload = json!({"result": {"records": [
            {"_id": 1, "first_week_day": "2020-03-15", "last_week_day": "2020-03-21", "age_group": "0-19",
             "gender": "זכר", "weekly_tests_num": "1088", "weekly_cases": "<15", "weekly_deceased": "0",
             "weekly_newly_tested": "1039"},
            {"_id": 2, "first_week_day": "2020-03-15", "last_week_day": "2020-03-21", "age_group": "0-19",
             "gender": "נקבה", "weekly_tests_num": "930", "weekly_cases": "<15", "weekly_deceased": "0",
             "weekly_newly_tested": "899"},
            {"_id": 3, "first_week_day": "2020-03-22", "last_week_day": "2020-03-28", "age_group": "0-19",
             "gender": "זכר", "weekly_tests_num": "2500", "weekly_cases": "45", "weekly_deceased": "0",
             "weekly_newly_tested": "2300"}
        ], "total": 3}});
        AgeGenderHandler::new(Logger::new("age_gender"), &payload, &HandlerOptions::default())
    }

    #[test]
    fn test_statistics_by_gender() {
        let outcome = handler().statistics_by_gender();
        let data = outcome.data().unwrap();
        assert_eq!(
            data.get_path(&["זכר", "2020-03-22", "0-19", "weekly_cases"]),
            Some(&Aggregate::from("45"))
        );
        assert_eq!(data.get("זכר").map(Aggregate::len), Some(2));
    }

    #[test]
    fn test_statistics_by_first_week_day() {
        let outcome = handler().statistics_by_given_first_week_day("2020-03-15");
        let data = outcome.data().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(
            data.get_path(&["נקבה", "0-19", "weekly_tests_num"]),
            Some(&Aggregate::from("930"))
        );
    }

    #[test]
    fn test_statistics_by_age_group() {
        let outcome = handler().statistics_by_age_group();
        let data = outcome.data().unwrap();
        assert_eq!(
            data.get_path(&["0-19", "weekly_tests_num", "total"]),
            Some(&Aggregate::Int(4518))
        );
        assert_eq!(data.get_path(&["0-19", "weekly_deceased", "max"]), Some(&Aggregate::Int(0)));
    }
}
