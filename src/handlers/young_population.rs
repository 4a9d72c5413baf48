// Young population weekly dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::{date_key_normalize, UnknownPolicy};
use crate::processing::{column_stats_by_group, distinct_records, Aggregate, Outcome};
use crate::utils::Logger;
use super::{unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const FIRST_WEEK_DAY: &str = "first_week_day";
const REGION: &str = "region";
const AGE_GROUP: &str = "age_group";

pub const REQUIRED_COLUMNS: [&str; 3] = ["weekly_tests_num", "weekly_newly_tested", "weekly_cases"];

const METHODS: &[&str] = &[
    "total_cases_statistics",
    "cases_statistics_by_region",
    "cases_statistics_by_age_group",
    "cases_statistics_by_first_week_day",
];

pub struct YoungPopulationHandler {
    base: HandlerBase,
}

impl YoungPopulationHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        YoungPopulationHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{first_week_day: {region: {age_group: {column: n}}}}`
    pub fn total_cases_statistics(&self) -> Outcome {
        self.base.query("total_cases_statistics", &[], |table| {
            let table = table.coerce_columns(
                &REQUIRED_COLUMNS,
                self.base.coercer(),
                UnknownPolicy::RandomSmallOnUnknown,
            )?;

            let mut columns = vec![FIRST_WEEK_DAY, REGION, AGE_GROUP];
            columns.extend(REQUIRED_COLUMNS);

            let mut result = Aggregate::map();
            for record in distinct_records(&table, &columns)? {
                let day = record[0].to_label();
                let key = [
                    date_key_normalize(&day).to_string(),
                    record[1].to_label(),
                    record[2].to_label(),
                ];
                let counts = REQUIRED_COLUMNS
                    .iter()
                    .zip(&record[3..])
                    .map(|(name, value)| (name.to_string(), Aggregate::from_value(value)))
                    .collect();
                result.insert_path(&key, counts);
            }
            Ok(result)
        })
    }

    pub fn cases_statistics_by_region(&self) -> Outcome {
        self.statistics_by_key("cases_statistics_by_region", REGION)
    }

    pub fn cases_statistics_by_age_group(&self) -> Outcome {
        self.statistics_by_key("cases_statistics_by_age_group", AGE_GROUP)
    }

    pub fn cases_statistics_by_first_week_day(&self) -> Outcome {
        self.statistics_by_key("cases_statistics_by_first_week_day", FIRST_WEEK_DAY)
    }

    fn statistics_by_key(&self, method: &str, key_column: &str) -> Outcome {
        self.base.query(method, &[], |table| {
            column_stats_by_group(
                table,
                key_column,
                &REQUIRED_COLUMNS,
                self.base.coercer(),
                UnknownPolicy::RandomSmallOnUnknown,
            )
        })
    }
}

impl DataHandler for YoungPopulationHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::YoungPopulation
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, _arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "total_cases_statistics" => Ok(self.total_cases_statistics()),
            "cases_statistics_by_region" => Ok(self.cases_statistics_by_region()),
            "cases_statistics_by_age_group" => Ok(self.cases_statistics_by_age_group()),
            "cases_statistics_by_first_week_day" => Ok(self.cases_statistics_by_first_week_day()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}
