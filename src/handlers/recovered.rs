// Recovered dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::UnknownPolicy;
use crate::processing::{column_statistics, Aggregate, Outcome};
use crate::utils::Logger;
use super::{unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const TEST_INDICATION: &str = "test_indication";
const GENDER: &str = "gender";
const AGE_GROUP: &str = "age_group";
const DAYS_BETWEEN_POS_AND_RECOVERY: &str = "days_between_pos_and_recovery";
const TOTAL_TESTS_COUNT: &str = "total_tests_count";

const METHODS: &[&str] = &["test_indication", "days_from_pos_to_recovery_stats", "total_tests_count"];

pub struct RecoveredHandler {
    base: HandlerBase,
}

impl RecoveredHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        RecoveredHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{test_indication: {gender: {age_group: n}}}`
    pub fn test_indication(&self) -> Outcome {
        self.base
            .data_by_columns("test_indication", &[TEST_INDICATION, GENDER, AGE_GROUP], AGE_GROUP)
    }

    /// `{min, max, mean}` of the days from a positive test to recovery
    pub fn days_from_pos_to_recovery_stats(&self) -> Outcome {
        self.base.query("days_from_pos_to_recovery_stats", &[], |table| {
            let coercer = self.base.coercer();
            let table = table.coerce_columns(
                &[DAYS_BETWEEN_POS_AND_RECOVERY],
                coercer,
                UnknownPolicy::RandomSmallOnUnknown,
            )?;
            let stats = column_statistics(&table, DAYS_BETWEEN_POS_AND_RECOVERY, coercer)?;
            Ok(stats.to_aggregate(None))
        })
    }

    /// `{age_group: {gender: tests}}`, each row contributing its test count
    pub fn total_tests_count(&self) -> Outcome {
        self.base.query("total_tests_count", &[], |table| {
            let coercer = self.base.coercer();
            let tests = table.column_index(TOTAL_TESTS_COUNT)?;
            let gender = table.column_index(GENDER)?;
            let age_group = table.column_index(AGE_GROUP)?;

            let mut result = Aggregate::map();
            for row in &table.data {
                let amount = coercer.to_int(&row.values[tests], UnknownPolicy::ZeroOnUnknown);
                result.add_at_path(&[row.values[age_group].to_label(), row.values[gender].to_label()], amount);
            }
            Ok(result)
        })
    }
}

impl DataHandler for RecoveredHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::Recovered
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, _arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "test_indication" => Ok(self.test_indication()),
            "days_from_pos_to_recovery_stats" => Ok(self.days_from_pos_to_recovery_stats()),
            "total_tests_count" => Ok(self.total_tests_count()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}
