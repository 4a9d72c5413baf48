// Deaths dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::processing::{grouped_count, grouped_value_counts, Outcome};
use crate::utils::Logger;
use super::{unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const GENDER: &str = "gender";
const AGE_GROUP: &str = "age_group";
const VENTILATED: &str = "Ventilated";
const TIME_BETWEEN_POSITIVE_AND_HOSPITALIZATION: &str = "Time_between_positive_and_hospitalization";
const LENGTH_OF_HOSPITALIZATION: &str = "Length_of_hospitalization";
const TIME_BETWEEN_POSITIVE_AND_DEATH: &str = "Time_between_positive_and_death";

const METHODS: &[&str] = &[
    "amount_of_deaths",
    "amount_of_ventilated",
    "time_between_positive_and_hospitalization",
    "length_of_hospitalization",
    "time_between_positive_and_death",
];

pub struct DeathsHandler {
    base: HandlerBase,
}

impl DeathsHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        DeathsHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{gender: {age_group: n}}`, largest groups first
    pub fn amount_of_deaths(&self) -> Outcome {
        self.base.query("amount_of_deaths", &[], |table| {
            grouped_count(table, &[GENDER, AGE_GROUP], AGE_GROUP, true)
        })
    }

    /// `{gender: {age_group: {ventilated: n}}}`
    pub fn amount_of_ventilated(&self) -> Outcome {
        self.base
            .data_by_columns("amount_of_ventilated", &[GENDER, AGE_GROUP, VENTILATED], AGE_GROUP)
    }

    pub fn time_between_positive_and_hospitalization(&self) -> Outcome {
        self.by_age_group(
            "time_between_positive_and_hospitalization",
            TIME_BETWEEN_POSITIVE_AND_HOSPITALIZATION,
        )
    }

    pub fn length_of_hospitalization(&self) -> Outcome {
        self.by_age_group("length_of_hospitalization", LENGTH_OF_HOSPITALIZATION)
    }

    pub fn time_between_positive_and_death(&self) -> Outcome {
        self.by_age_group("time_between_positive_and_death", TIME_BETWEEN_POSITIVE_AND_DEATH)
    }

    /// `{age_group: {value: n}}`
    fn by_age_group(&self, method: &str, column: &str) -> Outcome {
        self.base
            .query(method, &[], |table| grouped_value_counts(table, &[AGE_GROUP], column, true))
    }
}

impl DataHandler for DeathsHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::Deaths
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, _arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "amount_of_deaths" => Ok(self.amount_of_deaths()),
            "amount_of_ventilated" => Ok(self.amount_of_ventilated()),
            "time_between_positive_and_hospitalization" => Ok(self.time_between_positive_and_hospitalization()),
            "length_of_hospitalization" => Ok(self.length_of_hospitalization()),
            "time_between_positive_and_death" => Ok(self.time_between_positive_and_death()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::Aggregate;
    use serde_json::json;

    fn handler() -> DeathsHandler {
        let payload = json!({"result": {"records": [
            {"_id": 1, "gender": "נקבה", "age_group": "<65", "Ventilated": "0",
             "Time_between_positive_and_hospitalization": "1", "Length_of_hospitalization": "10",
             "Time_between_positive_and_death": "11"},
            {"_id": 2, "gender": "זכר", "age_group": "65+", "Ventilated": "1",
             "Time_between_positive_and_hospitalization": "0", "Length_of_hospitalization": "10",
             "Time_between_positive_and_death": "10"},
            {"_id": 3, "gender": "זכר", "age_group": "65+", "Ventilated": "0",
             "Time_between_positive_and_hospitalization": "0", "Length_of_hospitalization": "3",
             "Time_between_positive_and_death": "3"}
        ], "total": 3}});
        DeathsHandler::new(Logger::new("deaths"), &payload, &HandlerOptions::default())
    }

    #[test]
    fn test_amount_of_deaths_sorted() {
        let pairs = handler().amount_of_deaths().to_pairs();
        assert_eq!(pairs[0].0, "זכר");
        assert_eq!(pairs[0].1.get("65+"), Some(&Aggregate::Int(2)));
    }

    #[test]
    fn test_ventilated() {
        let outcome = handler().amount_of_ventilated();
        let data = outcome.data().unwrap();
        assert_eq!(data.get_path(&["זכר", "65+", "1"]), Some(&Aggregate::Int(1)));
        assert_eq!(data.get_path(&["נקבה", "<65", "0"]), Some(&Aggregate::Int(1)));
    }

    #[test]
    fn test_by_age_group() {
        let outcome = handler().length_of_hospitalization();
        assert_eq!(outcome.data().unwrap().get_path(&["65+", "10"]), Some(&Aggregate::Int(1)));

        let outcome = handler().time_between_positive_and_hospitalization();
        assert_eq!(outcome.data().unwrap().get_path(&["65+", "0"]), Some(&Aggregate::Int(2)));
    }
}
