// Tested individuals dataset handler
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::processing::{grouped_value_counts, value_counts, Aggregate, Outcome};
use crate::utils::Logger;
use super::{require_arg, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const TEST_DATE: &str = "test_date";
const CORONA_RESULT: &str = "corona_result";
const GENDER: &str = "gender";
const TEST_INDICATION: &str = "test_indication";
const AGE_60_AND_ABOVE: &str = "age_60_and_above";

/// Symptom flag columns
pub const SYMPTOMS: [&str; 5] = ["cough", "fever", "sore_throat", "shortness_of_breath", "head_ache"];

const METHODS: &[&str] = &[
    "tests_results_by_date",
    "amount_of_test_indication",
    "amount_of_subjects_ages_60_and_above",
    "effects_amount_of_subjects",
];

pub struct TestedIndividualsHandler {
    base: HandlerBase,
}

impl TestedIndividualsHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        TestedIndividualsHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    /// Names accepted by the dynamic query entry point
    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{corona_result: {gender: n}}` of one test day
    pub fn tests_results_by_date(&self, date: &str) -> Outcome {
        self.base.query("tests_results_by_date", &[date], |table| {
            let day = table.filter_eq(TEST_DATE, date)?;
            grouped_value_counts(&day, &[CORONA_RESULT], GENDER, true)
        })
    }

    pub fn amount_of_test_indication(&self) -> Outcome {
        self.base
            .query("amount_of_test_indication", &[], |table| value_counts(table, TEST_INDICATION, true))
    }

    pub fn amount_of_subjects_ages_60_and_above(&self) -> Outcome {
        self.base.query("amount_of_subjects_ages_60_and_above", &[], |table| {
            value_counts(table, AGE_60_AND_ABOVE, true)
        })
    }

    /// `{symptom: {"True"|"False": n}}`
    pub fn effects_amount_of_subjects(&self) -> Outcome {
        self.base.query("effects_amount_of_subjects", &[], |table| {
            let indices = table.column_indices(&SYMPTOMS)?;
            let coercer = self.base.coercer();

            let mut result = Aggregate::map();
            for (symptom, &index) in SYMPTOMS.iter().zip(&indices) {
                for row in &table.data {
                    let label = coercer.to_bool_label(&row.values[index]);
                    result.add_at_path(&[*symptom, label.as_str()], 1);
                }
            }
            Ok(result)
        })
    }
}

impl DataHandler for TestedIndividualsHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::TestedIndividuals
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "tests_results_by_date" => Ok(self.tests_results_by_date(require_arg(method, arg)?)),
            "amount_of_test_indication" => Ok(self.amount_of_test_indication()),
            "amount_of_subjects_ages_60_and_above" => Ok(self.amount_of_subjects_ages_60_and_above()),
            "effects_amount_of_subjects" => Ok(self.effects_amount_of_subjects()),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> TestedIndividualsHandler {
        let payload = json!({"result": {"records": [
            {"_id": 1, "test_date": "2020-11-12", "cough": "0", "fever": "1", "sore_throat": "0",
             "shortness_of_breath": "0", "head_ache": "0", "corona_result": "שלילי",
             "age_60_and_above": "No", "gender": "נקבה", "test_indication": "Other"},
            {"_id": 2, "test_date": "2020-11-12", "cough": "1", "fever": "1", "sore_throat": "0",
             "shortness_of_breath": "0", "head_ache": "0", "corona_result": "שלילי",
             "age_60_and_above": "Yes", "gender": "זכר", "test_indication": "Other"},
            {"_id": 3, "test_date": "2020-11-11", "cough": "0", "fever": "0", "sore_throat": "0",
             "shortness_of_breath": "0", "head_ache": "1", "corona_result": "חיובי",
             "age_60_and_above": null, "gender": "זכר", "test_indication": "Contact with confirmed"}
        ], "total": 3}});
        TestedIndividualsHandler::new(Logger::new("tested_individuals"), &payload, &HandlerOptions::default())
    }

    #[test]
    fn test_results_by_date() {
        let outcome = handler().tests_results_by_date("2020-11-12");
        let data = outcome.data().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.get_path(&["שלילי", "זכר"]), Some(&Aggregate::Int(1)));
        assert_eq!(data.get_path(&["שלילי", "נקבה"]), Some(&Aggregate::Int(1)));
    }

    #[test]
    fn test_effects() {
        let outcome = handler().effects_amount_of_subjects();
        let data = outcome.data().unwrap();
        assert_eq!(data.get_path(&["fever", "True"]), Some(&Aggregate::Int(2)));
        assert_eq!(data.get_path(&["head_ache", "False"]), Some(&Aggregate::Int(2)));
        assert_eq!(data.len(), SYMPTOMS.len());
    }

    #[test]
    fn test_value_counts_keep_null() {
        let outcome = handler().amount_of_subjects_ages_60_and_above();
        assert_eq!(outcome.data().unwrap().get("NULL"), Some(&Aggregate::Int(1)));

        let indications = handler().amount_of_test_indication().to_pairs();
        assert_eq!(indications[0], ("Other".to_string(), Aggregate::Int(2)));
    }
}
