// Area dataset handler: per-town events and accumulations
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

use crate::api::ResourceId;
use crate::data::UnknownPolicy;
use crate::processing::{Aggregate, Outcome};
use crate::utils::Logger;
use super::{bool_arg, invalid_arg, require_arg, unknown_method, DataHandler, HandlerBase, HandlerOptions, QueryError};

const TOWN: &str = "town";
const AGAS_CODE: &str = "agas_code";
const ACCUMULATED_TESTED: &str = "accumulated_tested";
const ACCUMULATED_HOSPITALIZED: &str = "accumulated_hospitalized";
const ACCUMULATED_RECOVERIES: &str = "accumulated_recoveries";

const METHODS: &[&str] = &[
    "data_by_event_type",
    "accumulated_tested_by_town",
    "hospitalized_amount",
    "accumulated_recoveries_amount",
];

/// Daily event columns of the area dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AreaEvent {
    NewTested,
    NewCases,
    NewRecoveries,
    NewHospitalized,
    NewDeaths,
}

impl AreaEvent {
    pub const ALL: [AreaEvent; 5] = [
        AreaEvent::NewTested,
        AreaEvent::NewCases,
        AreaEvent::NewRecoveries,
        AreaEvent::NewHospitalized,
        AreaEvent::NewDeaths,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            AreaEvent::NewTested => "new_tested_on_date",
            AreaEvent::NewCases => "new_cases_on_date",
            AreaEvent::NewRecoveries => "new_recoveries_on_date",
            AreaEvent::NewHospitalized => "new_hospitalized_on_date",
            AreaEvent::NewDeaths => "new_deaths_on_date",
        }
    }

    /// Parse a column name or its short form (`tested`, `cases`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        AreaEvent::ALL.into_iter().find(|event| {
            let column = event.column();
            column == name || column.trim_start_matches("new_").trim_end_matches("_on_date") == name
        })
    }
}

pub struct AreaHandler {
    base: HandlerBase,
}

impl AreaHandler {
    pub fn new(logger: Logger, payload: &JsonValue, options: &HandlerOptions) -> Self {
        AreaHandler {
            base: HandlerBase::new(logger, payload, options),
        }
    }

    /// Names accepted by the dynamic query entry point
    pub fn method_names() -> &'static [&'static str] {
        METHODS
    }

    /// `{town: {agas_code: value}}` of an event column; a missing agas code becomes 0
    pub fn data_by_event_type(&self, event: AreaEvent) -> Outcome {
        let column = event.column();
        self.base.query("data_by_event_type", &[column], |table| {
            let table = table.coerce_columns(&[AGAS_CODE], self.base.coercer(), UnknownPolicy::ZeroOnUnknown)?;
            let groups = table.group_by(&[TOWN, AGAS_CODE])?;

            let mut result = Aggregate::map();
            for (key, values) in groups.unique_values(column)? {
                if let Some(first) = values.first() {
                    result.insert_path(&key, Aggregate::from_value(first));
                }
            }
            Ok(result)
        })
    }

    pub fn accumulated_tested_by_town(&self, ascending: bool) -> Outcome {
        self.accumulated("accumulated_tested_by_town", ACCUMULATED_TESTED, ascending)
    }

    pub fn hospitalized_amount(&self, ascending: bool) -> Outcome {
        self.accumulated("hospitalized_amount", ACCUMULATED_HOSPITALIZED, ascending)
    }

    pub fn accumulated_recoveries_amount(&self, ascending: bool) -> Outcome {
        self.accumulated("accumulated_recoveries_amount", ACCUMULATED_RECOVERIES, ascending)
    }

    /// `{town: sum of the distinct values of column}`, ordered by that sum
    fn accumulated(&self, method: &str, column: &str, ascending: bool) -> Outcome {
        let ascending_arg = ascending.to_string();
        self.base.query(method, &[ascending_arg.as_str()], |table| {
            let coercer = self.base.coercer();
            let table = table.coerce_columns(&[column], coercer, UnknownPolicy::ZeroOnUnknown)?;
            let groups = table.group_by(&[TOWN])?;

            let mut towns: Vec<(String, i64)> = groups
                .unique_values(column)?
                .into_iter()
                .map(|(key, values)| {
                    let total = values
                        .iter()
                        .map(|v| coercer.to_int(v, UnknownPolicy::ZeroOnUnknown))
                        .fold(0i64, i64::saturating_add);
                    (key.concat(), total)
                })
                .collect();

            towns.sort_by(|a, b| if ascending { a.1.cmp(&b.1) } else { b.1.cmp(&a.1) });
            Ok(towns.into_iter().map(|(town, n)| (town, Aggregate::Int(n))).collect())
        })
    }
}

impl DataHandler for AreaHandler {
    fn base(&self) -> &HandlerBase {
        &self.base
    }

    fn resource_id(&self) -> ResourceId {
        ResourceId::Area
    }

    fn methods(&self) -> &'static [&'static str] {
        METHODS
    }

    fn query(&self, method: &str, arg: Option<&str>) -> Result<Outcome, QueryError> {
        match method {
            "data_by_event_type" => {
                let name = require_arg(method, arg)?;
                let event = AreaEvent::from_name(name).ok_or_else(|| invalid_arg(method, name))?;
                Ok(self.data_by_event_type(event))
            }
            "accumulated_tested_by_town" => Ok(self.accumulated_tested_by_town(bool_arg(method, arg, true)?)),
            "hospitalized_amount" => Ok(self.hospitalized_amount(bool_arg(method, arg, true)?)),
            "accumulated_recoveries_amount" => Ok(self.accumulated_recoveries_amount(bool_arg(method, arg, true)?)),
            _ => Err(unknown_method(self.resource_id(), method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> AreaHandler {
        let payload = json!({"result": {"records": [
            {"_id": 1, "town": "אופקים", "agas_code": "2", "accumulated_tested": "3261",
             "new_cases_on_date": "<15"},
            {"_id": 2, "town": "מזכרת בתיה", "agas_code": null, "accumulated_tested": "395025",
             "new_cases_on_date": "20"},
            {"_id": 3, "town": "ראש פינה", "agas_code": "1", "accumulated_tested": "38937",
             "new_cases_on_date": "0"}
        ], "total": 3}});
        AreaHandler::new(Logger::new("area"), &payload, &HandlerOptions::default())
    }

    fn values(outcome: &Outcome) -> Vec<i64> {
        outcome
            .to_pairs()
            .into_iter()
            .filter_map(|(_, v)| v.as_i64())
            .collect()
    }

    #[test]
    fn test_accumulated_sum_saturates() {
        let payload = json!({"result": {"records": [
            {"_id": 1, "town": "עכו", "accumulated_hospitalized": "9223372036854775807"},
            {"_id": 2, "town": "עכו", "accumulated_hospitalized": "1"}
        ], "total": 2}});
        let handler = AreaHandler::new(Logger::new("area"), &payload, &HandlerOptions::default());
        assert_eq!(values(&handler.hospitalized_amount(true)), vec![i64::MAX]);
    }

    #[test]
    fn test_accumulated_tested_order() {
        let handler = handler();
        assert_eq!(values(&handler.accumulated_tested_by_town(true)), vec![3261, 38937, 395025]);
        assert_eq!(values(&handler.accumulated_tested_by_town(false)), vec![395025, 38937, 3261]);
    }

    #[test]
    fn test_data_by_event_type() {
        let outcome = handler().data_by_event_type(AreaEvent::NewCases);
        let data = outcome.data().unwrap();
        assert_eq!(data.get_path(&["מזכרת בתיה", "0"]), Some(&Aggregate::from("20")));
        assert_eq!(data.get_path(&["אופקים", "2"]), Some(&Aggregate::from("<15")));
    }

    #[test]
    fn test_missing_column_is_no_data() {
        assert!(handler().hospitalized_amount(true).is_no_data());
    }

    #[test]
    fn test_dispatch() {
        let handler = handler();
        assert_eq!(AreaEvent::from_name("deaths"), Some(AreaEvent::NewDeaths));
        assert!(handler.query("data_by_event_type", Some("cases")).is_ok());
        assert!(matches!(
            handler.query("data_by_event_type", Some("weather")),
            Err(QueryError::InvalidArgument { .. })
        ));
        assert!(matches!(handler.query("nope", None), Err(QueryError::UnknownMethod { .. })));
    }
}
