// Dataset handler tests
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use covid19_il::{
    api::ResourceId,
    data::{Coercer, Table, UnknownPolicy},
    handlers::{DataHandler, DatasetHandler, HandlerOptions, HandlerRegistry, QueryError},
    processing::{
        column_statistics, grouped_count, value_counts, Aggregate, CleanCopyTransform, DataProcessor,
        FilterProcessor, LimitTransform, Outcome, Pipeline, SelectTransform,
    },
    utils::{Logger, ValidationError},
};

fn payload(records: Vec<JsonValue>) -> JsonValue {
    let total = records.len();
    json!({"result": {"records": records, "total": total}})
}

fn handler(resource: ResourceId, payload: &JsonValue) -> DatasetHandler {
    DatasetHandler::new(resource, Logger::new("tests"), payload, &HandlerOptions::default())
}

fn lab_tests_payload() -> JsonValue {
    let results = [
        ("שלילי", 1409),
        ("חיובי", 117),
        ("בעבודה", 20),
        ("לא בוצע/פסול 999", 3),
        ("לא ודאי ישן", 1),
    ];

    let mut records = Vec::new();
    let mut id = 0;
    // interleave the labels so the order of the result comes from the counts
    for round in 0..1409 {
        for (label, count) in results.iter() {
            if round < *count {
                id += 1;
                let lab_id = if id % 2 == 0 { "1" } else { "2" };
                records.push(json!({
                    "_id": id,
                    "test_date": "2020-10-01",
                    "result_date": "2020-10-02",
                    "corona_result": label,
                    "lab_id": lab_id,
                    "test_for_corona_diagnosis": "1",
                    "is_first_Test": "Yes"
                }));
            }
        }
    }
    payload(records)
}

#[test]
fn test_lab_tests_corona_results() {
    let handler = handler(ResourceId::LabTests, &lab_tests_payload());
    let outcome = handler.query("corona_results", None).unwrap();

    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"שלילי": 1409, "חיובי": 117, "בעבודה": 20, "לא בוצע/פסול 999": 3, "לא ודאי ישן": 1})
    );

    let labels: Vec<String> = outcome.to_pairs().into_iter().map(|(k, _)| k).collect();
    assert_eq!(labels, vec!["שלילי", "חיובי", "בעבודה", "לא בוצע/פסול 999", "לא ודאי ישן"]);
    assert_eq!(handler.total_number(), 1550);
}

#[test]
fn test_area_sort_order() {
    let handler = handler(
        ResourceId::Area,
        &payload(vec![
            json!({"_id": 1, "town": "אופקים", "agas_code": "2", "accumulated_tested": "3261"}),
            json!({"_id": 2, "town": "מזכרת בתיה", "agas_code": "4", "accumulated_tested": "395025"}),
            json!({"_id": 3, "town": "ראש פינה", "agas_code": "1", "accumulated_tested": "38937"}),
        ]),
    );

    let values = |outcome: Outcome| -> Vec<i64> {
        outcome.to_pairs().into_iter().filter_map(|(_, v)| v.as_i64()).collect()
    };

    let ascending = handler.query("accumulated_tested_by_town", Some("true")).unwrap();
    assert_eq!(values(ascending), vec![3261, 38937, 395025]);

    let descending = handler.query("accumulated_tested_by_town", Some("false")).unwrap();
    assert_eq!(values(descending), vec![395025, 38937, 3261]);
}

#[test]
fn test_malformed_date_is_rejected() {
    let handler = handler(
        ResourceId::Hospitalized,
        &payload(vec![json!({"_id": 1, "תאריך": "2020-10-03T00:00:00", "מאושפזים": "1500"})]),
    );

    let err = handler.query("hospitalized_stats_by_date", Some("2020-10-3")).unwrap_err();
    assert_eq!(
        err,
        QueryError::Validation(ValidationError::DateFormat {
            value: "2020-10-3".to_string()
        })
    );

    let outcome = handler.query("hospitalized_stats_by_date", Some("2020-10-03")).unwrap();
    assert_eq!(outcome.data().unwrap().get("מאושפזים"), Some(&Aggregate::from("1500")));
}

#[test]
fn test_registry_returns_same_handler() {
    let registry = HandlerRegistry::new(Logger::new("tests"), HandlerOptions::default());
    let first = registry.get_instance(ResourceId::LabTests, &lab_tests_payload());
    let second = registry.get_instance(ResourceId::LabTests, &payload(vec![]));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.total_number(), 1550);
    assert!(registry.contains(ResourceId::LabTests));
    assert!(!registry.contains(ResourceId::Deaths));
}

#[test]
fn test_clean_copy_is_independent() {
    let handler = handler(ResourceId::LabTests, &lab_tests_payload());
    let before = handler.query("lab_tests_statistics", None).unwrap();

    let mut copy = handler.base().clean_copy().unwrap();
    for row in &mut copy.data {
        row.values.clear();
    }
    copy.data.truncate(1);

    assert_eq!(handler.query("lab_tests_statistics", None).unwrap(), before);
    assert_eq!(handler.base().table().map(Table::len), Some(1550));
}

#[test]
fn test_grouped_count_conserves_rows() {
    let table = Table::from_payload(&lab_tests_payload()).unwrap();
    let counts = grouped_count(&table, &["lab_id", "corona_result"], "corona_result", false).unwrap();

    let total: i64 = counts
        .as_map()
        .unwrap()
        .values()
        .flat_map(|labs| labs.as_map().unwrap().values())
        .filter_map(Aggregate::as_i64)
        .sum();
    assert_eq!(total, table.len() as i64);
}

#[test]
fn test_statistics_are_idempotent() {
    let table = Table::from_payload(&payload(vec![
        json!({"_id": 1, "count": "<15"}),
        json!({"_id": 2, "count": "40"}),
        json!({"_id": 3, "count": null}),
    ]))
    .unwrap();
    let coercer = Coercer::new(Logger::new("tests"), None);

    let first = column_statistics(&table, "count", &coercer).unwrap();
    let second = column_statistics(&table, "count", &coercer).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.sum, 40);
    assert_eq!(first.count, 3);

    let coerced = table
        .coerce_columns(&["count"], &coercer, UnknownPolicy::RandomSmallOnUnknown)
        .unwrap();
    let stats = column_statistics(&coerced, "count", &coercer).unwrap();
    assert_eq!(stats.max, 40);
    assert!((1..=15).contains(&stats.min));
}

#[test]
fn test_projection_keeps_value_counts() {
    let table = Table::from_payload(&lab_tests_payload()).unwrap();
    let projected = table.project(&["corona_result"]).unwrap();

    assert_eq!(
        value_counts(&projected, "corona_result", true).unwrap(),
        value_counts(&table, "corona_result", true).unwrap()
    );
}

#[test]
fn test_empty_records_give_no_data() {
    for resource in ResourceId::ALL {
        let handler = handler(resource, &payload(vec![]));
        for method in handler.methods() {
            if let Ok(outcome) = handler.query(method, None) {
                assert_eq!(serde_json::to_string(&outcome).unwrap(), "\"No Data\"", "{}.{}", resource, method);
            }
        }
    }
}

#[test]
fn test_pipeline_over_lab_tests() {
    let table = Table::from_payload(&lab_tests_payload()).unwrap();

    let pipeline = Pipeline::new("positives")
        .add(CleanCopyTransform)
        .add(FilterProcessor::equals("corona_result", "חיובי"))
        .add(SelectTransform::new(vec!["lab_id", "corona_result"]))
        .add(LimitTransform::new(100));

    let result = pipeline.execute(&table).unwrap();
    assert_eq!(result.len(), 100);
    assert_eq!(result.column_names(), vec!["lab_id", "corona_result"]);
    assert_eq!(FilterProcessor::equals("corona_result", "חיובי").name(), "equals_corona_result");
}
