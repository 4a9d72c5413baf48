// Aggregation benchmarks
// Author: Gabriel Demetrios Lafis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use covid19_il::{
    data::{Coercer, Table},
    processing::{column_statistics, grouped_count, value_counts},
    utils::Logger,
};

const GENDERS: [&str; 3] = ["זכר", "נקבה", "לא ידוע"];
const AGE_GROUPS: [&str; 5] = ["0-19", "20-39", "40-59", "60-79", "80+"];

fn synthetic_table(rows: usize) -> Table {
    let records: Vec<_> = (0..rows)
        .map(|i| {
            let tests = if i % 7 == 0 { "<15".to_string() } else { (i % 500).to_string() };
            json!({
                "_id": i,
                "gender": GENDERS[i % GENDERS.len()],
                "age_group": AGE_GROUPS[i % AGE_GROUPS.len()],
                "tests": tests
            })
        })
        .collect();

    Table::from_payload(&json!({"result": {"records": records, "total": rows}})).expect("synthetic payload")
}

fn bench_aggregation(c: &mut Criterion) {
    let table = synthetic_table(10_000);
    let coercer = Coercer::new(Logger::new("bench"), Some(7));

    c.bench_function("grouped_count gender/age_group", |b| {
        b.iter(|| grouped_count(black_box(&table), &["gender", "age_group"], "age_group", true))
    });

    c.bench_function("value_counts age_group", |b| {
        b.iter(|| value_counts(black_box(&table), "age_group", true))
    });

    c.bench_function("column_statistics tests", |b| {
        b.iter(|| column_statistics(black_box(&table), "tests", &coercer))
    });
}

criterion_group!(benches, bench_aggregation);
criterion_main!(benches);
