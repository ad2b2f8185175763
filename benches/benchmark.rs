use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use rowbound::query;
use rowbound::record::Value;
use rowbound::transcode::to_snake;

fn transcode_identifiers(c: &mut Criterion) {
    c.bench_function("to_snake short identifier", |b| {
        b.iter(|| to_snake(black_box("UserID")))
    });
    c.bench_function("to_snake long identifier", |b| {
        b.iter(|| to_snake(black_box("AVeryLongFieldIdentifierWithHTTPInside")))
    });
}

fn assemble_statements(c: &mut Criterion) {
    c.bench_function("insert statement assembly", |b| {
        b.iter(|| {
            let fields = vec![
                ("name", Value::from("prism")),
                ("unit_price", Value::from(9.5)),
                ("in_stock", Value::from(true)),
            ];
            query::insert(black_box("gadget"), fields)
        })
    });
    c.bench_function("select_many statement assembly", |b| {
        let ids: Vec<i64> = (1..=64).collect();
        b.iter(|| query::select_many(black_box("gadget"), &ids))
    });
}

criterion_group!(benches, transcode_identifiers, assemble_statements);
criterion_main!(benches);
