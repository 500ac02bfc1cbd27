use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quarry::{DataTable, ExecutionContext, Mappable, Value, map, map_scalar};

#[derive(Debug, Default, Mappable)]
struct Order {
    id: i64,
    customer: String,
    total: rust_decimal::Decimal,
    note: Option<String>,
    shipped: bool,
}

/// `n` rows with prefixed column names and a NULL note on every other row.
fn build_table(n: usize) -> DataTable {
    let mut table = DataTable::new(["ord_id", "ord_customer", "ord_total", "ord_note", "shipped"]);
    for i in 0..n {
        let note = if i % 2 == 0 {
            Value::Null
        } else {
            Value::from(format!("note {i}"))
        };
        table
            .push_row(vec![
                Value::I64(i as i64),
                Value::from(format!("customer {i}")),
                Value::from(format!("{i}.50")),
                note,
                Value::Bool(i % 3 == 0),
            ])
            .unwrap();
    }
    table
}

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_mapping/map");

    for n in [1, 100, 1_000, 10_000] {
        let table = build_table(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &table, |b, table| {
            b.iter(|| {
                let mut ctx = ExecutionContext::new().with_table_prefix("ord_");
                black_box(map::<Order, _>(table.reader(), &mut ctx))
            });
        });
    }

    group.finish();
}

fn bench_map_with_conversion(c: &mut Criterion) {
    let table = build_table(1_000);
    c.bench_function("row_mapping/custom_conversion", |b| {
        b.iter(|| {
            let mut ctx = ExecutionContext::new()
                .with_table_prefix("ord_")
                .with_conversion("customer", |raw| Ok(Value::from(raw.to_uppercase())));
            black_box(map::<Order, _>(table.reader(), &mut ctx))
        });
    });
}

fn bench_map_scalar(c: &mut Criterion) {
    let table = build_table(10_000);
    c.bench_function("row_mapping/scalar", |b| {
        b.iter(|| {
            let mut ctx = ExecutionContext::new();
            black_box(map_scalar::<i64, _>(table.reader(), &mut ctx))
        });
    });
}

criterion_group!(
    benches,
    bench_map,
    bench_map_with_conversion,
    bench_map_scalar
);
criterion_main!(benches);
