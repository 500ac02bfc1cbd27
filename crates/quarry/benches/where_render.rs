use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quarry::qb::{Comparison, LogicOperator, ParamList, SqlQb, WhereStatement, select};

/// A tree with `n` levels of three clauses each; the first clause of every
/// level chains one sub-clause.
fn build_tree(n: usize) -> WhereStatement {
    let mut tree = WhereStatement::new();
    for level in 1..=n {
        tree.add_at(format!("col{level}"), Comparison::GreaterThan, level as i64, level)
            .unwrap()
            .add_sub_clause(LogicOperator::Or, Comparison::Equals, -1i64);
        tree.add_at("name", Comparison::Like, "a%", level).unwrap();
        tree.add_at("deleted_at", Comparison::Equals, quarry::Value::Null, level)
            .unwrap();
    }
    tree
}

fn bench_render_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_render/inline");

    for n in [1, 5, 10, 50] {
        let tree = build_tree(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tree, |b, tree| {
            b.iter(|| black_box(tree.render()));
        });
    }

    group.finish();
}

fn bench_render_params(c: &mut Criterion) {
    let mut group = c.benchmark_group("where_render/params");

    for n in [1, 5, 10, 50] {
        let tree = build_tree(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tree, |b, tree| {
            b.iter(|| {
                let mut params = ParamList::new();
                black_box(tree.render_params(&mut params))
            });
        });
    }

    group.finish();
}

fn bench_select_command(c: &mut Criterion) {
    let tree = build_tree(10);
    c.bench_function("where_render/select_command", |b| {
        b.iter(|| {
            let qb = select("users")
                .columns(&["id", "name"])
                .filter("active", Comparison::Equals, true)
                .and_filter(&tree)
                .group_by(&["id", "name"])
                .having("count(1)", Comparison::GreaterThan, 1i32);
            black_box(qb.build_command())
        });
    });
}

criterion_group!(
    benches,
    bench_render_inline,
    bench_render_params,
    bench_select_command
);
criterion_main!(benches);
