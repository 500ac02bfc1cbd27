use quarry::qb::{self, Comparison, Dialect, LogicOperator, SqlQb, WhereStatement};
use quarry::{ExecutionContext, Literal, Value};

#[test]
fn postgres_commands_number_placeholders_across_clauses() {
    let qb = qb::select("orders")
        .with_dialect(Dialect::Postgres)
        .columns(&["customer_id", "count(1)"])
        .filter("status", Comparison::In, Value::list(["open", "held"]))
        .group_by(&["customer_id"])
        .having("count(1)", Comparison::GreaterThan, 3i32);

    let command = qb.build_command().unwrap();
    assert_eq!(
        command.sql,
        "SELECT customer_id, count(1) FROM orders WHERE (status IN ($1, $2)) \
         GROUP BY customer_id HAVING (count(1) > $3)"
    );
    let values: Vec<&Value> = command.params.iter().map(|p| &p.value).collect();
    assert_eq!(
        values,
        [&Value::from("open"), &Value::from("held"), &Value::I32(3)]
    );
}

#[test]
fn inline_and_parameterized_renders_agree_on_layout() {
    let mut tree = WhereStatement::new();
    tree.add("age", Comparison::LessThan, 15i32)
        .unwrap()
        .add_sub_clause(LogicOperator::Or, Comparison::GreaterOrEquals, 65i32);
    tree.add_at("name", Comparison::Like, "J%", 2).unwrap();

    assert_eq!(
        tree.render().unwrap(),
        "(age < 15 OR age >= 65)  OR (name LIKE 'J%')"
    );

    let mut params = quarry::qb::ParamList::new();
    assert_eq!(
        tree.render_params(&mut params).unwrap(),
        "(age < @p1_age OR age >= @p2_age)  OR (name LIKE @p3_name)"
    );
    assert_eq!(params.len(), 3);
}

#[test]
fn combined_trees_distribute_over_levels() {
    let mut base = WhereStatement::new();
    base.add("a", Comparison::Equals, 1i32).unwrap();
    base.add_at("b", Comparison::Equals, 2i32, 2).unwrap();

    let mut other = WhereStatement::new();
    other.add("c", Comparison::Equals, 3i32).unwrap();

    let combined = WhereStatement::combine(&base, &other);
    assert_eq!(
        combined.render().unwrap(),
        "((a = 1) AND (c = 3))  OR ((b = 2) AND (c = 3))"
    );
}

#[test]
fn update_binds_set_values_before_where_values() {
    let qb = qb::update("users")
        .with_dialect(Dialect::Postgres)
        .set("name", "alice")
        .set("updated_at", Literal::new("now()"))
        .filter("id", Comparison::Equals, 7i64);
    let command = qb.build_command().unwrap();
    assert_eq!(
        command.sql,
        "UPDATE users SET name = $1, updated_at = now() WHERE (id = $2)"
    );
    assert_eq!(command.params.len(), 2);
}

#[test]
fn construction_errors_surface_at_build_and_are_recorded() {
    let qb = qb::select("users").filter_at("id", Comparison::Equals, 1i32, 2);
    let mut ctx = ExecutionContext::new();
    let err = qb.build_command_with(&mut ctx).unwrap_err();
    assert!(err.is_construction());
    assert_eq!(ctx.event().errors.len(), 1);

    let err = qb::delete("users").build_query().unwrap_err();
    assert!(err.to_string().contains("enable_clear"));
}
