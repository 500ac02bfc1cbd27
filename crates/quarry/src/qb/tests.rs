//! Builder tests for the qb module.

use crate::context::ExecutionContext;
use crate::error::QuarryError;
use crate::qb::{
    Clause, Comparison, Dialect, JoinType, LogicOperator, SqlQb, Sorting, WhereStatement,
    delete, insert, select, update,
};
use crate::value::{Literal, Value};

#[test]
fn test_select_single_table_star() {
    let sql = select("users").build_query().unwrap();
    assert_eq!(sql, "SELECT users.* FROM users");
}

#[test]
fn test_select_multiple_tables_plain_star() {
    let sql = select("").from_tables(&["users", "orders"]).build_query().unwrap();
    assert_eq!(sql, "SELECT * FROM users, orders");
}

#[test]
fn test_select_top_and_columns() {
    let sql = select("users")
        .top(10)
        .columns(&["id", "name"])
        .order_by("name", Sorting::Ascending)
        .order_by("id", Sorting::Descending)
        .build_query()
        .unwrap();
    assert_eq!(sql, "SELECT TOP 10 id, name FROM users ORDER BY name ASC, id DESC");

    let sql = select("users").top_percent(5).count().build_query().unwrap();
    assert_eq!(sql, "SELECT TOP 5 PERCENT count(1) FROM users");

    let sql = select("users").top_percent(100).build_query().unwrap();
    assert_eq!(sql, "SELECT users.* FROM users");
}

#[test]
fn test_select_postgres_uses_limit() {
    let qb = select("users").with_dialect(Dialect::Postgres).top(3);
    assert_eq!(qb.build_query().unwrap(), "SELECT users.* FROM users LIMIT 3");

    let qb = select("users").with_dialect(Dialect::Postgres).top_percent(3);
    assert!(matches!(qb.build_query(), Err(QuarryError::Build(_))));
}

#[test]
fn test_select_join_is_never_parameterized() {
    let qb = select("users")
        .columns(&["users.name", "orders.total"])
        .join(JoinType::Inner, "orders", "user_id", Comparison::Equals, "users", "id")
        .filter("orders.total", Comparison::GreaterThan, 100i32);

    let command = qb.build_command().unwrap();
    assert_eq!(
        command.sql,
        "SELECT users.name, orders.total FROM users \
         INNER JOIN orders ON users.id = orders.user_id \
         WHERE (orders.total > @p1_orders_total)"
    );
    assert_eq!(command.params.len(), 1);
}

#[test]
fn test_select_where_and_having_share_counter() {
    let qb = select("orders")
        .columns(&["user_id", "count(1)"])
        .filter("status", Comparison::Equals, "paid")
        .group_by(&["user_id"])
        .having("count(1)", Comparison::GreaterThan, 5i32);

    let command = qb.build_command().unwrap();
    assert_eq!(
        command.sql,
        "SELECT user_id, count(1) FROM orders WHERE (status = @p1_status) \
         GROUP BY user_id HAVING (count(1) > @p2_count_1_)"
    );
    let names: Vec<&str> = command.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["@p1_status", "@p2_count_1_"]);

    assert_eq!(
        qb.build_query().unwrap(),
        "SELECT user_id, count(1) FROM orders WHERE (status = 'paid') \
         GROUP BY user_id HAVING (count(1) > 5)"
    );
}

#[test]
fn test_select_having_without_group_by_fails() {
    let qb = select("orders").having("count(1)", Comparison::GreaterThan, 5i32);
    let err = qb.build_query().unwrap_err();
    assert!(err.is_construction());
}

#[test]
fn test_select_sub_clause_chaining() {
    let mut qb = select("users");
    qb.where_tree_mut()
        .add("age", Comparison::LessThan, 15i32)
        .unwrap()
        .add_sub_clause(LogicOperator::Or, Comparison::GreaterOrEquals, 65i32);
    let sql = qb.build_query().unwrap();
    assert_eq!(sql, "SELECT users.* FROM users WHERE (age < 15 OR age >= 65)");
}

#[test]
fn test_builder_defers_construction_errors() {
    let qb = select("users")
        .filter("", Comparison::Equals, 1i32)
        .filter("age", Comparison::Equals, 2i32);
    assert!(matches!(qb.build_query(), Err(QuarryError::EmptyFieldName)));

    let qb = update("users")
        .set("name", "x")
        .filter_at("age", Comparison::Equals, 2i32, 3);
    assert!(matches!(
        qb.build_command(),
        Err(QuarryError::LevelGap { level: 3, existing: 0 })
    ));
}

#[test]
fn test_and_filter_combines_trees() {
    let mut tenant = WhereStatement::new();
    tenant.add("tenant_id", Comparison::Equals, 7i32).unwrap();

    let sql = select("users")
        .filter("role", Comparison::Equals, "admin")
        .filter_at("role", Comparison::Equals, "owner", 2)
        .and_filter(&tenant)
        .build_query()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT users.* FROM users WHERE ((role = 'admin') AND (tenant_id = 7))  \
         OR ((role = 'owner') AND (tenant_id = 7))"
    );
}

#[test]
fn test_filter_clause_with_literal_value() {
    let clause = Clause::new("created_at", Comparison::LessThan, Literal::new("GETDATE()")).unwrap();
    let command = delete("sessions").filter_clause(clause, 1).build_command().unwrap();
    assert_eq!(command.sql, "DELETE FROM sessions WHERE (created_at < GETDATE())");
    assert!(command.params.is_empty());
}

#[test]
fn test_insert_basic() {
    let qb = insert("users").set("name", "alice").set("age", 30i32);
    assert_eq!(
        qb.build_query().unwrap(),
        "INSERT INTO users (name, age) VALUES ('alice', 30)"
    );
    assert_eq!(
        qb.build_command().unwrap().sql,
        "INSERT INTO users (name, age) VALUES (@p1_name, @p2_age)"
    );
}

#[test]
fn test_insert_set_overwrites_case_insensitively() {
    let qb = insert("users").set("Name", "alice").set("NAME", "bob");
    assert_eq!(qb.fields().len(), 1);
    assert_eq!(qb.fields()[0].1, Value::from("bob"));
}

#[test]
fn test_insert_null_and_literal_are_inlined() {
    let command = insert("users")
        .set("name", "alice")
        .set("deleted_at", Value::Null)
        .set("created_at", Literal::new("GETDATE()"))
        .build_command()
        .unwrap();
    assert_eq!(
        command.sql,
        "INSERT INTO users (name, deleted_at, created_at) VALUES (@p1_name, NULL, GETDATE())"
    );
    assert_eq!(command.params.len(), 1);
}

#[test]
fn test_insert_identity_select_follows_dialect() {
    let base = insert("users").set("name", "alice").select_identity(true);
    assert!(base.build_query().unwrap().ends_with("; SELECT @@IDENTITY"));

    let sql = base.clone().with_dialect(Dialect::SqlServer).build_query().unwrap();
    assert!(sql.ends_with("; SELECT SCOPE_IDENTITY()"));

    let command = base.with_dialect(Dialect::Postgres).build_command().unwrap();
    assert_eq!(command.sql, "INSERT INTO users (name) VALUES ($1); SELECT lastval()");
}

#[test]
fn test_insert_errors() {
    assert!(matches!(insert("").set("a", 1i32).build_query(), Err(QuarryError::Build(_))));
    let err = insert("users").build_query().unwrap_err();
    assert_eq!(err.to_string(), "Build error: No fields set to insert");
}

#[test]
fn test_update_basic() {
    let qb = update("users")
        .set("status", "inactive")
        .filter("id", Comparison::Equals, 1i64);
    assert_eq!(
        qb.build_query().unwrap(),
        "UPDATE users SET status = 'inactive' WHERE (id = 1)"
    );
    let command = qb.build_command().unwrap();
    assert_eq!(command.sql, "UPDATE users SET status = @p1_status WHERE (id = @p2_id)");
    assert_eq!(command.params.get("@p2_id"), Some(&Value::I64(1)));
}

#[test]
fn test_update_requires_fields() {
    let err = update("users")
        .filter("id", Comparison::Equals, 1i64)
        .build_query()
        .unwrap_err();
    assert_eq!(err.to_string(), "Build error: Nothing to update");
}

#[test]
fn test_delete_requires_where_unless_clear_enabled() {
    assert!(matches!(delete("users").build_query(), Err(QuarryError::Build(_))));
    assert_eq!(
        delete("users").enable_clear(true).build_query().unwrap(),
        "DELETE FROM users"
    );
}

#[test]
fn test_and_filter_on_unfiltered_delete_is_still_guarded() {
    let mut tenant = WhereStatement::new();
    tenant.add("tenant_id", Comparison::Equals, 7i32).unwrap();

    let qb = delete("users").and_filter(&tenant);
    assert_eq!(qb.where_tree().clause_levels(), 0);
    assert!(matches!(qb.build_query(), Err(QuarryError::Build(_))));
}

#[test]
fn test_delete_sql_server_brackets() {
    let sql = delete("dbo.users")
        .with_dialect(Dialect::SqlServer)
        .filter("id", Comparison::In, Value::list([1i32, 2]))
        .build_query()
        .unwrap();
    assert_eq!(sql, "DELETE FROM [dbo].[users] WHERE (id IN (1, 2))");
}

#[test]
fn test_build_command_with_records_timing_and_errors() {
    let mut ctx = ExecutionContext::new();
    let command = delete("users")
        .filter("id", Comparison::Equals, 1i32)
        .build_command_with(&mut ctx)
        .unwrap();
    assert_eq!(command.params.len(), 1);
    assert!(ctx.event().errors.is_empty());

    let result = delete("users").build_command_with(&mut ctx);
    assert!(result.is_err());
    assert_eq!(ctx.event().errors.len(), 1);
}
