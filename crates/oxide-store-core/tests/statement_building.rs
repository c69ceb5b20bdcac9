//! Expression and SELECT building against several dialects.

mod common;
use common::*;

use oxide_store_core::dialect::Vendor;
use oxide_store_core::expr::{ClauseKind, CompileContext, MapBinding, SqlExpression};
use oxide_store_core::statement::{
    MappingKey, NullOrdering, SelectStatement, StatementMappingIndex,
};
use oxide_store_core::CoreError;

#[test]
fn placeholder_count_matches_mapping_width() {
    let profile = profile(Vendor::PostgreSql);
    let ctx = CompileContext::new(&profile, ClauseKind::Where);
    let mut select = SelectStatement::new("ACCOUNT");
    let table = select.table().clone();

    let mut index = StatementMappingIndex::new();
    let email = select
        .select(SqlExpression::column(&table, "EMAIL", "string"))
        .unwrap();
    index.set_columns(MappingKey::Member(1), vec![email]);

    select.where_and(
        SqlExpression::column(&table, "ID", "i64")
            .eq(SqlExpression::parameter(MappingKey::DatastoreId, 0, "i64"), &ctx)
            .unwrap(),
    );
    select.where_and(
        SqlExpression::column(&table, "TENANT_ID", "string")
            .eq(SqlExpression::fixed_parameter(MappingKey::Tenant, "acme"), &ctx)
            .unwrap(),
    );

    let text = select.render(&profile, false);
    index.record_parameters(&text.params);

    assert_eq!(
        text.sql,
        "SELECT A0.email FROM account A0 WHERE A0.id = ? AND A0.tenant_id = ?"
    );
    assert_eq!(text.placeholder_count(), index.param_width());
    let tenant = index.mapping(MappingKey::Tenant).unwrap();
    assert_eq!(tenant.param_occurrences, vec![vec![2]]);
}

#[test]
fn string_literals_with_question_marks_are_not_placeholders() {
    let profile = profile(Vendor::H2);
    let ctx = CompileContext::new(&profile, ClauseKind::Where);
    let mut select = SelectStatement::new("NOTE");
    let table = select.table().clone();
    select.where_and(
        SqlExpression::column(&table, "BODY", "string")
            .eq(SqlExpression::literal("why?"), &ctx)
            .unwrap(),
    );
    let text = select.render(&profile, false);
    assert_eq!(text.placeholder_count(), 0);
    assert!(text.params.is_empty());
}

#[test]
fn map_compared_to_null_uses_is_empty() {
    let profile = profile(Vendor::Oracle);
    let ctx = CompileContext::new(&profile, ClauseKind::Where);
    let mut select = SelectStatement::new("PRODUCT");
    let owner = select.table().clone();
    let tags = SqlExpression::map(MapBinding {
        owner,
        owner_id_column: String::from("ID"),
        join_table: String::from("PRODUCT_TAGS"),
        owner_column: String::from("PRODUCT_ID"),
        key_column: String::from("TAG"),
        value_column: None,
        key_logical_type: String::from("string"),
    });
    select.where_and(tags.eq(SqlExpression::null(), &ctx).unwrap());
    let sql = select.render(&profile, false).sql;
    assert!(!sql.contains("= NULL"));
    assert_eq!(
        sql,
        "SELECT 1 FROM PRODUCT A0 WHERE NOT EXISTS (SELECT 1 FROM PRODUCT_TAGS A0M WHERE A0M.PRODUCT_ID = A0.ID)"
    );
}

#[test]
fn aggregate_in_where_becomes_subquery() {
    let profile = profile(Vendor::MySql);
    let where_ctx = CompileContext::new(&profile, ClauseKind::Where);
    let mut select = SelectStatement::new("ORDERS");
    let table = select.table().clone();
    let amount = SqlExpression::column(&table, "AMOUNT", "decimal");
    let average = SqlExpression::invoke_static(&where_ctx, "avg", vec![amount.clone()]).unwrap();
    select.where_and(amount.gt(average, &where_ctx).unwrap());
    assert_eq!(
        select.render(&profile, false).sql,
        "SELECT 1 FROM ORDERS A0 WHERE A0.AMOUNT > (SELECT AVG(A0.AMOUNT) FROM ORDERS A0)"
    );
}

#[test]
fn grouped_projection_with_having() {
    let profile = profile(Vendor::PostgreSql);
    let projection = CompileContext::new(&profile, ClauseKind::Projection);
    let having = projection.with_clause(ClauseKind::Having);
    let mut select = SelectStatement::new("ORDERS");
    let table = select.table().clone();
    let customer = SqlExpression::column(&table, "CUSTOMER_ID", "i64");
    let amount = SqlExpression::column(&table, "AMOUNT", "decimal");

    select.select(customer.clone()).unwrap();
    let total = SqlExpression::invoke_static(&projection, "sum", vec![amount.clone()]).unwrap();
    assert_eq!(select.select(total).unwrap(), 2);
    select.group_by(customer);
    let count = SqlExpression::invoke_static(&having, "count", vec![amount]).unwrap();
    select.having(count.gt(SqlExpression::literal(1), &having).unwrap());
    select.order_by(
        SqlExpression::column(&table, "CUSTOMER_ID", "i64"),
        false,
        Some(NullOrdering::First),
    );

    assert_eq!(
        select.render(&profile, false).sql,
        "SELECT A0.customer_id, SUM(A0.amount) FROM orders A0 GROUP BY A0.customer_id \
         HAVING COUNT(A0.amount) > 1 ORDER BY A0.customer_id NULLS FIRST"
    );
}

#[test]
fn unknown_method_for_receiver() {
    let profile = profile(Vendor::Generic);
    let ctx = CompileContext::new(&profile, ClauseKind::Where);
    let placed = SqlExpression::column(
        &SelectStatement::new("ORDERS").table().clone(),
        "PLACED",
        "timestamp",
    );
    assert!(matches!(
        placed.invoke(&ctx, "toUpperCase", vec![]),
        Err(CoreError::UnknownMethod { .. })
    ));
}
