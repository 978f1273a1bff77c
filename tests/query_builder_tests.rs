/// Query builder tests
///
/// Parameterized select and update through the fluent builder.
/// Run with: cargo test --test query_builder_tests
use dynorm::prelude::*;

async fn ctx_with_two_entries() -> DataContext {
    let ctx = DataContext::new(ContextConfig::new("root", "root").synchronize(true));
    ctx.initialize().await.unwrap();
    let log = EntityDescriptor::builder("log_202104")
        .column_not_null("content", DataType::Text)
        .build();
    register_entities(&ctx, log).await.unwrap();

    let manager = ctx.manager();
    for content in ["content 1", "content 2"] {
        let mut entry = manager.create("log_202104").await.unwrap();
        entry.insert("content".into(), Value::text(content));
        manager.save("log_202104", entry).await.unwrap();
    }
    ctx
}

#[tokio::test]
async fn parameterized_select_returns_only_matching_rows() {
    let ctx = ctx_with_two_entries().await;

    let rows = ctx
        .create_query_builder()
        .select("log_202104")
        .where_clause("id = :id")
        .param("id", 2)
        .fetch()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::Integer(2)));
    assert_eq!(rows[0].get("content"), Some(&Value::text("content 2")));
}

#[tokio::test]
async fn select_without_clause_returns_everything() {
    let ctx = ctx_with_two_entries().await;
    let rows = ctx
        .create_query_builder()
        .select("log_202104")
        .fetch()
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn parameterized_update_changes_only_matching_rows() {
    let ctx = ctx_with_two_entries().await;

    let affected = ctx
        .create_query_builder()
        .update("log_202104")
        .set("content", "content 2.1")
        .where_clause("id = :id")
        .param("id", 2)
        .execute()
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let manager = ctx.manager();
    let first = manager
        .find_one("log_202104", &Criteria::by_id(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.get("content"), Some(&Value::text("content 1")));

    let second = manager
        .find_one("log_202104", &Criteria::by_id(2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.get("content"), Some(&Value::text("content 2.1")));
}

#[tokio::test]
async fn update_with_unknown_column_fails() {
    let ctx = ctx_with_two_entries().await;
    let err = ctx
        .create_query_builder()
        .update("log_202104")
        .set("bogus", "x")
        .where_clause("id = :id")
        .param("id", 2)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::ColumnNotFound(_, _)));
}

#[tokio::test]
async fn update_of_identity_column_is_rejected() {
    let ctx = ctx_with_two_entries().await;
    let err = ctx
        .create_query_builder()
        .update("log_202104")
        .set("id", 9)
        .where_clause("id = :id")
        .param("id", 2)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::ConstraintViolation(_)));
}

#[tokio::test]
async fn unbound_parameter_is_a_parse_error() {
    let ctx = ctx_with_two_entries().await;
    let err = ctx
        .create_query_builder()
        .select("log_202104")
        .where_clause("id = :id")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::ParseError(_)));
}

#[tokio::test]
async fn query_against_unregistered_entity_fails() {
    let ctx = ctx_with_two_entries().await;
    let err = ctx
        .create_query_builder()
        .select("nowhere")
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::EntityNotFound(_)));
}
