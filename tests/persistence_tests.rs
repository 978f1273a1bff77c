/// Persistence operation tests
///
/// Save/find/find_one round trips through the entity manager.
/// Run with: cargo test --test persistence_tests
use dynorm::prelude::*;

async fn ctx_with_log() -> DataContext {
    let ctx = DataContext::new(ContextConfig::new("root", "root").synchronize(true));
    ctx.initialize().await.unwrap();
    let log = EntityDescriptor::builder("log_202104")
        .column_not_null("content", DataType::Text)
        .build();
    register_entities(&ctx, log).await.unwrap();
    ctx
}

#[tokio::test]
async fn save_then_find_round_trips() {
    let ctx = ctx_with_log().await;
    let manager = ctx.manager();

    let mut entry = manager.create("log_202104").await.unwrap();
    entry.insert("content".into(), Value::text("content 1"));
    let saved = manager.save("log_202104", entry).await.unwrap();
    assert_eq!(saved.get("id"), Some(&Value::Integer(1)));

    let all = manager.find("log_202104", None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("id"), Some(&Value::Integer(1)));
    assert_eq!(all[0].get("content"), Some(&Value::text("content 1")));
}

#[tokio::test]
async fn save_with_identity_updates_in_place() {
    let ctx = ctx_with_log().await;
    let manager = ctx.manager();

    let mut entry = manager.create("log_202104").await.unwrap();
    entry.insert("content".into(), Value::text("before"));
    let mut saved = manager.save("log_202104", entry).await.unwrap();

    saved.insert("content".into(), Value::text("after"));
    manager.save("log_202104", saved).await.unwrap();

    let all = manager.find("log_202104", None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("content"), Some(&Value::text("after")));
}

#[tokio::test]
async fn find_one_filters_by_criteria() {
    let ctx = ctx_with_log().await;
    let manager = ctx.manager();

    for content in ["one", "two"] {
        let mut entry = manager.create("log_202104").await.unwrap();
        entry.insert("content".into(), Value::text(content));
        manager.save("log_202104", entry).await.unwrap();
    }

    let hit = manager
        .find_one("log_202104", &Criteria::new().eq("content", "two"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.get("id"), Some(&Value::Integer(2)));

    let miss = manager
        .find_one("log_202104", &Criteria::by_id(99))
        .await
        .unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn generated_identities_are_sequential() {
    let ctx = ctx_with_log().await;
    let manager = ctx.manager();

    for i in 1..=3 {
        let mut entry = manager.create("log_202104").await.unwrap();
        entry.insert("content".into(), Value::text(format!("content {i}")));
        let saved = manager.save("log_202104", entry).await.unwrap();
        assert_eq!(saved.get("id"), Some(&Value::Integer(i)));
    }
}

#[tokio::test]
async fn saving_an_unregistered_entity_fails() {
    let ctx = ctx_with_log().await;
    let err = ctx
        .manager()
        .save("nowhere", Record::new())
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::EntityNotFound(_)));
}

#[tokio::test]
async fn null_in_non_null_column_is_rejected() {
    let ctx = ctx_with_log().await;
    // create() leaves content Null and the column is NOT NULL
    let entry = ctx.manager().create("log_202104").await.unwrap();
    let err = ctx.manager().save("log_202104", entry).await.unwrap_err();
    assert!(matches!(err, OrmError::ConstraintViolation(_)));
}

#[tokio::test]
async fn operations_before_initialize_fail() {
    let ctx = DataContext::new(ContextConfig::new("root", "root"));
    let err = ctx.manager().find("log", None).await.unwrap_err();
    assert!(matches!(err, OrmError::NotInitialized));
}

#[tokio::test]
async fn operations_after_shutdown_fail() {
    let ctx = ctx_with_log().await;
    ctx.shutdown().await;
    let err = ctx.manager().find("log_202104", None).await.unwrap_err();
    assert!(matches!(err, OrmError::NotInitialized));
}

#[tokio::test]
async fn initialize_twice_fails() {
    let ctx = ctx_with_log().await;
    let err = ctx.initialize().await.unwrap_err();
    assert!(matches!(err, OrmError::AlreadyInitialized));
}
