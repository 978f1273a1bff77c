/// Monthly log demo
///
/// Defines a "monthly log" record type at runtime (one table per calendar
/// period), registers it against a live context, and walks through the basic
/// persistence operations: save, find, a transactional read-modify-write, and
/// parameterized select/update through the query builder.
///
/// Run with: cargo run --example monthly_log
use anyhow::{Context as _, Result};
use dynorm::core::record_to_json;
use dynorm::prelude::*;

/// Builds the descriptor for one calendar period. `period` must be `YYYYMM`.
fn monthly_log(period: &str) -> Result<EntityDescriptor> {
    Ok(EntityDescriptor::monthly("log", period)?
        .column_not_null("content", DataType::Text)
        .self_managing()
        .build())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let ctx = DataContext::new(
        ContextConfig::new("root", "root")
            .host("localhost")
            .port(3306)
            .database("test")
            .synchronize(true),
    );
    ctx.initialize().await?;

    // Define and register this month's log type at runtime.
    let log = monthly_log("202104")?;
    let entity = log.entity_name().to_string();
    register_entities(&ctx, log).await?;

    // Create table if needed
    ctx.synchronize().await?;

    // save log1
    let manager = ctx.manager();
    let mut entry = manager.create(&entity).await?;
    entry.insert("content".into(), Value::text("content 1"));
    manager.save(&entity, entry).await?;

    // find all
    let logs = manager.find(&entity, None).await?;
    for log in &logs {
        println!("log: {}", record_to_json(log));
    }

    // use transaction
    ctx.transaction(|manager| {
        let entity = entity.clone();
        async move {
            let mut entry = manager
                .find_one(&entity, &Criteria::by_id(1))
                .await?
                .ok_or(OrmError::RowNotFound(1, entity.clone()))?;
            println!("log1: {entry:?}");

            entry.insert("content".into(), Value::text("content 1.1"));
            manager.save(&entity, entry).await?;
            Ok(())
        }
    })
    .await?;

    // save log2 through the active-record handle
    let bound = ctx
        .bound(&entity)
        .await
        .context("entity should be bound after registration")?;
    let mut entry2 = bound.new_record().await?;
    entry2.insert("content".into(), Value::text("content 2"));
    bound.save(entry2).await?;

    // use query builder (select)
    let log2 = ctx
        .create_query_builder()
        .select(&entity)
        .where_clause("id = :id")
        .param("id", 2)
        .fetch()
        .await?;
    println!("log2: {log2:?}");

    // use query builder (update)
    ctx.create_query_builder()
        .update(&entity)
        .set("content", "content 2.1")
        .where_clause("id = :id")
        .param("id", 2)
        .execute()
        .await?;

    let updated = bound.find_one(&Criteria::by_id(2)).await?;
    println!("log2 after update: {updated:?}");

    ctx.shutdown().await;
    Ok(())
}
