//! Dynamic schema registrar.
//!
//! Extends a live context's metadata registry with descriptors that were not
//! known when the context was built. Added entities resolve and validate
//! through exactly the machinery the context uses at initialization, so
//! downstream operations cannot distinguish them from configured ones.

use crate::context::DataContext;
use crate::core::{OrmError, Result};
use crate::schema::{EntityDescriptor, EntityList};
use std::collections::HashSet;
use tracing::info;

/// Registers new entity descriptors with an initialized context.
///
/// Accepts a single descriptor, a batch, or nested batches; the input is
/// flattened into one ordered sequence first. Registration is all-or-nothing:
/// the batch is resolved and validated in full before the registry is touched,
/// so a failing call leaves the registry unchanged.
///
/// Errors: [`OrmError::DuplicateSchema`] when an identity is already
/// registered (or repeated within the batch), [`OrmError::Resolution`] for a
/// malformed descriptor, [`OrmError::SchemaValidation`] when a structural
/// invariant is violated.
pub async fn register_entities(ctx: &DataContext, entities: impl Into<EntityList>) -> Result<()> {
    ctx.ensure_initialized().await?;
    apply_batch(ctx, entities.into().flatten()).await
}

/// Shared registration pipeline: resolve, check duplicates, validate, append,
/// bind. Context initialization routes its configured descriptors through
/// here as well.
pub(crate) async fn apply_batch(
    ctx: &DataContext,
    descriptors: Vec<EntityDescriptor>,
) -> Result<()> {
    let inner = ctx.inner();
    let batch = inner.builder.build_many(&descriptors)?;

    let mut registry = inner.registry.write().await;

    let mut seen: HashSet<&str> = HashSet::new();
    for metadata in &batch {
        if registry.has(&metadata.entity_name) || !seen.insert(&metadata.entity_name) {
            return Err(OrmError::DuplicateSchema(metadata.entity_name.clone()));
        }
    }

    // Relation targets may live in the registry or in this batch.
    inner
        .validator
        .validate_many(&batch, registry.entries().iter().chain(batch.iter()))?;

    {
        let mut bound = inner.bound.write().await;
        for metadata in &batch {
            if metadata.self_managing {
                bound.insert(metadata.entity_name.clone());
            }
        }
    }
    for metadata in &batch {
        registry.push(metadata.clone())?;
        info!(entity = %metadata.entity_name, "registered entity");
    }
    drop(registry);

    // A context configured with automatic synchronization keeps storage in
    // step as types arrive; otherwise the caller synchronizes explicitly.
    if inner.config.synchronize {
        for metadata in &batch {
            inner.engine.sync_table(metadata).await?;
        }
    }
    Ok(())
}
