use crate::context::DataContext;
use crate::core::{Criteria, Record, Result};

/// Active-record handle for a self-managing entity.
///
/// Handed out by [`DataContext::bound`] once the registrar has bound the
/// entity to its owning context. The handle carries the context reference, so
/// persistence operations can be invoked on the type itself.
#[derive(Clone)]
pub struct BoundEntity {
    ctx: DataContext,
    entity: String,
}

impl BoundEntity {
    pub(crate) fn new(ctx: DataContext, entity: &str) -> Self {
        Self {
            ctx,
            entity: entity.to_string(),
        }
    }

    pub fn entity_name(&self) -> &str {
        &self.entity
    }

    pub async fn new_record(&self) -> Result<Record> {
        self.ctx.manager().create(&self.entity).await
    }

    pub async fn save(&self, record: Record) -> Result<Record> {
        self.ctx.manager().save(&self.entity, record).await
    }

    pub async fn find(&self, criteria: Option<&Criteria>) -> Result<Vec<Record>> {
        self.ctx.manager().find(&self.entity, criteria).await
    }

    pub async fn find_one(&self, criteria: &Criteria) -> Result<Option<Record>> {
        self.ctx.manager().find_one(&self.entity, criteria).await
    }
}
