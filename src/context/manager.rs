use crate::context::DataContext;
use crate::core::{Criteria, OrmError, Record, Result, Value};
use crate::schema::EntityMetadata;
use tracing::debug;

/// Entity-level persistence operations against one context.
///
/// Instances are cheap handles; `DataContext::manager()` and the transaction
/// scope both hand these out.
#[derive(Clone)]
pub struct EntityManager {
    ctx: DataContext,
}

impl EntityManager {
    pub(crate) fn new(ctx: DataContext) -> Self {
        Self { ctx }
    }

    /// A fresh record for the entity with every field set to Null.
    pub async fn create(&self, entity: &str) -> Result<Record> {
        let metadata = self.metadata(entity).await?;
        Ok(metadata.default_record())
    }

    /// Inserts the record when its identity field is absent or Null, updates
    /// the existing row otherwise. Returns the record with the identity set.
    pub async fn save(&self, entity: &str, mut record: Record) -> Result<Record> {
        let metadata = self.metadata(entity).await?;
        let id_column = metadata.primary_column().name.clone();

        match record.get(&id_column) {
            None | Some(Value::Null) => {
                record.remove(&id_column);
                let id = self
                    .ctx
                    .inner()
                    .engine
                    .insert(&metadata.table_name, record.clone())
                    .await?;
                record.insert(id_column, Value::Integer(id));
                debug!(entity, id, "inserted record");
                Ok(record)
            }
            Some(Value::Integer(id)) => {
                let id = *id;
                self.ctx
                    .inner()
                    .engine
                    .update(&metadata.table_name, id, record.clone())
                    .await?;
                debug!(entity, id, "updated record");
                Ok(record)
            }
            Some(other) => Err(OrmError::TypeMismatch(format!(
                "identity field '{}' of entity '{}' must be an INTEGER, got {}",
                id_column,
                entity,
                other.type_name()
            ))),
        }
    }

    /// All records of the entity, filtered by criteria when given.
    pub async fn find(&self, entity: &str, criteria: Option<&Criteria>) -> Result<Vec<Record>> {
        let metadata = self.metadata(entity).await?;
        self.ctx
            .inner()
            .engine
            .scan(&metadata.table_name, criteria)
            .await
    }

    /// The first record matching the criteria, if any.
    pub async fn find_one(&self, entity: &str, criteria: &Criteria) -> Result<Option<Record>> {
        Ok(self.find(entity, Some(criteria)).await?.into_iter().next())
    }

    async fn metadata(&self, entity: &str) -> Result<EntityMetadata> {
        self.ctx.ensure_initialized().await?;
        self.ctx.metadata(entity).await
    }
}
