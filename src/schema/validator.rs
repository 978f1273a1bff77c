use crate::core::{DataType, OrmError, Result};
use crate::schema::metadata::{EntityMetadata, TableType};

/// Cross-entity structural validation.
///
/// The same validator runs over the statically configured entities at context
/// initialization and over each batch the registrar adds later. View entries
/// are skipped; relation targets may point at any entity visible in the given
/// scope (the registry plus the batch under validation).
#[derive(Debug, Default)]
pub struct MetadataValidator;

impl MetadataValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates every non-view entry in `batch` against the visible scope.
    pub fn validate_many<'a>(
        &self,
        batch: &[EntityMetadata],
        scope: impl Iterator<Item = &'a EntityMetadata> + Clone,
    ) -> Result<()> {
        for metadata in batch.iter().filter(|m| m.table_type != TableType::View) {
            self.validate_one(metadata, scope.clone())?;
        }
        Ok(())
    }

    fn validate_one<'a>(
        &self,
        metadata: &EntityMetadata,
        scope: impl Iterator<Item = &'a EntityMetadata> + Clone,
    ) -> Result<()> {
        // Two entities writing through one table would silently merge their
        // columns at synchronization.
        if let Some(other) = scope.clone().find(|m| {
            m.table_type != TableType::View
                && m.entity_name != metadata.entity_name
                && m.table_name == metadata.table_name
        }) {
            return Err(OrmError::SchemaValidation(format!(
                "entity '{}': table '{}' is already used by entity '{}'",
                metadata.entity_name, metadata.table_name, other.entity_name
            )));
        }

        let primaries: Vec<_> = metadata.columns.iter().filter(|c| c.primary).collect();
        if primaries.len() != 1 {
            return Err(OrmError::SchemaValidation(format!(
                "entity '{}' must have exactly one primary column, found {}",
                metadata.entity_name,
                primaries.len()
            )));
        }
        let primary = primaries[0];
        if primary.data_type != DataType::Integer || primary.nullable {
            return Err(OrmError::SchemaValidation(format!(
                "entity '{}': generated primary column '{}' must be a non-null INTEGER",
                metadata.entity_name, primary.name
            )));
        }

        for relation in &metadata.relations {
            if metadata.has_column(&relation.field) {
                return Err(OrmError::SchemaValidation(format!(
                    "entity '{}': relation field '{}' collides with a column",
                    metadata.entity_name, relation.field
                )));
            }
            let target = scope
                .clone()
                .find(|m| m.entity_name == relation.target)
                .ok_or_else(|| {
                    OrmError::SchemaValidation(format!(
                        "entity '{}': relation '{}' targets unknown entity '{}'",
                        metadata.entity_name, relation.field, relation.target
                    ))
                })?;
            if target.table_type == TableType::View {
                return Err(OrmError::SchemaValidation(format!(
                    "entity '{}': relation '{}' may not target view '{}'",
                    metadata.entity_name, relation.field, relation.target
                )));
            }
        }

        Ok(())
    }
}
