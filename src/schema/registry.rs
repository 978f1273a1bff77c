use crate::core::{OrmError, Result};
use crate::schema::metadata::EntityMetadata;
use std::collections::HashMap;

/// The live mapping from registered type identity to resolved schema metadata.
///
/// Owned exclusively by the persistence context. Populated at initialization
/// from the statically configured descriptors and extended afterwards by the
/// registrar. No two entries may share an identity.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entries: Vec<EntityMetadata>,
    by_name: HashMap<String, usize>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, entity_name: &str) -> bool {
        self.by_name.contains_key(entity_name)
    }

    pub fn get(&self, entity_name: &str) -> Option<&EntityMetadata> {
        self.by_name.get(entity_name).map(|&i| &self.entries[i])
    }

    pub fn require(&self, entity_name: &str) -> Result<&EntityMetadata> {
        self.get(entity_name)
            .ok_or_else(|| OrmError::EntityNotFound(entity_name.to_string()))
    }

    /// Appends one entry, rejecting a duplicate identity without mutating
    /// existing state.
    pub fn push(&mut self, metadata: EntityMetadata) -> Result<()> {
        if self.has(&metadata.entity_name) {
            return Err(OrmError::DuplicateSchema(metadata.entity_name));
        }
        self.by_name
            .insert(metadata.entity_name.clone(), self.entries.len());
        self.entries.push(metadata);
        Ok(())
    }

    pub fn entries(&self) -> &[EntityMetadata] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::schema::descriptor::EntityDescriptor;
    use crate::schema::metadata::MetadataBuilder;

    fn meta(name: &str) -> EntityMetadata {
        let descriptor = EntityDescriptor::builder(name)
            .column("content", DataType::Text)
            .build();
        MetadataBuilder::new().build(&descriptor).unwrap()
    }

    #[test]
    fn push_rejects_duplicate_identity() {
        let mut registry = MetadataRegistry::new();
        registry.push(meta("log")).unwrap();

        let err = registry.push(meta("log")).unwrap_err();
        assert!(matches!(err, OrmError::DuplicateSchema(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_resolves_by_identity() {
        let mut registry = MetadataRegistry::new();
        registry.push(meta("a")).unwrap();
        registry.push(meta("b")).unwrap();

        assert!(registry.has("a"));
        assert_eq!(registry.get("b").unwrap().table_name, "b");
        assert!(registry.get("c").is_none());
    }
}
