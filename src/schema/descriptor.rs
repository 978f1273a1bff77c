use crate::core::{DataType, OrmError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Describes a single content field of an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

/// Describes a relation from a field to another entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationDef {
    pub field: String,
    pub target: String,
}

/// Runtime definition of a storage schema for one kind of persisted record.
///
/// Descriptors are built through [`DescriptorBuilder`] and immutable once
/// built. They carry everything metadata resolution needs: the type identity,
/// the backing table name, the generated identity column, content columns,
/// relations, and the opt-in active-record capability flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescriptor {
    entity_name: String,
    table_name: String,
    primary_column: String,
    columns: Vec<ColumnDef>,
    relations: Vec<RelationDef>,
    view: bool,
    self_managing: bool,
}

impl EntityDescriptor {
    /// Starts a builder for an entity with the given type identity.
    /// The table name defaults to the entity name.
    pub fn builder(entity_name: impl Into<String>) -> DescriptorBuilder {
        let entity_name = entity_name.into();
        DescriptorBuilder {
            table_name: entity_name.clone(),
            entity_name,
            primary_column: "id".to_string(),
            columns: Vec::new(),
            relations: Vec::new(),
            view: false,
            self_managing: false,
        }
    }

    /// Starts a builder for a period-partitioned entity named
    /// `{prefix}_{period}`, after checking that `period` names a real
    /// `YYYYMM` calendar month.
    pub fn monthly(prefix: &str, period: &str) -> Result<DescriptorBuilder> {
        NaiveDate::parse_from_str(&format!("{period}01"), "%Y%m%d").map_err(|_| {
            OrmError::Resolution(format!("'{period}' is not a valid YYYYMM period"))
        })?;
        Ok(Self::builder(format!("{prefix}_{period}")))
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn primary_column(&self) -> &str {
        &self.primary_column
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn relations(&self) -> &[RelationDef] {
        &self.relations
    }

    pub fn is_view(&self) -> bool {
        self.view
    }

    pub fn is_self_managing(&self) -> bool {
        self.self_managing
    }
}

/// Builder for [`EntityDescriptor`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    entity_name: String,
    table_name: String,
    primary_column: String,
    columns: Vec<ColumnDef>,
    relations: Vec<RelationDef>,
    view: bool,
    self_managing: bool,
}

impl DescriptorBuilder {
    /// Overrides the backing table name.
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table_name = name.into();
        self
    }

    /// Names the auto-generated surrogate key column. Defaults to `id`.
    pub fn primary_generated(mut self, name: impl Into<String>) -> Self {
        self.primary_column = name.into();
        self
    }

    pub fn column(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            data_type,
            nullable: true,
        });
        self
    }

    pub fn column_not_null(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            data_type,
            nullable: false,
        });
        self
    }

    /// Declares a relation from `field` to the entity named `target`.
    /// Targets are checked during cross-entity validation, not here.
    pub fn relation(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.relations.push(RelationDef {
            field: field.into(),
            target: target.into(),
        });
        self
    }

    /// Marks the descriptor as a view. Views are excluded from structural
    /// validation and from schema synchronization.
    pub fn view(mut self) -> Self {
        self.view = true;
        self
    }

    /// Opts the entity into the active-record capability: after registration
    /// the owning context binds it, and a [`BoundEntity`](crate::BoundEntity)
    /// handle can invoke persistence operations on the type itself.
    pub fn self_managing(mut self) -> Self {
        self.self_managing = true;
        self
    }

    pub fn build(self) -> EntityDescriptor {
        EntityDescriptor {
            entity_name: self.entity_name,
            table_name: self.table_name,
            primary_column: self.primary_column,
            columns: self.columns,
            relations: self.relations,
            view: self.view,
            self_managing: self.self_managing,
        }
    }
}

/// A possibly nested list of descriptors, flattened before registration.
///
/// Mirrors the registrar contract: callers may hand over a single descriptor,
/// a flat batch, or nested batches; order is preserved.
#[derive(Debug, Clone)]
pub enum EntityList {
    One(EntityDescriptor),
    Many(Vec<EntityList>),
}

impl EntityList {
    /// Flattens into a single ordered sequence of descriptors.
    pub fn flatten(self) -> Vec<EntityDescriptor> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<EntityDescriptor>) {
        match self {
            Self::One(descriptor) => out.push(descriptor),
            Self::Many(lists) => {
                for list in lists {
                    list.flatten_into(out);
                }
            }
        }
    }
}

impl From<EntityDescriptor> for EntityList {
    fn from(descriptor: EntityDescriptor) -> Self {
        Self::One(descriptor)
    }
}

impl From<Vec<EntityDescriptor>> for EntityList {
    fn from(descriptors: Vec<EntityDescriptor>) -> Self {
        Self::Many(descriptors.into_iter().map(Self::One).collect())
    }
}

impl From<Vec<EntityList>> for EntityList {
    fn from(lists: Vec<EntityList>) -> Self {
        Self::Many(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> EntityDescriptor {
        EntityDescriptor::builder(name)
            .column("content", DataType::Text)
            .build()
    }

    #[test]
    fn flatten_preserves_order_across_nesting() {
        let list = EntityList::Many(vec![
            EntityList::One(named("a")),
            EntityList::Many(vec![
                EntityList::One(named("b")),
                EntityList::Many(vec![EntityList::One(named("c"))]),
            ]),
            EntityList::One(named("d")),
        ]);

        let names: Vec<String> = list
            .flatten()
            .into_iter()
            .map(|d| d.entity_name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn table_name_defaults_to_entity_name() {
        let descriptor = named("log_202104");
        assert_eq!(descriptor.table_name(), "log_202104");
        assert_eq!(descriptor.primary_column(), "id");
    }

    #[test]
    fn monthly_factory_validates_the_period() {
        let descriptor = EntityDescriptor::monthly("log", "202104")
            .unwrap()
            .column("content", DataType::Text)
            .build();
        assert_eq!(descriptor.entity_name(), "log_202104");

        assert!(EntityDescriptor::monthly("log", "202113").is_err());
        assert!(EntityDescriptor::monthly("log", "garbage").is_err());
    }
}
