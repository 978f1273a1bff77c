use crate::core::{DataType, OrmError, Record, Result, Value};
use crate::schema::descriptor::EntityDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableType {
    Regular,
    View,
}

/// Resolved column metadata. The generated primary column always comes first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub primary: bool,
    pub generated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationMeta {
    pub field: String,
    pub target: String,
}

/// Fully resolved schema metadata for one registered entity.
///
/// Dynamically registered entities go through the same resolution as the ones
/// configured at context construction, so downstream operations cannot tell
/// them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub entity_name: String,
    pub table_name: String,
    pub table_type: TableType,
    pub columns: Vec<ColumnMeta>,
    pub relations: Vec<RelationMeta>,
    pub self_managing: bool,
}

impl EntityMetadata {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_column(&self) -> &ColumnMeta {
        // Resolution guarantees exactly one primary column, at index 0.
        &self.columns[0]
    }

    /// A fresh record with every column initialized to Null.
    pub fn default_record(&self) -> Record {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), Value::Null))
            .collect()
    }
}

/// Resolves descriptors into [`EntityMetadata`].
///
/// This is the single resolution path: the context uses it for statically
/// configured descriptors at initialization and the registrar uses it for
/// descriptors added later.
#[derive(Debug, Default)]
pub struct MetadataBuilder;

impl MetadataBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_many(&self, descriptors: &[EntityDescriptor]) -> Result<Vec<EntityMetadata>> {
        descriptors.iter().map(|d| self.build(d)).collect()
    }

    pub fn build(&self, descriptor: &EntityDescriptor) -> Result<EntityMetadata> {
        if descriptor.entity_name().is_empty() {
            return Err(OrmError::Resolution("entity name must not be empty".into()));
        }
        if descriptor.table_name().is_empty() {
            return Err(OrmError::Resolution(format!(
                "entity '{}' has an empty table name",
                descriptor.entity_name()
            )));
        }
        if descriptor.primary_column().is_empty() {
            return Err(OrmError::Resolution(format!(
                "entity '{}' has an empty primary column name",
                descriptor.entity_name()
            )));
        }
        if descriptor.columns().is_empty() {
            return Err(OrmError::Resolution(format!(
                "entity '{}' declares no content columns",
                descriptor.entity_name()
            )));
        }

        let mut columns = Vec::with_capacity(descriptor.columns().len() + 1);
        columns.push(ColumnMeta {
            name: descriptor.primary_column().to_string(),
            data_type: DataType::Integer,
            nullable: false,
            primary: true,
            generated: true,
        });

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(descriptor.primary_column());
        for def in descriptor.columns() {
            if def.name.is_empty() {
                return Err(OrmError::Resolution(format!(
                    "entity '{}' has a column with an empty name",
                    descriptor.entity_name()
                )));
            }
            if !seen.insert(&def.name) {
                return Err(OrmError::Resolution(format!(
                    "entity '{}' declares column '{}' more than once",
                    descriptor.entity_name(),
                    def.name
                )));
            }
            columns.push(ColumnMeta {
                name: def.name.clone(),
                data_type: def.data_type,
                nullable: def.nullable,
                primary: false,
                generated: false,
            });
        }

        let relations = descriptor
            .relations()
            .iter()
            .map(|r| RelationMeta {
                field: r.field.clone(),
                target: r.target.clone(),
            })
            .collect();

        Ok(EntityMetadata {
            entity_name: descriptor.entity_name().to_string(),
            table_name: descriptor.table_name().to_string(),
            table_type: if descriptor.is_view() {
                TableType::View
            } else {
                TableType::Regular
            },
            columns,
            relations,
            self_managing: descriptor.is_self_managing(),
        })
    }
}
