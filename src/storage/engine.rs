use crate::core::{Criteria, OrmError, Record, Result};
use crate::schema::{EntityMetadata, TableType};
use crate::storage::table::TableData;
use im::HashMap as ImHashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Opaque copy of the full engine state. Cheap to take and to restore thanks
/// to structural sharing.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    tables: ImHashMap<String, TableData>,
}

/// The embedded storage provider: a map of tables behind an async lock.
///
/// All data operations suspend at this lock, matching the cooperative model
/// of the context; metadata (table creation/alteration) is only touched from
/// the setup path.
#[derive(Debug, Default)]
pub struct StorageEngine {
    tables: RwLock<ImHashMap<String, TableData>>,
}

impl StorageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles one registry entry with the backing storage: creates the
    /// table when missing, adds missing columns otherwise. Views have no
    /// backing table.
    pub async fn sync_table(&self, metadata: &EntityMetadata) -> Result<()> {
        if metadata.table_type == TableType::View {
            return Ok(());
        }
        let mut tables = self.tables.write().await;
        match tables.get_mut(&metadata.table_name) {
            Some(table) => {
                table.add_missing_columns(&metadata.columns);
                debug!(table = %metadata.table_name, "synchronized existing table");
            }
            None => {
                tables.insert(
                    metadata.table_name.clone(),
                    TableData::new(metadata.table_name.clone(), metadata.columns.clone()),
                );
                debug!(table = %metadata.table_name, "created table");
            }
        }
        Ok(())
    }

    pub async fn has_table(&self, name: &str) -> bool {
        self.tables.read().await.contains_key(name)
    }

    pub async fn insert(&self, table: &str, record: Record) -> Result<i64> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| OrmError::TableNotFound(table.to_string()))?;
        table.insert(record)
    }

    pub async fn update(&self, table: &str, id: i64, record: Record) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table)
            .ok_or_else(|| OrmError::TableNotFound(table.to_string()))?;
        table.update(id, record)
    }

    pub async fn get(&self, table: &str, id: i64) -> Result<Option<Record>> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table)
            .ok_or_else(|| OrmError::TableNotFound(table.to_string()))?;
        Ok(table.get(id))
    }

    /// Scans a table, keeping only rows that match the criteria when given.
    pub async fn scan(&self, table: &str, criteria: Option<&Criteria>) -> Result<Vec<Record>> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table)
            .ok_or_else(|| OrmError::TableNotFound(table.to_string()))?;
        let rows = table.scan();
        Ok(match criteria {
            Some(criteria) => rows.into_iter().filter(|r| criteria.matches(r)).collect(),
            None => rows,
        })
    }

    pub async fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            tables: self.tables.read().await.clone(),
        }
    }

    pub async fn restore(&self, snapshot: EngineSnapshot) {
        *self.tables.write().await = snapshot.tables;
    }
}
