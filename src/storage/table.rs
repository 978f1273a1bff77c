use crate::core::{OrmError, Record, Result, Value};
use crate::schema::ColumnMeta;
use im::OrdMap;

/// One backing table: column metadata, versioned rows, and the surrogate-key
/// counter. Rows live in a persistent map so cloning a table for a
/// transaction snapshot shares structure instead of deep-copying.
#[derive(Debug, Clone)]
pub struct TableData {
    name: String,
    columns: Vec<ColumnMeta>,
    rows: OrdMap<i64, Record>,
    next_id: i64,
}

impl TableData {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnMeta>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: OrdMap::new(),
            next_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    fn primary_column(&self) -> &ColumnMeta {
        &self.columns[0]
    }

    /// Adds columns the table does not have yet; existing rows are backfilled
    /// with Null.
    pub fn add_missing_columns(&mut self, columns: &[ColumnMeta]) {
        for column in columns {
            if self.columns.iter().any(|c| c.name == column.name) {
                continue;
            }
            self.columns.push(column.clone());
            let ids: Vec<i64> = self.rows.keys().copied().collect();
            for id in ids {
                if let Some(row) = self.rows.get_mut(&id) {
                    row.entry(column.name.clone()).or_insert(Value::Null);
                }
            }
        }
    }

    /// Inserts a record, generating the surrogate key. Returns the id.
    pub fn insert(&mut self, mut record: Record) -> Result<i64> {
        let id = self.next_id;
        record.insert(self.primary_column().name.clone(), Value::Integer(id));
        self.validate(&record)?;
        self.next_id += 1;
        self.rows.insert(id, record);
        Ok(id)
    }

    /// Replaces the row with the given id.
    pub fn update(&mut self, id: i64, mut record: Record) -> Result<()> {
        if !self.rows.contains_key(&id) {
            return Err(OrmError::RowNotFound(id, self.name.clone()));
        }
        record.insert(self.primary_column().name.clone(), Value::Integer(id));
        self.validate(&record)?;
        self.rows.insert(id, record);
        Ok(())
    }

    pub fn get(&self, id: i64) -> Option<Record> {
        self.rows.get(&id).cloned()
    }

    pub fn scan(&self) -> Vec<Record> {
        self.rows.values().cloned().collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn validate(&self, record: &Record) -> Result<()> {
        for field in record.keys() {
            if !self.columns.iter().any(|c| &c.name == field) {
                return Err(OrmError::ColumnNotFound(field.clone(), self.name.clone()));
            }
        }
        for column in &self.columns {
            let value = record.get(&column.name).unwrap_or(&Value::Null);
            if value.is_null() {
                if !column.nullable {
                    return Err(OrmError::ConstraintViolation(format!(
                        "Column '{}' of table '{}' cannot be NULL",
                        column.name, self.name
                    )));
                }
                continue;
            }
            if !column.data_type.is_compatible(value) {
                return Err(OrmError::TypeMismatch(format!(
                    "Column '{}' of table '{}' expects {}, got {}",
                    column.name,
                    self.name,
                    column.data_type,
                    value.type_name()
                )));
            }
        }
        Ok(())
    }
}
