use crate::context::DataContext;
use crate::core::{Criteria, OrmError, Record, Result, Value};
use crate::schema::EntityMetadata;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Select,
    Update,
}

/// Fluent parameterized query construction against registered entities.
///
/// Conditions are written as `column = :param` pairs joined by `AND`, with
/// values supplied through [`param`](Self::param). Select queries finish with
/// [`fetch`](Self::fetch); update queries set columns via [`set`](Self::set)
/// and finish with [`execute`](Self::execute).
pub struct QueryBuilder {
    ctx: DataContext,
    mode: Option<Mode>,
    entity: Option<String>,
    sets: Vec<(String, Value)>,
    clause: Option<String>,
    params: HashMap<String, Value>,
}

impl QueryBuilder {
    pub(crate) fn new(ctx: DataContext) -> Self {
        Self {
            ctx,
            mode: None,
            entity: None,
            sets: Vec::new(),
            clause: None,
            params: HashMap::new(),
        }
    }

    pub fn select(mut self, entity: &str) -> Self {
        self.mode = Some(Mode::Select);
        self.entity = Some(entity.to_string());
        self
    }

    pub fn update(mut self, entity: &str) -> Self {
        self.mode = Some(Mode::Update);
        self.entity = Some(entity.to_string());
        self
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.sets.push((column.to_string(), value.into()));
        self
    }

    pub fn where_clause(mut self, clause: &str) -> Self {
        self.clause = Some(clause.to_string());
        self
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Runs a select query, returning the matching records.
    pub async fn fetch(self) -> Result<Vec<Record>> {
        let (metadata, criteria) = self.prepare(Mode::Select).await?;
        self.ctx
            .inner()
            .engine
            .scan(&metadata.table_name, criteria.as_ref())
            .await
    }

    /// Runs an update query, returning the number of affected rows.
    pub async fn execute(self) -> Result<usize> {
        let (metadata, criteria) = self.prepare(Mode::Update).await?;
        if self.sets.is_empty() {
            return Err(OrmError::ParseError(
                "update query has no set clauses".to_string(),
            ));
        }
        for (column, value) in &self.sets {
            let meta = metadata.column(column).ok_or_else(|| {
                OrmError::ColumnNotFound(column.clone(), metadata.table_name.clone())
            })?;
            if meta.primary {
                return Err(OrmError::ConstraintViolation(format!(
                    "cannot update generated identity column '{}'",
                    column
                )));
            }
            if !value.is_null() && !meta.data_type.is_compatible(value) {
                return Err(OrmError::TypeMismatch(format!(
                    "Column '{}' expects {}, got {}",
                    column,
                    meta.data_type,
                    value.type_name()
                )));
            }
        }

        let engine = &self.ctx.inner().engine;
        let id_column = metadata.primary_column().name.clone();
        let rows = engine.scan(&metadata.table_name, criteria.as_ref()).await?;
        let mut affected = 0;
        for mut row in rows {
            // Every stored row carries its generated identity.
            let id = row
                .get(&id_column)
                .and_then(Value::as_i64)
                .ok_or_else(|| OrmError::RowNotFound(0, metadata.table_name.clone()))?;
            for (column, value) in &self.sets {
                row.insert(column.clone(), value.clone());
            }
            engine.update(&metadata.table_name, id, row).await?;
            affected += 1;
        }
        debug!(entity = %metadata.entity_name, affected, "update executed");
        Ok(affected)
    }

    async fn prepare(&self, expected: Mode) -> Result<(EntityMetadata, Option<Criteria>)> {
        self.ctx.ensure_initialized().await?;
        match self.mode {
            Some(mode) if mode == expected => {}
            Some(_) => {
                return Err(OrmError::ParseError(
                    "query finished with the wrong terminal for its mode".to_string(),
                ));
            }
            None => {
                return Err(OrmError::ParseError(
                    "query has no select or update target".to_string(),
                ));
            }
        }
        let entity = self
            .entity
            .as_deref()
            .ok_or_else(|| OrmError::ParseError("query has no target entity".to_string()))?;
        let metadata = self.ctx.metadata(entity).await?;

        let criteria = match &self.clause {
            Some(clause) => Some(parse_clause(clause, &self.params, &metadata)?),
            None => None,
        };
        Ok((metadata, criteria))
    }
}

/// Parses `column = :param [AND column = :param]*` into equality criteria,
/// binding parameter values from `params`.
fn parse_clause(
    clause: &str,
    params: &HashMap<String, Value>,
    metadata: &EntityMetadata,
) -> Result<Criteria> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(OrmError::ParseError("empty where clause".to_string()));
    }

    let mut criteria = Criteria::new();
    let mut i = 0;
    loop {
        if i + 3 > tokens.len() || tokens[i + 1] != "=" {
            return Err(OrmError::ParseError(format!(
                "malformed where clause '{}', expected 'column = :param'",
                clause
            )));
        }
        let column = tokens[i];
        if !metadata.has_column(column) {
            return Err(OrmError::ColumnNotFound(
                column.to_string(),
                metadata.table_name.clone(),
            ));
        }
        let placeholder = tokens[i + 2];
        let name = placeholder.strip_prefix(':').ok_or_else(|| {
            OrmError::ParseError(format!(
                "expected a ':name' placeholder, got '{}'",
                placeholder
            ))
        })?;
        let value = params
            .get(name)
            .ok_or_else(|| OrmError::ParseError(format!("unbound parameter ':{}'", name)))?;
        criteria = criteria.eq(column, value.clone());

        i += 3;
        if i == tokens.len() {
            break;
        }
        if !tokens[i].eq_ignore_ascii_case("and") {
            return Err(OrmError::ParseError(format!(
                "expected AND between conditions, got '{}'",
                tokens[i]
            )));
        }
        i += 1;
    }
    Ok(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataType;
    use crate::schema::{EntityDescriptor, MetadataBuilder};

    fn log_meta() -> EntityMetadata {
        let descriptor = EntityDescriptor::builder("log")
            .column("content", DataType::Text)
            .build();
        MetadataBuilder::new().build(&descriptor).unwrap()
    }

    fn bound(name: &str, value: Value) -> HashMap<String, Value> {
        let mut params = HashMap::new();
        params.insert(name.to_string(), value);
        params
    }

    #[test]
    fn parses_single_condition() {
        let criteria = parse_clause(
            "id = :id",
            &bound("id", Value::Integer(2)),
            &log_meta(),
        )
        .unwrap();
        assert_eq!(criteria.conditions(), &[("id".to_string(), Value::Integer(2))]);
    }

    #[test]
    fn parses_and_joined_conditions() {
        let mut params = bound("id", Value::Integer(2));
        params.insert("content".to_string(), Value::text("x"));
        let criteria =
            parse_clause("id = :id AND content = :content", &params, &log_meta()).unwrap();
        assert_eq!(criteria.conditions().len(), 2);
    }

    #[test]
    fn unbound_parameter_is_a_parse_error() {
        let err = parse_clause("id = :id", &HashMap::new(), &log_meta()).unwrap_err();
        assert!(matches!(err, OrmError::ParseError(_)));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let err = parse_clause(
            "bogus = :id",
            &bound("id", Value::Integer(2)),
            &log_meta(),
        )
        .unwrap_err();
        assert!(matches!(err, OrmError::ColumnNotFound(_, _)));
    }

    #[test]
    fn malformed_clause_is_rejected() {
        let err = parse_clause(
            "id == :id",
            &bound("id", Value::Integer(2)),
            &log_meta(),
        )
        .unwrap_err();
        assert!(matches!(err, OrmError::ParseError(_)));
    }
}
