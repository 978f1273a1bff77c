use crate::core::Value;
use std::collections::BTreeMap;

/// Generic instance of a registered entity: a mapping from field name to value.
///
/// Dynamically registered types never become nominal Rust types; every
/// persisted instance is one of these, shaped by the entity's metadata.
pub type Record = BTreeMap<String, Value>;

/// Equality conditions used by `find`/`find_one`.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    conditions: Vec<(String, Value)>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn by_id(id: i64) -> Self {
        Self::new().eq("id", id)
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// True when every condition matches the record (missing fields never match).
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| record.get(field).is_some_and(|v| v == value))
    }
}
