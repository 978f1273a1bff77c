//! Convenience re-exports for typical usage.

pub use crate::active::BoundEntity;
pub use crate::context::{ContextConfig, DataContext, EntityManager};
pub use crate::core::{Criteria, DataType, OrmError, Record, Result, Value};
pub use crate::query::QueryBuilder;
pub use crate::registrar::register_entities;
pub use crate::schema::{EntityDescriptor, EntityList};
