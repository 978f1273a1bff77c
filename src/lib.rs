//! # dynorm
//!
//! Runtime schema registration and persistence over an embedded in-memory
//! store. Record types are defined at runtime as descriptor values, registered
//! into a live context's metadata registry, and then persisted through the
//! entity manager, scoped transactions, and a parameterized query builder.
//!
//! ```no_run
//! use dynorm::prelude::*;
//!
//! # async fn demo() -> dynorm::Result<()> {
//! let log = EntityDescriptor::builder("log_202104")
//!     .column("content", DataType::Text)
//!     .build();
//!
//! let ctx = DataContext::new(ContextConfig::new("root", "root").synchronize(true));
//! ctx.initialize().await?;
//!
//! register_entities(&ctx, log).await?;
//! ctx.synchronize().await?;
//!
//! let mut entry = ctx.manager().create("log_202104").await?;
//! entry.insert("content".into(), Value::text("content 1"));
//! ctx.manager().save("log_202104", entry).await?;
//! # Ok(())
//! # }
//! ```

pub mod active;
pub mod context;
pub mod core;
pub mod prelude;
pub mod query;
pub mod registrar;
pub mod schema;
pub mod storage;

// Re-export main types for convenience
pub use active::BoundEntity;
pub use context::{ContextConfig, DataContext, EntityManager};
pub use crate::core::{Criteria, DataType, OrmError, Record, Result, Value};
pub use query::QueryBuilder;
pub use registrar::register_entities;
pub use schema::{
    ColumnDef, DescriptorBuilder, EntityDescriptor, EntityList, EntityMetadata, MetadataRegistry,
    RelationDef,
};
