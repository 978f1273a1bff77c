pub mod descriptor;
pub mod metadata;
pub mod registry;
pub mod validator;

pub use descriptor::{ColumnDef, DescriptorBuilder, EntityDescriptor, EntityList, RelationDef};
pub use metadata::{ColumnMeta, EntityMetadata, MetadataBuilder, RelationMeta, TableType};
pub use registry::MetadataRegistry;
pub use validator::MetadataValidator;
