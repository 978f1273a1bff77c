use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrmError {
    #[error("Entity '{0}' is already registered")]
    DuplicateSchema(String),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("Cannot resolve descriptor: {0}")]
    Resolution(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("No metadata registered for entity '{0}'")]
    EntityNotFound(String),

    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Row with id {0} not found in table '{1}'")]
    RowNotFound(i64, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Context is not initialized")]
    NotInitialized,

    #[error("Context is already initialized")]
    AlreadyInitialized,

    #[error("Transaction failed: {0}")]
    Transaction(String),
}

pub type Result<T> = std::result::Result<T, OrmError>;
