pub mod error;
pub mod json;
pub mod types;
pub mod value;

pub use error::{OrmError, Result};
pub use json::{record_from_json, record_to_json};
pub use types::{Criteria, Record};
pub use value::{DataType, Value};
