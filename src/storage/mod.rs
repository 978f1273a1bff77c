pub mod engine;
pub mod table;

pub use engine::{EngineSnapshot, StorageEngine};
pub use table::TableData;
