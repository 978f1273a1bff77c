pub mod builder;

pub use builder::QueryBuilder;
