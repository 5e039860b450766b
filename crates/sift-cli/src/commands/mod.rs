pub mod analyze;
pub mod query;
pub mod segment;
