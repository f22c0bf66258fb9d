//! Design storage: the `DesignStore` seam and its implementations.
//! Everything is re-exported here so callers use `crate::db::services::*`.

pub mod design_store;
pub mod memory_store;
pub mod sql_store;

pub use design_store::*;
pub use memory_store::*;
pub use sql_store::*;
