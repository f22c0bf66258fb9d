use async_trait::async_trait;
use sea_orm::DbErr;

use crate::db::models::{Design, DesignPatch, DesignSummary, NewDesign};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("No design ids left to assign")]
    IdSpaceExhausted,
}

/// Storage seam for design documents. Handlers only ever see this trait.
#[async_trait]
pub trait DesignStore: Send + Sync {
    /// All designs, ascending by id.
    async fn list(&self) -> Result<Vec<DesignSummary>, StoreError>;

    /// Stores a design under a freshly assigned id.
    async fn create(&self, new_design: NewDesign) -> Result<Design, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Design>, StoreError>;

    /// Applies `patch` to an existing design. Returns `None` and changes
    /// nothing when `id` is unknown.
    async fn update(&self, id: i64, patch: DesignPatch) -> Result<Option<Design>, StoreError>;
}
