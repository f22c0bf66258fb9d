use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::db::models::{
    Design, DesignPatch, DesignSummary, NewDesign, sample_designs, timestamp_now,
};
use crate::db::services::design_store::{DesignStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    designs: BTreeMap<i64, Design>,
    last_id: i64,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryDesignStore {
    state: RwLock<MemoryState>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from `designs`; new ids continue after the largest seeded id.
    pub fn with_designs(designs: impl IntoIterator<Item = Design>) -> Self {
        let designs: BTreeMap<i64, Design> = designs.into_iter().map(|d| (d.id, d)).collect();
        let last_id = designs.keys().next_back().copied().unwrap_or(0);
        MemoryDesignStore {
            state: RwLock::new(MemoryState { designs, last_id }),
        }
    }

    pub fn with_samples() -> Self {
        Self::with_designs(sample_designs())
    }
}

#[async_trait]
impl DesignStore for MemoryDesignStore {
    async fn list(&self) -> Result<Vec<DesignSummary>, StoreError> {
        let state = self.state.read().await;
        Ok(state.designs.values().map(Design::summary).collect())
    }

    async fn create(&self, new_design: NewDesign) -> Result<Design, StoreError> {
        let mut state = self.state.write().await;
        let id = state
            .last_id
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted)?;
        state.last_id = id;

        let design = new_design.into_design(id, timestamp_now());
        state.designs.insert(id, design.clone());
        Ok(design)
    }

    async fn get(&self, id: i64) -> Result<Option<Design>, StoreError> {
        let state = self.state.read().await;
        Ok(state.designs.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: DesignPatch) -> Result<Option<Design>, StoreError> {
        let mut state = self.state.write().await;
        let Some(design) = state.designs.get_mut(&id) else {
            return Ok(None);
        };
        design.apply(patch, timestamp_now());
        Ok(Some(design.clone()))
    }
}
