use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryOrder, Schema, Set,
};
use std::time::Duration;
use tracing::info;

use crate::db::entities::design;
use crate::db::entities::prelude::{DesignColumn, DesignEntity};
use crate::db::models::{Design, DesignPatch, DesignSummary, NewDesign, timestamp_now};
use crate::db::services::design_store::{DesignStore, StoreError};
use crate::server::config::ServerConfig;

/// SeaORM-backed store. Works against SQLite and PostgreSQL URLs.
#[derive(Debug, Clone)]
pub struct SqlDesignStore {
    db: DatabaseConnection,
}

impl SqlDesignStore {
    pub async fn connect(config: &ServerConfig) -> Result<Self, StoreError> {
        let mut opt = ConnectOptions::new(config.database_uri.to_owned());
        opt.max_connections(config.database_pool_size)
            .acquire_timeout(Duration::from_secs(config.database_pool_timeout))
            .sqlx_logging(false);

        let db = Database::connect(opt).await?;
        Self::from_connection(db).await
    }

    /// Wraps an open connection, creating the `designs` table if it is missing.
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self, StoreError> {
        ensure_schema(&db).await?;
        info!(backend = ?db.get_database_backend(), "Design table ready.");
        Ok(SqlDesignStore { db })
    }
}

async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut create_table = schema.create_table_from_entity(DesignEntity);
    create_table.if_not_exists();
    db.execute(backend.build(&create_table)).await?;
    Ok(())
}

#[async_trait]
impl DesignStore for SqlDesignStore {
    async fn list(&self) -> Result<Vec<DesignSummary>, StoreError> {
        let models = DesignEntity::find()
            .order_by_asc(DesignColumn::Id)
            .all(&self.db)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| DesignSummary {
                id: m.id,
                name: m.name,
                updated_at: m.updated_at,
            })
            .collect())
    }

    async fn create(&self, new_design: NewDesign) -> Result<Design, StoreError> {
        let active = design::ActiveModel {
            name: Set(new_design.name),
            data: Set(new_design.data),
            updated_at: Set(timestamp_now()),
            ..Default::default()
        };
        Ok(active.insert(&self.db).await?.into())
    }

    async fn get(&self, id: i64) -> Result<Option<Design>, StoreError> {
        let model = DesignEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Design::from))
    }

    async fn update(&self, id: i64, patch: DesignPatch) -> Result<Option<Design>, StoreError> {
        let Some(model) = DesignEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active = model.into_active_model();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(data) = patch.data {
            active.data = Set(data);
        }
        active.updated_at = Set(timestamp_now());

        Ok(Some(active.update(&self.db).await?.into()))
    }
}
