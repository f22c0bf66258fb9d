use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::models::Design;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "designs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Json")]
    pub data: Json,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Design {
    fn from(model: Model) -> Self {
        Design {
            id: model.id,
            name: model.name,
            data: model.data,
            updated_at: model.updated_at,
        }
    }
}
