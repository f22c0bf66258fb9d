use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::models::{Design, DesignPatch, NewDesign};
use crate::web::extract::{DesignId, JsonBody, JsonValue};
use crate::web::models::{
    CreateDesignRequest, DesignListResponse, DesignResponse, UpdateDesignRequest,
    UpdateDesignResponse,
};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn list_designs_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<DesignListResponse>, AppError> {
    let designs = app_state.store.list().await?;
    Ok(Json(DesignListResponse { designs }))
}

async fn create_design_handler(
    State(app_state): State<Arc<AppState>>,
    JsonBody(payload): JsonBody<CreateDesignRequest>,
) -> Result<(StatusCode, Json<DesignResponse>), AppError> {
    let design = app_state.store.create(NewDesign::from(payload)).await?;
    info!(design_id = design.id, name = %design.name, "Design created.");
    Ok((StatusCode::CREATED, Json(design.into())))
}

async fn get_design_handler(
    State(app_state): State<Arc<AppState>>,
    DesignId(design_id): DesignId,
) -> Result<Json<DesignResponse>, AppError> {
    let design = match app_state.store.get(design_id).await? {
        Some(design) => design,
        None => {
            debug!(design_id, "Design not stored, returning placeholder.");
            Design::placeholder(design_id)
        }
    };
    Ok(Json(design.into()))
}

async fn update_design_handler(
    State(app_state): State<Arc<AppState>>,
    DesignId(design_id): DesignId,
    JsonValue(body): JsonValue,
) -> Result<Json<UpdateDesignResponse>, AppError> {
    let patch: DesignPatch = UpdateDesignRequest::from(body).into();
    match app_state.store.update(design_id, patch).await? {
        Some(_) => info!(design_id, "Design updated."),
        None => debug!(design_id, "Update for unknown design ignored."),
    }
    Ok(Json(UpdateDesignResponse::success(design_id)))
}

// --- Router ---

pub fn create_designs_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_designs_handler).post(create_design_handler))
        .route(
            "/{design_id}",
            get(get_design_handler).put(update_design_handler),
        )
}
