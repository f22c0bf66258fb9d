use axum::{Router, response::Html, routing::get};
use std::sync::Arc;
use tera::Context;

use crate::version::VERSION;
use crate::web::extract::DesignId;
use crate::web::templates::render_page;
use crate::web::{AppError, AppState};

async fn index_handler() -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    context.insert("version", VERSION);
    render_page("index.html", &context)
}

async fn new_design_page_handler() -> Result<Html<String>, AppError> {
    render_page("design.html", &Context::new())
}

async fn design_page_handler(DesignId(design_id): DesignId) -> Result<Html<String>, AppError> {
    let mut context = Context::new();
    context.insert("design_id", &design_id);
    render_page("design.html", &context)
}

pub fn create_page_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index_handler))
        .route("/design", get(new_design_page_handler))
        .route("/design/{design_id}", get(design_page_handler))
}
