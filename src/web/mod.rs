use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{Method, StatusCode, Uri},
    response::Response,
    routing::get,
};
use std::any::Any;
use std::cell::RefCell;
use std::sync::{Arc, Once};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::services::DesignStore;
use crate::server::config::ServerConfig;
use crate::web::routes::{design_routes, page_routes};

pub mod error;
pub mod extract;
pub mod models;
pub mod routes;
pub mod templates;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DesignStore>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

async fn not_found_handler(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Where the most recent panic on this thread was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PanicSite {
    file: String,
    line: u32,
}

thread_local! {
    static LAST_PANIC_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Chains a hook in front of the current one that remembers the panic
/// location for `handle_panic`. `CatchPanicLayer` unwinds on the panicking
/// thread, so a thread-local is enough.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(location) = info.location() {
                let site = PanicSite {
                    file: location.file().to_string(),
                    line: location.line(),
                };
                LAST_PANIC_SITE.with(|last| last.replace(Some(site)));
            }
            previous(info);
        }));
    });
}

fn take_panic_site() -> Option<PanicSite> {
    LAST_PANIC_SITE.with(|last| last.take())
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    let site = take_panic_site();
    tracing::error!(
        error = %message,
        source_file = site.as_ref().map(|s| s.file.as_str()),
        source_line = site.as_ref().map(|s| s.line),
        "Server Error: handler panicked"
    );
    templates::error_page(StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn create_axum_router(store: Arc<dyn DesignStore>, config: Arc<ServerConfig>) -> Router {
    install_panic_hook();

    let body_limit = config.max_content_length;
    let app_state = Arc::new(AppState { store, config });

    let cors_layer = CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(cors::Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .merge(page_routes::create_page_router())
        .nest("/api/designs", design_routes::create_designs_router())
        .fallback(not_found_handler)
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payloads_render_500() {
        let from_str = handle_panic(Box::new("boom"));
        assert_eq!(from_str.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let from_string = handle_panic(Box::new(String::from("boom")));
        assert_eq!(from_string.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let from_other = handle_panic(Box::new(17_u8));
        assert_eq!(from_other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_panic_hook_records_location() {
        install_panic_hook();

        let expected_line = line!() + 1;
        let result = std::panic::catch_unwind(|| panic!("boom"));
        assert!(result.is_err());

        let site = take_panic_site().unwrap();
        assert_eq!(site.file, file!());
        assert_eq!(site.line, expected_line);

        // handle_panic consumes the recorded site.
        let _ = std::panic::catch_unwind(|| panic!("again"));
        let response = handle_panic(Box::new("again"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(take_panic_site().is_none());
    }
}
