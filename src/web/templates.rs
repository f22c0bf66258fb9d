use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use once_cell::sync::Lazy;
use rust_embed::RustEmbed;
use tera::{Context, Tera};
use tracing::error;

use crate::web::error::AppError;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateAssets;

static TEMPLATES: Lazy<Result<Tera, tera::Error>> = Lazy::new(load_templates);

fn load_templates() -> Result<Tera, tera::Error> {
    let sources: Vec<(String, String)> = TemplateAssets::iter()
        .filter_map(|path| {
            TemplateAssets::get(&path).map(|file| {
                (
                    path.to_string(),
                    String::from_utf8_lossy(&file.data).into_owned(),
                )
            })
        })
        .collect();

    let mut tera = Tera::default();
    tera.add_raw_templates(sources)?;
    Ok(tera)
}

/// The embedded template registry, parsed on first use.
pub fn registry() -> Result<&'static Tera, &'static tera::Error> {
    Lazy::force(&TEMPLATES).as_ref()
}

pub fn render_page(name: &str, context: &Context) -> Result<Html<String>, AppError> {
    let tera = registry()
        .map_err(|e| AppError::internal(format!("Template registry failed to load: {e}")))?;
    tera.render(name, context)
        .map(Html)
        .map_err(|e| AppError::internal(format!("Failed to render {name}: {e}")))
}

/// Renders `errors/{status}.html`. Falls back to plain text so an error page
/// can never fail.
pub fn error_page(status: StatusCode) -> Response {
    let name = format!("errors/{}.html", status.as_u16());
    let rendered = registry()
        .map_err(|e| e.to_string())
        .and_then(|tera| tera.render(&name, &Context::new()).map_err(|e| e.to_string()));

    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!(template = %name, error = %e, "Failed to render error page.");
            let reason = status.canonical_reason().unwrap_or("Error");
            (status, format!("{} {reason}", status.as_u16())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_load() {
        let tera = registry().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        for expected in [
            "base.html",
            "index.html",
            "design.html",
            "errors/404.html",
            "errors/500.html",
        ] {
            assert!(names.contains(&expected), "missing template {expected}");
        }
    }

    #[test]
    fn test_design_page_embeds_id() {
        let mut context = Context::new();
        context.insert("design_id", &7);
        let Html(body) = render_page("design.html", &context).unwrap();
        assert!(body.contains("data-design-id=\"7\""));
        assert!(body.contains("design-canvas"));

        let Html(blank) = render_page("design.html", &Context::new()).unwrap();
        assert!(!blank.contains("data-design-id"));
    }

    #[test]
    fn test_unknown_template_is_internal_error() {
        let result = render_page("missing.html", &Context::new());
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_error_page_without_template_falls_back() {
        let response = error_page(StatusCode::IM_A_TEAPOT);
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
