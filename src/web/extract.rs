use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::web::error::AppError;

pub const NOT_JSON_MESSAGE: &str = "Request must be JSON";

/// `application/json` or any `application/*+json`, parameters ignored.
pub fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.split_once('/') {
        Some((kind, subtype)) => {
            kind == "application" && (subtype == "json" || subtype.ends_with("+json"))
        }
        None => false,
    }
}

/// Any JSON value behind the content-type guard. Every rejection is an
/// `AppError` so clients always get an `{"error": ...}` payload.
#[derive(Debug)]
pub struct JsonValue(pub Value);

impl<S> FromRequest<S> for JsonValue
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Err(AppError::BadRequest(NOT_JSON_MESSAGE.to_string()));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(rejection.body_text())
            } else {
                AppError::BadRequest(rejection.body_text())
            }
        })?;

        serde_json::from_slice(&bytes)
            .map(JsonValue)
            .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {e}")))
    }
}

/// JSON object body deserialized into `T`. Non-object bodies and fields of
/// the wrong type are rejected with 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonValue(value) = JsonValue::from_request(req, state).await?;
        if !value.is_object() {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".to_string(),
            ));
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
    }
}

/// Design id taken from the `{design_id}` path segment. Only plain digit
/// strings match; anything else is treated as an unknown route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignId(pub i64);

pub fn parse_design_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl<S> FromRequestParts<S> for DesignId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::NotFound(rejection.body_text()))?;

        parse_design_id(&raw)
            .map(DesignId)
            .ok_or_else(|| AppError::NotFound(format!("'{raw}' is not a design id")))
    }
}
