// src/server/responses.rs
//! The `{success, ..., error}` envelope every API handler answers with.

use crate::error::{AppError, ErrorKind};
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::{json, Value};

/// HTTP status for a failure class.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Upstream | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 200 with `success: true` merged into `body`, which must be an object.
pub fn success(mut body: Value) -> HttpResponse {
    if let Some(fields) = body.as_object_mut() {
        fields.insert("success".to_string(), Value::Bool(true));
    }
    HttpResponse::Ok().json(body)
}

/// `{success: false, error}` with the status matching `err`.
pub fn failure(err: &AppError) -> HttpResponse {
    failure_with(err, json!({}))
}

/// Like [`failure`], keeping whatever partial results `extra` carries.
pub fn failure_with(err: &AppError, mut extra: Value) -> HttpResponse {
    let status = status_for(err.kind());
    if status.is_server_error() {
        log::error!("Request failed: {}", err);
    } else {
        log::warn!("Request rejected: {}", err);
    }
    if let Some(fields) = extra.as_object_mut() {
        fields.insert("success".to_string(), Value::Bool(false));
        fields.insert("error".to_string(), Value::String(err.to_string()));
    }
    HttpResponse::build(status).json(extra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidationError;

    #[test]
    fn kinds_map_to_statuses() {
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Authentication), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorKind::Upstream), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn failure_uses_error_status() {
        let err: AppError = ValidationError::MissingField("title").into();
        assert_eq!(failure(&err).status(), StatusCode::BAD_REQUEST);
        let err = AppError::NotFound("nothing".to_string());
        assert_eq!(
            failure_with(&err, json!({"file_path": "x.mp4"})).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
