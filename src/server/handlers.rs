// src/server/handlers.rs
//! Route handlers of the JSON API.

use super::responses::{failure, failure_with, success};
use crate::canva::UploadOutcome;
use crate::constants::{DEFAULT_TASK_PAGE, DEFAULT_TASK_PAGE_SIZE};
use crate::error::AppError;
use crate::pipeline::{ClipOutcome, ClipPipeline, ClipRequest};
use crate::service::ProjectService;
use crate::types::{NotionId, ValidationError};
use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "healthy", "message": "API is running" }))
}

#[get("/projects")]
pub async fn list_projects(service: web::Data<ProjectService>) -> HttpResponse {
    log::info!("GET /projects");
    match service.list_pending_projects().await {
        Ok(projects) => success(json!({ "count": projects.len(), "projects": projects })),
        Err(e) => failure(&e),
    }
}

#[get("/projects/{id}")]
pub async fn project_details(
    service: web::Data<ProjectService>,
    path: web::Path<String>,
) -> HttpResponse {
    log::info!("GET /projects/{}", path);
    let result = match NotionId::parse(&path) {
        Ok(id) => service.project_details(&id).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(project) => success(json!({ "project": project })),
        Err(e) => failure(&e),
    }
}

/// Raw `page` / `page_size` query parameters, validated by hand so bad
/// values get the JSON envelope.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// A positive integer parameter, `default` when absent.
pub fn positive_param(
    field: &'static str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotAnInteger {
            field,
            value: raw.to_string(),
        })?;
    if value < 1 {
        return Err(ValidationError::NotPositive { field, value });
    }
    usize::try_from(value).map_err(|_| ValidationError::NotAnInteger {
        field,
        value: raw.to_string(),
    })
}

async fn tasks_body(
    service: &ProjectService,
    raw_id: &str,
    query: &TaskQuery,
) -> Result<Value, AppError> {
    let id = NotionId::parse(raw_id)?;
    let page = positive_param("page", query.page.as_deref(), DEFAULT_TASK_PAGE)?;
    let page_size = positive_param("page_size", query.page_size.as_deref(), DEFAULT_TASK_PAGE_SIZE)?;

    let batch = service.project_tasks(&id, page, page_size).await?;
    let task_count = batch.tasks.len();
    let mut body = serde_json::to_value(&batch)?;
    if let Some(fields) = body.as_object_mut() {
        fields.insert("project_id".to_string(), Value::String(raw_id.to_string()));
        fields.insert("task_count".to_string(), json!(task_count));
    }
    Ok(body)
}

#[get("/projects/{id}/tasks")]
pub async fn project_tasks(
    service: web::Data<ProjectService>,
    path: web::Path<String>,
    query: web::Query<TaskQuery>,
) -> HttpResponse {
    log::info!("GET /projects/{}/tasks", path);
    match tasks_body(&service, &path, &query).await {
        Ok(body) => success(body),
        Err(e) => failure(&e),
    }
}

#[get("/projects/{id}/transcript")]
pub async fn project_transcript(
    service: web::Data<ProjectService>,
    path: web::Path<String>,
) -> HttpResponse {
    log::info!("GET /projects/{}/transcript", path);
    let result = match NotionId::parse(&path) {
        Ok(id) => service.project_transcript(&id).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(found) => success(json!({
            "project_id": path.as_str(),
            "video_id": found.video_id,
            "transcript": found.transcript,
        })),
        Err(e) => failure(&e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateClipBody {
    pub title: Option<String>,
    pub video_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// `POST /create`: download a clip and upload it to Canva.
pub async fn create_clip(
    pipeline: web::Data<ClipPipeline>,
    body: web::Json<CreateClipBody>,
) -> HttpResponse {
    let body = body.into_inner();
    log::info!("POST /create {:?}", body.title);
    let request = match ClipRequest::new(body.title, body.video_id, body.start, body.end) {
        Ok(request) => request,
        Err(e) => return failure(&e.into()),
    };

    let ClipOutcome { file_path, upload } = match pipeline.create_clip(&request).await {
        Ok(outcome) => outcome,
        Err(e) => return failure(&e),
    };
    let file_path = file_path.display().to_string();

    match upload {
        UploadOutcome::Success { asset_id, .. } => success(json!({
            "message": "Clip created and uploaded to Canva",
            "canva_asset_id": asset_id,
            "file_path": file_path,
        })),
        UploadOutcome::Failed { reason } => failure_with(
            &AppError::ExternalTool {
                tool: "Canva upload",
                message: reason,
            },
            json!({ "canva_asset_id": null, "file_path": file_path }),
        ),
        UploadOutcome::TimedOut { attempts } => failure_with(
            &AppError::ExternalTool {
                tool: "Canva upload",
                message: format!("still processing after {} status checks", attempts),
            },
            json!({ "canva_asset_id": null, "file_path": file_path }),
        ),
    }
}

/// Answers CORS preflight requests.
pub async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parameters_default_and_validate() {
        assert_eq!(positive_param("page", None, 1).unwrap(), 1);
        assert_eq!(positive_param("page", Some("3"), 1).unwrap(), 3);
        assert_eq!(
            positive_param("page", Some("0"), 1).unwrap_err().to_string(),
            "page must be a positive integer, got 0"
        );
        assert_eq!(
            positive_param("page_size", Some("ten"), 10).unwrap_err().to_string(),
            "page_size must be an integer, got \"ten\""
        );
    }
}
