// src/server/mod.rs
//! HTTP surfaces: the JSON API used by the frontend and the local Canva
//! authorization server.

pub mod auth;
pub mod handlers;
pub mod responses;

pub use auth::{run_auth_server, AuthState};

use crate::pipeline::ClipPipeline;
use crate::service::ProjectService;
use actix_web::error::InternalError;
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::json;

pub const API_PREFIX: &str = "/api/v1";

/// Permissive CORS headers for the browser frontend.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type"))
}

/// Malformed JSON bodies get the usual envelope with a 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = json!({ "success": false, "error": format!("Invalid request body: {}", err) });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Query strings that fail to deserialize get the same treatment.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let body = json!({ "success": false, "error": format!("Invalid query string: {}", err) });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}

/// Registers every API route under [`API_PREFIX`].
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .app_data(json_config())
            .app_data(query_config())
            .service(handlers::health)
            .service(handlers::list_projects)
            .service(handlers::project_tasks)
            .service(handlers::project_transcript)
            .service(handlers::project_details)
            .service(
                web::resource("/create")
                    .route(web::post().to(handlers::create_clip))
                    .route(web::method(Method::OPTIONS).to(handlers::preflight)),
            ),
    );
}

pub async fn run_api_server(
    host: &str,
    port: u16,
    service: ProjectService,
    pipeline: ClipPipeline,
) -> std::io::Result<()> {
    let service = web::Data::new(service);
    let pipeline = web::Data::new(pipeline);

    log::info!("API listening on http://{}:{}{}", host, port, API_PREFIX);
    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .app_data(service.clone())
            .app_data(pipeline.clone())
            .configure(configure_api)
    })
    .bind((host, port))?
    .run()
    .await
}
