// src/server/auth.rs
//! The local server driving the Canva authorization flow.

use crate::canva::{CanvaApi, OAuthSession};
use crate::error::AppError;
use actix_web::http::header;
use actix_web::{get, web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use std::sync::Arc;

/// Shared by the auth handlers through app data.
pub struct AuthState {
    pub session: OAuthSession,
    pub canva: Arc<dyn CanvaApi>,
}

fn page(status: actix_web::http::StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn error_page(err: &AppError) -> HttpResponse {
    log::error!("Authorization error: {}", err);
    page(
        super::responses::status_for(err.kind()),
        format!("<h1>Authorization failed</h1><p>{}</p><p><a href=\"/\">Start again</a></p>", err),
    )
}

#[get("/")]
pub async fn start(state: web::Data<AuthState>) -> HttpResponse {
    match state.session.begin() {
        Ok(url) => {
            log::info!("Redirecting to Canva authorization: {}", url);
            HttpResponse::Found()
                .insert_header((header::LOCATION, url.as_str()))
                .finish()
        }
        Err(e) => error_page(&e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[get("/callback")]
pub async fn callback(state: web::Data<AuthState>, query: web::Query<CallbackQuery>) -> HttpResponse {
    if let Some(error) = &query.error {
        return error_page(&AppError::Authentication(format!("Canva returned {}", error)));
    }
    let Some(code) = query.code.as_deref() else {
        return error_page(&crate::types::ValidationError::MissingField("code").into());
    };
    log::info!("Authorization code received, exchanging for tokens");

    match state
        .session
        .complete(state.canva.as_ref(), code, query.state.as_deref())
        .await
    {
        Ok(_) => page(
            actix_web::http::StatusCode::OK,
            "<h1>Authentication successful</h1>\
             <p>Your tokens have been saved.</p>\
             <p><a href=\"/test\">Test the API</a></p>"
                .to_string(),
        ),
        Err(e) => error_page(&e),
    }
}

#[get("/test")]
pub async fn test_token(state: web::Data<AuthState>) -> HttpResponse {
    let Some(token) = state.session.access_token() else {
        return error_page(&AppError::Authentication(
            "No access token; authenticate first at /".to_string(),
        ));
    };
    match state.canva.current_user(&token).await {
        Ok(user) => {
            let (user_id, team_id) = user
                .team_user
                .map(|t| (t.user_id.unwrap_or_default(), t.team_id.unwrap_or_default()))
                .unwrap_or_default();
            page(
                actix_web::http::StatusCode::OK,
                format!(
                    "<h1>API test successful</h1><p><strong>User ID:</strong> {}</p>\
                     <p><strong>Team ID:</strong> {}</p>",
                    user_id, team_id
                ),
            )
        }
        Err(e) => error_page(&e),
    }
}

pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(start).service(callback).service(test_token);
}

/// Serves the authorization flow until the process is stopped.
pub async fn run_auth_server(host: &str, port: u16, state: AuthState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    log::info!("Canva authorization server on http://{}:{}", host, port);
    log::info!("Visit http://{}:{}/ to start, then /test to check the token", host, port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure_auth))
        .bind((host, port))?
        .run()
        .await
}
