use crate::auth::{password, session};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::pages;
use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{info, warn};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

pub async fn form() -> impl Responder {
    pages::page("admin-login.html")
}

pub async fn process(
    config: web::Data<AppConfig>,
    query: web::Query<LoginQuery>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let authenticated = form.username == config.admin_username
        && password::verify_password(&config.admin_password_hash, &form.password);
    if !authenticated {
        warn!("Failed admin login attempt for user '{}'.", form.username);
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = session::issue_token(&config.secret_key, Utc::now().timestamp())?;
    // Only local targets; an absolute URL here would be an open redirect.
    let destination = query
        .next
        .as_deref()
        .filter(|next| next.starts_with('/'))
        .unwrap_or("/admin-dashboard");

    info!("Admin '{}' logged in.", form.username);
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, destination))
        .cookie(session::session_cookie(token))
        .finish())
}
