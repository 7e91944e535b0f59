//! The three listing surfaces over the same query: public history, admin
//! dashboard, and the shared-secret machine API. Identical data, different
//! capability requirements.

use crate::auth::{AdminSession, ApiKeyGuard};
use crate::db::ComplaintStore;
use crate::error::AppError;
use actix_web::{web, HttpResponse};

pub async fn history(store: web::Data<ComplaintStore>) -> Result<HttpResponse, AppError> {
    let complaints = store.list_all()?;
    Ok(HttpResponse::Ok().json(complaints))
}

pub async fn admin_dashboard(
    _session: AdminSession,
    store: web::Data<ComplaintStore>,
) -> Result<HttpResponse, AppError> {
    let complaints = store.list_all()?;
    Ok(HttpResponse::Ok().json(complaints))
}

pub async fn api_complaints(
    _guard: ApiKeyGuard,
    store: web::Data<ComplaintStore>,
) -> Result<HttpResponse, AppError> {
    let complaints = store.list_all()?;
    Ok(HttpResponse::Ok().json(complaints))
}
