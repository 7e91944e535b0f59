use crate::auth::AdminSession;
use crate::db::ComplaintStore;
use crate::error::AppError;
use actix_web::{web, HttpResponse};
use common::model::complaint::Status;
use common::requests::{StatusUpdateRequest, StatusUpdateResponse};
use log::info;

/// `PUT /admin/api/complaints/{complaint_id}/status`: moves a complaint
/// through the triage lifecycle. The status is matched case-insensitively
/// and stored lowercase; the response carries the applied value.
pub async fn process(
    _session: AdminSession,
    store: web::Data<ComplaintStore>,
    complaint_id: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let complaint_id = complaint_id.into_inner();

    let requested = body
        .status
        .as_deref()
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .ok_or_else(|| AppError::Validation("New status not provided.".to_string()))?;

    let status = Status::parse(requested).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status provided. Must be one of: {}",
            Status::NAMES.join(", ")
        ))
    })?;

    let applied = store.update_status(&complaint_id, status)?;
    info!("Complaint {} status updated to {}.", complaint_id, applied);

    Ok(HttpResponse::Ok().json(StatusUpdateResponse {
        success: true,
        message: "Complaint status updated.".to_string(),
        complaint_id,
        new_status: applied,
    }))
}
