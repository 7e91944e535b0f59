use crate::model::complaint::Status;
use serde::{Deserialize, Serialize};

/// Body of `PUT /admin/api/complaints/{id}/status`. The status arrives as a
/// raw string so the endpoint can reject unknown values with a 400 instead
/// of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub success: bool,
    pub message: String,
    pub complaint_id: String,
    pub new_status: Status,
}

#[derive(Debug, Serialize)]
pub struct SubmitComplaintResponse {
    pub success: bool,
    pub message: String,
    pub complaint_id: String,
}

/// Body of `POST /geocode`. Both coordinates are optional at the wire level;
/// the endpoint answers 400 when either is missing.
#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
}
