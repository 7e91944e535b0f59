//! # Complaint Endpoints
//!
//! The intake, query, and status-lifecycle surface over the complaint
//! store. The paths are the public contract and share no common prefix, so
//! routes are registered at the application level rather than under a
//! scope.
//!
//! ## Registered Routes:
//!
//! *   **`POST /submit_complaint`**:
//!     - **Handler**: `submit::process`
//!     - **Description**: Public multipart intake. Accepts the form fields
//!       `vehicle-no` (required), `violation-type`, `offence-location`,
//!       `latitude`, `longitude`, `date`, `time`, `state`, `comment` and an
//!       optional `media` file. Normalizes date/time and coordinates,
//!       assigns a fresh complaint id, stores the media file under the
//!       public asset root, and persists one row with status `open`.
//!
//! *   **`GET /history`**:
//!     - **Handler**: `list::history`
//!     - **Description**: Public read-only list of every complaint,
//!       newest first.
//!
//! *   **`GET /admin-dashboard`**:
//!     - **Handler**: `list::admin_dashboard`
//!     - **Description**: The same list for the admin UI. Session required.
//!
//! *   **`PUT /admin/api/complaints/{complaint_id}/status`**:
//!     - **Handler**: `status::process`
//!     - **Description**: Transitions a complaint among
//!       open/hold/rejected/completed. Session required.
//!
//! *   **`GET /api/complaints`**:
//!     - **Handler**: `list::api_complaints`
//!     - **Description**: Machine-readable list, guarded by the `X-API-Key`
//!       shared secret.

mod list;
mod status;
mod submit;

use actix_web::web::{get, post, put, ServiceConfig};

pub fn configure_routes(cfg: &mut ServiceConfig) {
    cfg.route("/submit_complaint", post().to(submit::process))
        .route("/history", get().to(list::history))
        .route("/admin-dashboard", get().to(list::admin_dashboard))
        .route(
            "/admin/api/complaints/{complaint_id}/status",
            put().to(status::process),
        )
        .route("/api/complaints", get().to(list::api_complaints));
}
