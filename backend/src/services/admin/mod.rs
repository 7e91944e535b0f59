//! # Admin Session Endpoints
//!
//! Login and logout for the single configured admin identity.
//!
//! ## Registered Routes:
//!
//! *   **`GET /admin/login`**:
//!     - **Handler**: `login::form`
//!     - **Description**: Serves the embedded static login form. A `next`
//!       query parameter, when present, is carried through the form post so
//!       a successful login returns to the originally requested page.
//!
//! *   **`POST /admin/login`**:
//!     - **Handler**: `login::process`
//!     - **Description**: Checks the submitted credentials against the
//!       configured admin identity (password verified against a salted
//!       hash). On success it sets the signed session cookie and redirects
//!       to `next` or the dashboard; on failure it answers 401.
//!
//! *   **`GET /admin/logout`**:
//!     - **Handler**: `logout::process`
//!     - **Description**: Clears the session cookie and redirects back to
//!       the login form. Requires a valid session.

mod login;
mod logout;

use actix_web::web::{self, get, post, ServiceConfig};

pub fn configure_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::resource("/admin/login")
            .route(get().to(login::form))
            .route(post().to(login::process)),
    )
    .route("/admin/logout", get().to(logout::process));
}
