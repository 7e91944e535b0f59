use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for every endpoint. Each variant maps to one HTTP
/// status and renders the uniform `{success: false, message}` JSON body, so
/// handlers can bail with `?` and never leak an unhandled fault.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing required input.
    #[error("{0}")]
    Validation(String),

    /// The referenced complaint does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Missing or invalid credential. Session-guarded endpoints carry a
    /// redirect target back to the login form instead of a JSON body.
    #[error("{message}")]
    Unauthorized {
        message: String,
        redirect: Option<String>,
    },

    /// Storage engine failure. The driver detail is logged, never exposed.
    #[error("Database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// The external geocoding provider failed or answered garbage.
    #[error("{0}")]
    Upstream(String),

    /// The server is missing configuration the endpoint needs.
    #[error("{0}")]
    Config(String),
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
            redirect: None,
        }
    }

    pub fn login_redirect(requested_path: &str) -> Self {
        AppError::Unauthorized {
            message: "Admin login required.".to_string(),
            redirect: Some(format!("/admin/login?next={}", requested_path)),
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Driver messages name tables and files. Keep them in the log.
            AppError::Persistence(_) => "Database error.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart payload: {}", err))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Persistence(_) | AppError::Upstream(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Unauthorized {
            redirect: Some(target),
            ..
        } = self
        {
            return HttpResponse::Found()
                .insert_header((header::LOCATION, target.as_str()))
                .finish();
        }
        if let AppError::Persistence(source) = self {
            error!("database failure: {}", source);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.public_message(),
        }))
    }
}
