//! The shared-secret capability guarding the machine API. Callers present
//! the key in the `X-API-Key` header; the comparison is constant-time. When
//! the server has no key configured the check is skipped entirely, with a
//! warning logged on every request it waves through.

use crate::config::AppConfig;
use crate::error::AppError;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use log::warn;
use std::future::{ready, Ready};
use subtle::ConstantTimeEq;

pub const API_KEY_HEADER: &str = "X-API-Key";

pub struct ApiKeyGuard;

impl FromRequest for ApiKeyGuard {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<ApiKeyGuard, AppError> {
    let Some(config) = req.app_data::<web::Data<AppConfig>>() else {
        return Err(AppError::Config(
            "Application configuration is missing.".to_string(),
        ));
    };
    let Some(expected) = config.api_key.as_deref() else {
        warn!("API key check skipped because ADMIN_API_KEY is not set on the server.");
        return Ok(ApiKeyGuard);
    };
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    if key_matches(expected, presented) {
        Ok(ApiKeyGuard)
    } else {
        Err(AppError::unauthorized(
            "Unauthorized: Invalid or missing API Key.",
        ))
    }
}

fn key_matches(expected: &str, presented: Option<&str>) -> bool {
    match presented {
        Some(key) => key.as_bytes().ct_eq(expected.as_bytes()).into(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_key_matches() {
        assert!(key_matches("s3cret", Some("s3cret")));
    }

    #[test]
    fn wrong_missing_or_truncated_key_fails() {
        assert!(!key_matches("s3cret", Some("guess")));
        assert!(!key_matches("s3cret", Some("s3cre")));
        assert!(!key_matches("s3cret", Some("")));
        assert!(!key_matches("s3cret", None));
    }
}
