//! The session capability: a server-signed cookie proving a successful
//! admin login.
//!
//! The token is `<expiry-unix>.<hex hmac-sha256>` over the expiry, keyed by
//! the configured secret. There is no server-side session table; the
//! signature is the whole proof, verified constant-time on every request.
//! The `AdminSession` extractor is the guard: any handler that takes an
//! `AdminSession` argument rejects unauthenticated callers with a redirect
//! to the login form that preserves the originally requested path.

use crate::config::AppConfig;
use crate::error::AppError;
use actix_web::cookie::time::Duration;
use actix_web::cookie::Cookie;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::future::{ready, Ready};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";
const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Mints a token valid for [`SESSION_TTL_SECS`] from `now`.
pub fn issue_token(secret: &[u8], now: i64) -> Result<String, AppError> {
    let expires = now + SESSION_TTL_SECS;
    let signature = sign(secret, expires)
        .map_err(|_| AppError::Config("Session signing is unavailable.".to_string()))?;
    Ok(format!("{}.{}", expires, signature))
}

/// True only for an untampered, unexpired token.
pub fn verify_token(secret: &[u8], token: &str, now: i64) -> bool {
    let Some((expires_raw, signature)) = token.split_once('.') else {
        return false;
    };
    let Ok(expires) = expires_raw.parse::<i64>() else {
        return false;
    };
    let Ok(expected) = sign(secret, expires) else {
        return false;
    };
    if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        return false;
    }
    expires > now
}

fn sign(secret: &[u8], expires: i64) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(format!("admin:{}", expires).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

/// A Max-Age=0 cookie that makes the browser drop the session.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(Duration::seconds(0))
        .finish()
}

/// Proof of admin login, extracted from the request cookie.
pub struct AdminSession;

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<AdminSession, AppError> {
    let Some(config) = req.app_data::<web::Data<AppConfig>>() else {
        return Err(AppError::Config(
            "Application configuration is missing.".to_string(),
        ));
    };
    let valid = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| verify_token(&config.secret_key, cookie.value(), Utc::now().timestamp()))
        .unwrap_or(false);
    if valid {
        Ok(AdminSession)
    } else {
        Err(AppError::login_redirect(req.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test-secret-key";
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn issued_token_verifies_before_expiry() {
        let token = issue_token(KEY, NOW).unwrap();
        assert!(verify_token(KEY, &token, NOW));
        assert!(verify_token(KEY, &token, NOW + SESSION_TTL_SECS - 1));
    }

    #[test]
    fn token_expires() {
        let token = issue_token(KEY, NOW).unwrap();
        assert!(!verify_token(KEY, &token, NOW + SESSION_TTL_SECS));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(KEY, NOW).unwrap();
        let (expires, signature) = token.split_once('.').unwrap();
        let forged = format!("{}.{}", expires.parse::<i64>().unwrap() + 1, signature);
        assert!(!verify_token(KEY, &forged, NOW));
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let token = issue_token(b"other-key", NOW).unwrap();
        assert!(!verify_token(KEY, &token, NOW));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(!verify_token(KEY, "", NOW));
        assert!(!verify_token(KEY, "no-dot-here", NOW));
        assert!(!verify_token(KEY, "notanumber.abcdef", NOW));
    }
}
