//! The relay call itself. One request/response per call, no retry;
//! provider failures surface immediately as a uniform error and never
//! crash the caller.
//!
//! Provider status mapping:
//! - `OK` with results: success with the first formatted address
//! - `ZERO_RESULTS`: success with a sentinel "no address" message
//! - anything else: upstream failure carrying the provider status and message
//! - network or shape trouble: generic upstream failure, detail logged

use crate::config::AppConfig;
use crate::error::AppError;
use actix_web::{web, HttpResponse};
use common::requests::{GeocodeRequest, GeocodeResponse};
use log::error;
use serde::Deserialize;

const PROVIDER_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const NO_ADDRESS_SENTINEL: &str = "No address found for these coordinates.";

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    status: String,
    #[serde(default)]
    results: Vec<ProviderResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderResult {
    formatted_address: String,
}

pub async fn process(
    config: web::Data<AppConfig>,
    body: web::Json<GeocodeRequest>,
) -> Result<HttpResponse, AppError> {
    let Some(api_key) = config.google_api_key.as_deref() else {
        return Err(AppError::Config(
            "Server is not configured with a Google API key.".to_string(),
        ));
    };
    let (Some(lat), Some(lon)) = (body.lat, body.lon) else {
        return Err(AppError::Validation(
            "Latitude and longitude not provided.".to_string(),
        ));
    };

    let url = format!("{}?latlng={},{}&key={}", PROVIDER_URL, lat, lon, api_key);

    let response = reqwest::get(&url)
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| {
            error!("HTTP request error calling the geocoding API: {}", err);
            AppError::Upstream("Network error fetching location.".to_string())
        })?;

    let provider: ProviderResponse = response.json().await.map_err(|err| {
        error!("Unexpected geocoding response shape: {}", err);
        AppError::Upstream("Unexpected response from the geocoding service.".to_string())
    })?;

    let reply = map_provider_response(provider, lat, lon)?;
    Ok(HttpResponse::Ok().json(reply))
}

fn map_provider_response(
    mut provider: ProviderResponse,
    lat: f64,
    lon: f64,
) -> Result<GeocodeResponse, AppError> {
    match provider.status.as_str() {
        "OK" if !provider.results.is_empty() => {
            let first = provider.results.remove(0);
            Ok(GeocodeResponse {
                success: true,
                address: first.formatted_address,
                lat,
                lon,
            })
        }
        // Valid coordinates that simply resolve to nothing are a success.
        "ZERO_RESULTS" => Ok(GeocodeResponse {
            success: true,
            address: NO_ADDRESS_SENTINEL.to_string(),
            lat,
            lon,
        }),
        _ => {
            let message = provider
                .error_message
                .as_deref()
                .unwrap_or("No specific error message.");
            Err(AppError::Upstream(format!(
                "Geocoding API error: {} (Status: {})",
                message, provider.status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider(value: serde_json::Value) -> ProviderResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ok_with_results_yields_the_first_address() {
        let response = provider(json!({
            "status": "OK",
            "results": [
                {"formatted_address": "1 Main St, Springfield"},
                {"formatted_address": "2 Side St, Springfield"}
            ]
        }));
        let reply = map_provider_response(response, 12.9, 77.5).unwrap();
        assert!(reply.success);
        assert_eq!(reply.address, "1 Main St, Springfield");
        assert_eq!(reply.lat, 12.9);
        assert_eq!(reply.lon, 77.5);
    }

    #[test]
    fn zero_results_is_a_success_with_the_sentinel() {
        let response = provider(json!({"status": "ZERO_RESULTS", "results": []}));
        let reply = map_provider_response(response, 0.0, 0.0).unwrap();
        assert!(reply.success);
        assert_eq!(reply.address, NO_ADDRESS_SENTINEL);
    }

    #[test]
    fn error_status_carries_provider_status_and_message() {
        let response = provider(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        let err = map_provider_response(response, 0.0, 0.0).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("REQUEST_DENIED"));
        assert!(message.contains("The provided API key is invalid."));
    }

    #[test]
    fn ok_without_results_is_treated_as_a_provider_error() {
        let response = provider(json!({"status": "OK", "results": []}));
        let err = map_provider_response(response, 0.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("Status: OK"));
    }
}
