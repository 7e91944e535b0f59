//! Reverse-geocoding relay. A single route, `POST /geocode`, forwarding a
//! coordinate pair to the external provider and translating its answer
//! into the service's uniform response shape.

mod relay;

use actix_web::web::{post, ServiceConfig};

pub fn configure_routes(cfg: &mut ServiceConfig) {
    cfg.route("/geocode", post().to(relay::process));
}
