mod auth;
mod config;
mod db;
mod error;
mod pages;
mod services;

use crate::config::AppConfig;
use crate::db::ComplaintStore;
use crate::error::AppError;
use actix_files::Files;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::fs;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();

    let upload_dir = config.upload_dir();
    fs::create_dir_all(&upload_dir)?;
    info!("Upload folder path ensured: {}", upload_dir.display());

    let store = ComplaintStore::new(&config.db_path);
    store.init_schema().map_err(io::Error::other)?;
    info!("Database initialized successfully.");

    let bind_addr = (config.host.clone(), config.port);
    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            // The only JSON bodies are {lat,lon} and {status}; malformed
            // ones still get the uniform {success:false,...} shape.
            .app_data(
                web::JsonConfig::default()
                    .limit(16 * 1024)
                    .error_handler(|err, _req| {
                        AppError::Validation(err.to_string()).into()
                    }),
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(store.clone()))
            .configure(services::complaints::configure_routes)
            .configure(services::admin::configure_routes)
            .configure(services::geocode::configure_routes)
            // Uploaded media under the public asset root.
            .service(Files::new("/static", config.static_root.clone()))
            .default_service(web::route().to(pages::serve_embedded))
    })
    .bind(bind_addr)?
    .run()
    .await
}
