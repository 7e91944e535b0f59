//! Process configuration, read from the environment exactly once in `main`
//! and injected into handlers as `web::Data<AppConfig>`. Handlers never go
//! back to `std::env`.

use crate::auth::password;
use log::warn;
use rand::RngCore;
use std::env;
use std::path::PathBuf;

/// Immutable runtime configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file backing the complaint store.
    pub db_path: PathBuf,
    /// Public asset root served at `/static`. Uploaded media lives below it.
    pub static_root: PathBuf,
    /// Upload location relative to `static_root`; also the prefix of every
    /// stored `file_path`.
    pub upload_subdir: String,
    /// Key signing the admin session cookie.
    pub secret_key: Vec<u8>,
    pub admin_username: String,
    /// Salted hash of the admin password. The plaintext is dropped after
    /// hashing at startup.
    pub admin_password_hash: String,
    /// Shared secret for the machine API. `None` disables the check.
    pub api_key: Option<String>,
    /// Key for the external geocoding provider. `None` fails `/geocode`
    /// calls with a configuration error.
    pub google_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret_key = match nonempty_var("SECRET_KEY") {
            Some(value) => value.into_bytes(),
            None => {
                warn!(
                    "SECRET_KEY environment variable not set. Using a random per-process key; \
                     admin sessions will not survive a restart."
                );
                let mut key = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut key);
                key.to_vec()
            }
        };

        let api_key = nonempty_var("ADMIN_API_KEY");
        if api_key.is_none() {
            warn!(
                "ADMIN_API_KEY environment variable not set. \
                 External API endpoint (/api/complaints) will not be secured."
            );
        }

        let google_api_key = nonempty_var("GOOGLE_API_KEY");
        if google_api_key.is_none() {
            warn!("GOOGLE_API_KEY environment variable not set. Geocoding will not work.");
        }

        let admin_username = nonempty_var("ADMIN_USERNAME").unwrap_or_else(|| "Admin".to_string());
        let admin_password =
            nonempty_var("ADMIN_PASSWORD").unwrap_or_else(|| "pass".to_string());
        let admin_password_hash = password::hash_password(&admin_password);

        let port = nonempty_var("PORT")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);

        AppConfig {
            host: nonempty_var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            db_path: nonempty_var("DATABASE")
                .unwrap_or_else(|| "complaints.db".to_string())
                .into(),
            static_root: PathBuf::from("static"),
            upload_subdir: nonempty_var("UPLOAD_FOLDER")
                .unwrap_or_else(|| "uploads/img".to_string()),
            secret_key,
            admin_username,
            admin_password_hash,
            api_key,
            google_api_key,
        }
    }

    /// Absolute-ish directory media files are written to.
    pub fn upload_dir(&self) -> PathBuf {
        self.static_root.join(&self.upload_subdir)
    }
}

fn nonempty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
