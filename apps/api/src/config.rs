use std::fmt;

use anyhow::{Context, Result};

pub const DEFAULT_FOLDER_ID: &str = "249026326717";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_HUBSPOT_API_BASE: &str = "https://api.hubapi.com";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Clone)]
pub struct Config {
    pub hubspot_token: String,
    pub gemini_api_key: String,
    pub hubspot_folder_id: String,
    pub gemini_model: String,
    pub hubspot_api_base: String,
    pub gemini_api_base: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            hubspot_token: require_env("HUBSPOT_TOKEN")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            hubspot_folder_id: env_or("HUBSPOT_FOLDER_ID", DEFAULT_FOLDER_ID),
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            hubspot_api_base: env_or("HUBSPOT_API_BASE", DEFAULT_HUBSPOT_API_BASE),
            gemini_api_base: env_or("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", &DEFAULT_MAX_UPLOAD_BYTES.to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

// Hand-written so tokens never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hubspot_token", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("hubspot_folder_id", &self.hubspot_folder_id)
            .field("gemini_model", &self.gemini_model)
            .field("hubspot_api_base", &self.hubspot_api_base)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
