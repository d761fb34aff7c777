use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_IMAGE_BASE_URL: &str = "";
pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Categories offered by the product form when the remote service has none.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Face Care",
    "Body Care",
    "Hair Care",
    "Skincare",
    "Moisturizers",
    "Cleansers",
    "Serums",
    "Oils",
    "Masks",
];

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

/// Prefix for relative image paths returned by the product service.
/// Empty means image URLs are used exactly as returned.
pub fn get_image_base_url() -> String {
    env::var("IMAGE_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

pub fn get_session_file() -> PathBuf {
    let raw = env::var("SESSION_FILE").unwrap_or_default();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        PathBuf::from(DEFAULT_SESSION_FILE)
    } else {
        PathBuf::from(trimmed)
    }
}

pub fn get_request_timeout() -> Duration {
    let secs = env::var("REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

pub fn get_admin_password() -> Option<String> {
    env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty())
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:5000".to_string()
    } else {
        trimmed.to_string()
    }
}
