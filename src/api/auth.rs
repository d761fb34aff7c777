use reqwest::Method;
use serde_json::json;

use super::client::{ApiClient, RequestBody};
use crate::error::AdminError;

/// `POST /api/auth/admin-login`; returns the bearer token.
pub async fn admin_login(client: &ApiClient, email: &str, password: &str) -> Result<String, AdminError> {
    let body = json!({ "email": email, "password": password });
    let payload = client
        .call(Method::POST, "/api/auth/admin-login", None, RequestBody::Json(body))
        .await?;
    payload
        .get("token")
        .and_then(|t| t.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or(AdminError::Unauthorized)
}
