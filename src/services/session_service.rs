use rand::RngCore;

use crate::api::{admin_login, ApiClient};
use crate::error::AdminError;
use crate::models::Session;

pub fn random_session_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}

/// Exchanges admin credentials for a session. Empty credentials are rejected
/// locally without a request.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<Session, AdminError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AdminError::Unauthorized);
    }
    let token = admin_login(client, email, password).await?;
    tracing::info!(email, "Admin login succeeded");
    Ok(Session::new(token, Some(email.to_string())))
}
