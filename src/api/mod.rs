// Remote product service API
pub mod client;
pub mod auth;
pub mod products;

// Re-export commonly used items
pub use client::{ApiClient, RequestBody};
pub use auth::admin_login;
pub use products::RemoteProductService;
