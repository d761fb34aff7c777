pub mod product_service;
pub mod session_service;

// Re-export commonly used items
pub use product_service::ProductService;
pub use session_service::{random_session_id, login};
