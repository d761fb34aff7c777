pub mod app_state;
pub mod current_user;
pub mod product;
pub mod product_card;
pub mod session;

pub use app_state::AppState;
pub use current_user::CurrentUser;
pub use product::{ImageUpload, Product, ProductPayload};
pub use product_card::ProductCard;
pub use session::{Session, SessionStore, SESSION_TOKEN_KEY};
