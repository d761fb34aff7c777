//! Error types shared by the CLI and the web panel.
use std::path::PathBuf;

use thiserror::Error;

/// Local form problems found before any request is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Price must be a number")]
    InvalidPrice(String),

    #[error("Price cannot be negative")]
    NegativePrice,
}

/// Errors that can occur while talking to the product service
/// or preparing a request for it.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request never produced a usable response (connect, timeout, decode).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Not authorized; log in again")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No active session; run `stockroom login` first")]
    NoSession,

    #[error("Failed to read image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image rejected: {0}")]
    ImageRejected(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for AdminError {
    fn from(e: reqwest::Error) -> Self {
        AdminError::Network(e.to_string())
    }
}

/// The user action an error or success is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Load,
    Add,
    Update,
    Delete,
}

impl Action {
    pub fn success_message(self) -> &'static str {
        match self {
            Action::Login => "Login successful",
            Action::Load => "Products loaded",
            Action::Add => "Product added successfully!",
            Action::Update => "Product updated successfully!",
            Action::Delete => "Product deleted successfully!",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Action::Login => "Login failed. Check your email and password.",
            Action::Load => "Failed to fetch products",
            Action::Add => "Failed to add product. Please try again.",
            Action::Update => "Failed to update product. Please try again.",
            Action::Delete => "Failed to delete product. Please try again.",
        }
    }
}

impl AdminError {
    /// Message shown to the user when `action` failed with this error.
    pub fn notice(&self, action: Action) -> String {
        match self {
            AdminError::Validation(v) => v.to_string(),
            AdminError::ImageRejected(reason) => format!("Image rejected: {}", reason),
            AdminError::Image { .. } => self.to_string(),
            AdminError::NoSession | AdminError::Unauthorized if action != Action::Login => {
                format!("{} Your session has expired; log in again.", action.failure_message())
            }
            AdminError::NotFound(_) if matches!(action, Action::Update | Action::Delete) => {
                format!("{} The product no longer exists.", action.failure_message())
            }
            _ => action.failure_message().to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AdminError::Validation(_))
    }
}
