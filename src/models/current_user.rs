use serde::{Deserialize, Serialize};

/// The admin shown in the page header.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
}
