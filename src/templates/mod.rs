// Base template trait for inheritance
pub mod base_template;
pub use base_template::BaseTemplate;

pub mod form_view;
pub use form_view::{FormView, SelectOption};

// Individual template files
pub mod login_template;
pub mod dashboard_template;
pub mod product_form_template;
pub mod confirmation_template;

pub use login_template::LoginTemplate;
pub use dashboard_template::DashboardTemplate;
pub use product_form_template::ProductFormTemplate;
pub use confirmation_template::ConfirmationTemplate;
