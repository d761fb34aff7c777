use askama::Template;
use crate::models::{CurrentUser, ProductCard};
use crate::templates::{FormView, SelectOption};

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,

    pub tab: String,
    pub load_error: Option<String>,

    // Overview
    pub total_products: usize,
    pub category_count: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub recent: Vec<ProductCard>,

    // Add product
    pub form: FormView,

    // Product list
    pub search: String,
    pub category_filters: Vec<SelectOption>,
    pub sort_options: Vec<SelectOption>,
    /// "no-products", "no-matches" or "populated".
    pub list_state: String,
    pub cards: Vec<ProductCard>,
    pub summary: String,
    pub page_label: String,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

crate::impl_base_template!(DashboardTemplate);
