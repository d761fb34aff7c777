use askama::Template;
use crate::models::CurrentUser;
use crate::templates::FormView;

#[derive(Template)]
#[template(path = "product_form.html")]
pub struct ProductFormTemplate {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub title: String,
    pub form: FormView,
    pub cancel_url: String,
}

crate::impl_base_template!(ProductFormTemplate);
