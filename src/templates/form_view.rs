use crate::form::{FormMode, ProductForm};

/// Select option with its selected state resolved up front.
#[derive(Clone, Debug)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn list<I, S>(values: I, current: &str) -> Vec<SelectOption>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        values
            .into_iter()
            .map(|v| {
                let v = v.as_ref();
                SelectOption {
                    value: v.to_string(),
                    label: v.to_string(),
                    selected: v == current,
                }
            })
            .collect()
    }
}

/// Product form fields as rendered by the add and edit pages.
#[derive(Clone, Debug)]
pub struct FormView {
    pub action_url: String,
    pub submit_label: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub in_stock: bool,
    pub ingredients: String,
    pub benefits: String,
    pub preview: Option<String>,
    pub categories: Vec<SelectOption>,
    pub error: Option<String>,
}

impl FormView {
    pub fn from_form(form: &ProductForm, categories: &[String], error: Option<String>) -> Self {
        let (action_url, submit_label) = match form.mode() {
            FormMode::Create => ("/products".to_string(), "Add Product".to_string()),
            FormMode::Edit { id } => (
                format!("/products/{}/edit", urlencoding::encode(id)),
                "Save Changes".to_string(),
            ),
        };
        let mut options: Vec<String> = categories.to_vec();
        // Keep a category the record already has even if the service no longer lists it.
        if !form.draft.category.is_empty() && !options.contains(&form.draft.category) {
            options.push(form.draft.category.clone());
        }
        Self {
            action_url,
            submit_label,
            name: form.draft.name.clone(),
            description: form.draft.description.clone(),
            price: form.draft.price.clone(),
            in_stock: form.draft.in_stock,
            ingredients: form.draft.ingredients.clone(),
            benefits: form.draft.benefits.clone(),
            preview: form.preview().map(str::to_string),
            categories: SelectOption::list(&options, &form.draft.category),
            error,
        }
    }
}
