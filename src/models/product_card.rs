use serde::Serialize;

use crate::models::product::Product;

/// Display-ready product for list and overview templates.
#[derive(Serialize, Clone, Debug)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub in_stock: bool,
    pub stock_label: &'static str,
    pub image_url: Option<String>,
    pub added: String,
    pub ingredients: Vec<String>,
    pub edit_url: String,
    pub delete_url: String,
}

impl ProductCard {
    pub fn from_product(p: &Product, image_base_url: &str) -> Self {
        let encoded = urlencoding::encode(&p.id).into_owned();
        Self {
            id: p.id.clone(),
            name: if p.name.is_empty() { "(No Name)".into() } else { p.name.clone() },
            description: p.description.clone(),
            category: if p.category.is_empty() { "(No Category)".into() } else { p.category.clone() },
            price: p.display_price(),
            in_stock: p.in_stock,
            stock_label: p.stock_label(),
            image_url: p.image_url(image_base_url),
            added: p.display_date(),
            ingredients: p.ingredients.iter().take(3).cloned().collect(),
            edit_url: format!("/products/{}/edit", encoded),
            delete_url: format!("/products/{}/delete", encoded),
        }
    }
}
