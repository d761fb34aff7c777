use reqwest::Method;
use serde_json::Value;

use super::client::{ApiClient, RequestBody};
use crate::error::AdminError;
use crate::models::{Product, ProductPayload, Session};
use crate::services::ProductService;

/// [`ProductService`] backed by the remote HTTP API.
#[derive(Clone, Debug)]
pub struct RemoteProductService {
    client: ApiClient,
}

impl RemoteProductService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn product_endpoint(id: &str) -> String {
    format!("/api/products/{}", urlencoding::encode(id))
}

/// Decodes a list response. Anything but a JSON array is an empty collection;
/// elements that do not decode as a product are skipped.
pub fn decode_products(payload: Value) -> Vec<Product> {
    let Value::Array(items) = payload else {
        tracing::warn!("Product list response is not an array; treating as empty");
        return Vec::new();
    };
    items
        .into_iter()
        .filter(|item| item.is_object())
        .filter_map(|item| match serde_json::from_value::<Product>(item) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(%e, "Skipping undecodable product");
                None
            }
        })
        .collect()
}

/// Decodes a create/update response, accepting a bare record or `{ "product": {...} }`.
fn decode_single(payload: Value) -> Option<Product> {
    let record = match payload {
        Value::Object(mut obj) if obj.contains_key("product") => obj.remove("product")?,
        other => other,
    };
    if !record.is_object() {
        return None;
    }
    serde_json::from_value(record).ok()
}

fn echo_payload(id: &str, payload: &ProductPayload) -> Product {
    Product {
        id: id.to_string(),
        name: payload.name.clone(),
        description: payload.description.clone(),
        price: payload.price,
        category: payload.category.clone(),
        image: None,
        in_stock: payload.in_stock,
        date_added: None,
        ingredients: payload.ingredients.clone(),
        benefits: payload.benefits.clone(),
    }
}

pub fn decode_categories(payload: Value) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    if let Some(arr) = payload.as_array() {
        for item in arr {
            let name = item
                .as_str()
                .map(str::to_string)
                .or_else(|| item.get("name").and_then(|v| v.as_str()).map(str::to_string))
                .unwrap_or_default();
            let name = name.trim().to_string();
            if !name.is_empty() && !out.contains(&name) {
                out.push(name);
            }
        }
    }
    out
}

impl ProductService for RemoteProductService {
    async fn list_products(&self, session: &Session) -> Result<Vec<Product>, AdminError> {
        let payload = self
            .client
            .call(Method::GET, "/api/products", Some(session), RequestBody::Empty)
            .await?;
        Ok(decode_products(payload))
    }

    async fn create_product(&self, session: &Session, payload: &ProductPayload) -> Result<Product, AdminError> {
        let resp = self
            .client
            .call(Method::POST, "/api/products", Some(session), RequestBody::Multipart(payload))
            .await?;
        Ok(decode_single(resp).unwrap_or_else(|| echo_payload("", payload)))
    }

    async fn update_product(&self, session: &Session, id: &str, payload: &ProductPayload) -> Result<Product, AdminError> {
        let resp = self
            .client
            .call(Method::PUT, &product_endpoint(id), Some(session), RequestBody::Multipart(payload))
            .await?;
        Ok(decode_single(resp).unwrap_or_else(|| echo_payload(id, payload)))
    }

    async fn delete_product(&self, session: &Session, id: &str) -> Result<(), AdminError> {
        self.client
            .call(Method::DELETE, &product_endpoint(id), Some(session), RequestBody::Empty)
            .await?;
        Ok(())
    }

    async fn list_categories(&self, session: &Session) -> Result<Vec<String>, AdminError> {
        let payload = self
            .client
            .call(Method::GET, "/api/categories", Some(session), RequestBody::Empty)
            .await?;
        Ok(decode_categories(payload))
    }
}
