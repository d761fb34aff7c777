//! In-process fake of the remote product service.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use stockroom::api::{ApiClient, RemoteProductService};

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "s3cret";

#[derive(Clone, Default)]
pub struct FakeStore {
    pub products: Arc<Mutex<Vec<Value>>>,
    pub next_id: Arc<Mutex<u32>>,
    /// Answer the list endpoint with an object instead of an array.
    pub list_as_object: Arc<Mutex<bool>>,
    /// Answer deletes with a plain-text body instead of 204.
    pub text_deletes: Arc<Mutex<bool>>,
}

impl FakeStore {
    pub fn with_products(products: Vec<Value>) -> Self {
        let store = FakeStore::default();
        *store.next_id.lock().unwrap() = products.len() as u32;
        *store.products.lock().unwrap() = products;
        store
    }

    pub fn names(&self) -> Vec<String> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid token"}))).into_response()
}

async fn admin_login(Json(body): Json<Value>) -> Response {
    if body["password"] == PASSWORD {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"}))).into_response()
    }
}

async fn list_products(State(store): State<FakeStore>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if *store.list_as_object.lock().unwrap() {
        return Json(json!({"error": "maintenance"})).into_response();
    }
    Json(Value::Array(store.products.lock().unwrap().clone())).into_response()
}

async fn read_fields(mut multipart: Multipart) -> serde_json::Map<String, Value> {
    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let _ = field.bytes().await.unwrap();
            fields.insert("image".into(), json!(format!("/uploads/{}", file_name)));
            continue;
        }
        let text = field.text().await.unwrap();
        let value = match name.as_str() {
            "price" => json!(text.parse::<f64>().unwrap_or(0.0)),
            "inStock" => json!(text == "true"),
            "ingredients" | "benefits" => {
                json!(text.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).collect::<Vec<_>>())
            }
            _ => json!(text),
        };
        fields.insert(name, value);
    }
    fields
}

async fn create_product(State(store): State<FakeStore>, headers: HeaderMap, multipart: Multipart) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut fields = read_fields(multipart).await;
    let id = {
        let mut next = store.next_id.lock().unwrap();
        *next += 1;
        format!("p{}", next)
    };
    fields.insert("_id".into(), json!(id));
    fields.insert("createdAt".into(), json!("2024-06-01T08:00:00Z"));
    let record = Value::Object(fields);
    store.products.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_product(
    State(store): State<FakeStore>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let fields = read_fields(multipart).await;
    let mut products = store.products.lock().unwrap();
    let Some(existing) = products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Product not found"}))).into_response();
    };
    if let Some(obj) = existing.as_object_mut() {
        obj.extend(fields);
    }
    Json(existing.clone()).into_response()
}

async fn delete_product(State(store): State<FakeStore>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut products = store.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p["_id"] != id.as_str());
    if products.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Product not found"}))).into_response();
    }
    if *store.text_deletes.lock().unwrap() {
        return (StatusCode::OK, "Product deleted").into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_categories() -> Json<Value> {
    Json(json!(["Face Care", "Body Care", "Oils"]))
}

/// Starts the fake service on an ephemeral port.
pub async fn spawn_fake_service(store: FakeStore) -> SocketAddr {
    let app = Router::new()
        .route("/api/auth/admin-login", post(admin_login))
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/:id", put(update_product).delete(delete_product))
        .route("/api/categories", get(list_categories))
        .with_state(store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn service_for(addr: SocketAddr) -> RemoteProductService {
    stockroom::api::client::set_silent(true);
    let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    RemoteProductService::new(client)
}

pub fn seeded() -> Vec<Value> {
    vec![
        json!({
            "_id": "p1",
            "name": "Aloe Gel",
            "description": "Cooling aloe gel",
            "price": 10,
            "category": "Face Care",
            "inStock": true,
            "createdAt": "2024-05-01T12:00:00Z"
        }),
        json!({
            "_id": "p2",
            "name": "Shea Cream",
            "description": "Rich body cream",
            "price": "25.00",
            "category": "Body Care",
            "inStock": false,
            "createdAt": "2024-05-02T12:00:00Z"
        }),
    ]
}
