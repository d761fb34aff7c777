use axum::{
    extract::DefaultBodyLimit,
    http::header::CONTENT_TYPE,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::form::image::MAX_IMAGE_BYTES;
use crate::handlers;
use crate::models::AppState;

/// Stylesheet compiled into the binary; `--stylesheet` replaces it at runtime.
pub const DEFAULT_STYLESHEET: &str = include_str!("../static/styles.css");

/// Room for a maximal image plus the text fields of the product form.
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::dashboard_get))
        .route("/products", post(handlers::products::product_create_post))
        .route(
            "/products/:id/edit",
            get(handlers::products::product_edit_get).post(handlers::products::product_edit_post),
        )
        .route(
            "/products/:id/delete",
            get(handlers::products::product_delete_get).post(handlers::products::product_delete_post),
        )
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            handlers::middleware::auth_middleware,
        ));

    let stylesheet_content = state
        .custom_css
        .clone()
        .unwrap_or_else(|| DEFAULT_STYLESHEET.to_string());

    Router::new()
        .route("/", get(handlers::auth::root_get))
        .route("/login", get(handlers::auth::login_get).post(handlers::auth::login_post))
        .route("/logout", post(handlers::auth::logout_post))
        .route(
            "/static/styles.css",
            get(move || {
                let css = stylesheet_content.clone();
                async move { ([(CONTENT_TYPE, "text/css")], css) }
            }),
        )
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
