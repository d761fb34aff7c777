use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::api::RemoteProductService;
use crate::dashboard::Dashboard;
use crate::error::AdminError;
use crate::form::{ProductDraft, ProductForm, SelectedImage};
use crate::models::{AppState, CurrentUser, Session};

pub const SESSION_COOKIE: &str = "session_id";

pub fn session_id_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

pub fn current_session(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let sid = session_id_from_jar(jar)?;
    state.session_for(&sid)
}

pub fn take_flash_messages(state: &AppState, jar: &CookieJar) -> Vec<String> {
    let Some(sid) = session_id_from_jar(jar) else {
        return vec![];
    };
    let mut fs = state.flash_store.lock().unwrap();
    fs.remove(&sid).unwrap_or_default()
}

pub fn flash(state: &AppState, jar: &CookieJar, message: impl Into<String>) {
    if let Some(sid) = session_id_from_jar(jar) {
        state.push_flash(&sid, message);
    }
}

pub fn build_current_user(state: &AppState, jar: &CookieJar) -> Option<CurrentUser> {
    let session = current_session(state, jar)?;
    Some(CurrentUser {
        email: session.email().unwrap_or("admin").to_string(),
    })
}

#[derive(Default)]
pub struct TemplateGlobals {
    pub current_user: Option<CurrentUser>,
    pub api_hostname: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
}

pub fn build_template_globals(state: &AppState, jar: &CookieJar) -> TemplateGlobals {
    let current_user = build_current_user(state, jar);
    let flash_messages = take_flash_messages(state, jar);
    let has_flash_messages = !flash_messages.is_empty();
    TemplateGlobals {
        current_user,
        api_hostname: crate::utils::hostname_from_url(&state.api_base_url),
        flash_messages,
        has_flash_messages,
    }
}

pub fn render_template<T: askama::Template>(t: T) -> Response {
    match t.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Template render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// A dashboard bound to the caller's service session.
pub fn dashboard_for(state: &AppState, session: Session) -> Dashboard<RemoteProductService> {
    Dashboard::new(state.service.clone(), session)
}

/// Fields of a posted product form. A checkbox that is absent means unchecked.
/// A rejected image is kept aside so the typed fields survive for a retry.
#[derive(Debug, Default)]
pub struct PostedProduct {
    pub draft: ProductDraft,
    pub image: Option<SelectedImage>,
    pub image_error: Option<AdminError>,
}

fn upload_error(e: axum::extract::multipart::MultipartError) -> AdminError {
    AdminError::ImageRejected(format!("unreadable form upload: {}", e))
}

pub async fn read_product_multipart(mut multipart: Multipart) -> Result<PostedProduct, AdminError> {
    let mut posted = PostedProduct {
        draft: ProductDraft {
            in_stock: false,
            ..ProductDraft::default()
        },
        ..PostedProduct::default()
    };
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(upload_error)?;
            // Browsers send an empty part when no file was chosen.
            if file_name.is_empty() || bytes.is_empty() {
                continue;
            }
            match SelectedImage::from_bytes(&file_name, bytes.to_vec()) {
                Ok(image) => posted.image = Some(image),
                Err(e) => posted.image_error = Some(e),
            }
            continue;
        }
        let value = field.text().await.map_err(upload_error)?;
        match name.as_str() {
            "name" => posted.draft.name = value,
            "description" => posted.draft.description = value,
            "price" => posted.draft.price = value,
            "category" => posted.draft.category = value,
            "inStock" => posted.draft.in_stock = crate::utils::parse_flag(Some(value.as_str()), true),
            "ingredients" => posted.draft.ingredients = value,
            "benefits" => posted.draft.benefits = value,
            _ => {}
        }
    }
    Ok(posted)
}

impl PostedProduct {
    /// Moves the posted fields into `form`. Returns the image error, if any.
    pub fn apply_to(self, form: &mut ProductForm) -> Option<AdminError> {
        form.draft = self.draft;
        if let Some(image) = self.image {
            form.image.set(image);
        }
        self.image_error
    }
}

/// Drops the browser session after the service rejected its token.
pub fn expire_session(state: &AppState, jar: &CookieJar) {
    if let Some(sid) = session_id_from_jar(jar) {
        state.sessions.lock().unwrap().remove(&sid);
        state.flash_store.lock().unwrap().remove(&sid);
    }
}
