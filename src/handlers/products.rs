use axum::{
    extract::{Form, Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::catalog::ViewQuery;
use crate::dashboard::{Confirmation, DeleteOutcome, Tab};
use crate::error::{Action, AdminError};
use crate::form::ProductForm;
use crate::models::AppState;
use crate::templates::{ConfirmationTemplate, FormView, ProductFormTemplate};

use super::dashboard::render_dashboard;
use super::helpers::{
    build_template_globals, current_session, dashboard_for, expire_session, flash, read_product_multipart,
    render_template, TemplateGlobals,
};

const PRODUCTS_TAB_URL: &str = "/dashboard?tab=products";

/// Reports a failed action: an expired token ends the browser session,
/// anything else becomes a flash notice on the product list.
fn failure_redirect(state: &AppState, jar: &CookieJar, e: &AdminError, action: Action) -> Response {
    if matches!(e, AdminError::Unauthorized) {
        expire_session(state, jar);
        return Redirect::to("/login").into_response();
    }
    tracing::warn!(%e, ?action, "Product action failed");
    flash(state, jar, e.notice(action));
    Redirect::to(PRODUCTS_TAB_URL).into_response()
}

fn render_edit_page(
    state: &AppState,
    jar: &CookieJar,
    form: &ProductForm,
    categories: &[String],
    error: Option<String>,
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(ProductFormTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        title: "Edit Product".into(),
        form: FormView::from_form(form, categories, error),
        cancel_url: PRODUCTS_TAB_URL.into(),
    })
}

pub async fn product_create_post(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> impl IntoResponse {
    let Some(session) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let posted = match read_product_multipart(multipart).await {
        Ok(posted) => posted,
        Err(e) => return failure_redirect(&state, &jar, &e, Action::Add),
    };
    let mut form = ProductForm::create();
    let image_error = posted.apply_to(&mut form);

    let mut dash = dashboard_for(&state, session);
    let result = match image_error {
        Some(e) => Err(e),
        None => dash.submit(&mut form).await,
    };
    match result {
        Ok(product) => {
            tracing::info!(id = %product.id, name = %product.name, "Product created");
            flash(&state, &jar, Action::Add.success_message());
            Redirect::to(PRODUCTS_TAB_URL).into_response()
        }
        Err(AdminError::Unauthorized) => failure_redirect(&state, &jar, &AdminError::Unauthorized, Action::Add),
        Err(e) => {
            // Keep the typed fields and show the add tab again.
            if let Err(load) = dash.refresh().await {
                tracing::warn!(%load, "Failed to load products for dashboard");
            }
            dash.load_categories().await;
            dash.select_tab(Tab::AddProduct);
            render_dashboard(
                &state,
                &jar,
                &dash,
                &ViewQuery::default(),
                1,
                &form,
                Some(e.notice(Action::Add)),
            )
        }
    }
}

pub async fn product_edit_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let mut dash = dashboard_for(&state, session);
    if let Err(e) = dash.refresh().await {
        return failure_redirect(&state, &jar, &e, Action::Load);
    }
    let Some(form) = dash.find(&id).map(ProductForm::edit) else {
        return failure_redirect(&state, &jar, &AdminError::NotFound(id), Action::Update);
    };
    let categories = dash.load_categories().await.to_vec();
    render_edit_page(&state, &jar, &form, &categories, None)
}

pub async fn product_edit_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    multipart: Multipart,
) -> impl IntoResponse {
    let Some(session) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let posted = match read_product_multipart(multipart).await {
        Ok(posted) => posted,
        Err(e) => return failure_redirect(&state, &jar, &e, Action::Update),
    };
    let mut dash = dashboard_for(&state, session);
    if let Err(e) = dash.refresh().await {
        return failure_redirect(&state, &jar, &e, Action::Update);
    }
    let Some(mut form) = dash.find(&id).map(ProductForm::edit) else {
        return failure_redirect(&state, &jar, &AdminError::NotFound(id), Action::Update);
    };
    let image_error = posted.apply_to(&mut form);

    let result = match image_error {
        Some(e) => Err(e),
        None => dash.submit(&mut form).await,
    };
    match result {
        Ok(product) => {
            tracing::info!(id = %product.id, "Product updated");
            flash(&state, &jar, Action::Update.success_message());
            Redirect::to(PRODUCTS_TAB_URL).into_response()
        }
        Err(e @ (AdminError::Unauthorized | AdminError::NotFound(_))) => {
            failure_redirect(&state, &jar, &e, Action::Update)
        }
        Err(e) => {
            let categories = dash.load_categories().await.to_vec();
            render_edit_page(&state, &jar, &form, &categories, Some(e.notice(Action::Update)))
        }
    }
}

pub async fn product_delete_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let mut dash = dashboard_for(&state, session);
    if let Err(e) = dash.refresh().await {
        return failure_redirect(&state, &jar, &e, Action::Load);
    }
    let pending = match dash.request_delete(&id) {
        Ok(pending) => pending.clone(),
        Err(e) => return failure_redirect(&state, &jar, &e, Action::Delete),
    };
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, &jar);
    render_template(ConfirmationTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        title: "Delete Product".into(),
        message: pending.prompt(),
        target_url: format!("/products/{}/delete", urlencoding::encode(&pending.id)),
        confirm_label: "Delete".into(),
        cancel_url: PRODUCTS_TAB_URL.into(),
    })
}

#[derive(Deserialize, Debug, Default)]
pub struct DeleteForm {
    pub confirm: Option<String>,
}

pub async fn product_delete_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<DeleteForm>,
) -> impl IntoResponse {
    let Some(session) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let answer = if crate::utils::parse_flag(form.confirm.as_deref(), false) {
        Confirmation::Yes
    } else {
        Confirmation::No
    };
    let mut dash = dashboard_for(&state, session);
    if let Err(e) = dash.refresh().await {
        return failure_redirect(&state, &jar, &e, Action::Delete);
    }
    if let Err(e) = dash.request_delete(&id) {
        return failure_redirect(&state, &jar, &e, Action::Delete);
    }
    match dash.resolve_delete(answer).await {
        Ok(DeleteOutcome::Deleted { .. }) => {
            flash(&state, &jar, Action::Delete.success_message());
            Redirect::to(PRODUCTS_TAB_URL).into_response()
        }
        Ok(DeleteOutcome::Cancelled) => Redirect::to(PRODUCTS_TAB_URL).into_response(),
        Err(e) => failure_redirect(&state, &jar, &e, Action::Delete),
    }
}
