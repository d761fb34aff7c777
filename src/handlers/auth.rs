use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::error::Action;
use crate::models::AppState;
use crate::services::{login, random_session_id};
use crate::templates::LoginTemplate;

use super::helpers::{build_template_globals, current_session, render_template, TemplateGlobals, SESSION_COOKIE};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn login_page(state: &AppState, jar: &CookieJar, email: String, error: Option<String>) -> axum::response::Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);
    render_template(LoginTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        email,
        error,
    })
}

pub async fn login_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if current_session(&state, &jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    login_page(&state, &jar, String::new(), None)
}

pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    let client = state.service.client();
    match login(client, &form.email, &form.password).await {
        Ok(session) => {
            let sid = random_session_id();
            state.sessions.lock().unwrap().insert(sid.clone(), session);
            state.push_flash(&sid, Action::Login.success_message());
            let mut cookie = Cookie::new(SESSION_COOKIE, sid);
            cookie.set_path("/");
            cookie.set_http_only(true);
            (jar.add(cookie), Redirect::to("/dashboard")).into_response()
        }
        Err(e) => {
            tracing::warn!(%e, email = %form.email.trim(), "Admin login failed");
            login_page(&state, &jar, form.email, Some(e.notice(Action::Login)))
        }
    }
}

pub async fn logout_post(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(sid) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        state.sessions.lock().unwrap().remove(&sid);
        state.flash_store.lock().unwrap().remove(&sid);
    }
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    let cleared = jar.remove(removal);
    (cleared, Redirect::to("/login")).into_response()
}

pub async fn root_get(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if current_session(&state, &jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    Redirect::to("/login").into_response()
}
