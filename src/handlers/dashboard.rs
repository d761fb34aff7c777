use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::api::RemoteProductService;
use crate::catalog::{EmptyState, SortKey, ViewQuery};
use crate::dashboard::{Dashboard, Tab};
use crate::error::AdminError;
use crate::form::ProductForm;
use crate::models::{AppState, ProductCard};
use crate::templates::{DashboardTemplate, FormView, SelectOption};
use crate::utils::build_query_string;

use super::helpers::{
    build_template_globals, current_session, dashboard_for, expire_session, render_template, TemplateGlobals,
};

/// Products per page on the list tab.
pub const PRODUCTS_PER_PAGE: usize = 12;

#[derive(Deserialize, Debug, Default)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl DashboardQuery {
    pub fn view_query(&self) -> ViewQuery {
        ViewQuery::new(
            self.search.clone().unwrap_or_default(),
            self.category.clone().unwrap_or_default(),
            SortKey::parse(self.sort.as_deref().unwrap_or_default()),
        )
    }

    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
            .max(1)
    }
}

fn list_url(query: &ViewQuery, page: usize) -> String {
    let page = page.to_string();
    format!(
        "/dashboard?{}",
        build_query_string(&[
            ("tab", Tab::Products.as_str()),
            ("search", &query.search),
            ("category", &query.category),
            ("sort", query.sort.as_str()),
            ("page", &page),
        ])
    )
}

/// Renders the dashboard from an already loaded collection.
pub fn render_dashboard(
    state: &AppState,
    jar: &CookieJar,
    dash: &Dashboard<RemoteProductService>,
    query: &ViewQuery,
    page: usize,
    form: &ProductForm,
    form_error: Option<String>,
) -> Response {
    let TemplateGlobals {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(state, jar);

    let overview = dash.overview();
    let view = dash.view(query);
    let paged = view.paginate(page, PRODUCTS_PER_PAGE);

    let mut filter_values = vec![String::new()];
    filter_values.extend(view.categories.iter().filter(|c| !c.is_empty()).cloned());
    let mut category_filters = SelectOption::list(&filter_values, &query.category);
    if let Some(all) = category_filters.first_mut() {
        all.label = "All Categories".into();
    }
    let sort_options = SortKey::ALL
        .iter()
        .map(|k| SelectOption {
            value: k.as_str().to_string(),
            label: k.label().to_string(),
            selected: *k == query.sort,
        })
        .collect();

    let list_state = match view.state() {
        EmptyState::NoProducts => "no-products",
        EmptyState::NoMatches => "no-matches",
        EmptyState::Populated => "populated",
    };

    render_template(DashboardTemplate {
        current_user,
        api_hostname,
        flash_messages,
        has_flash_messages,
        tab: dash.tab().as_str().to_string(),
        load_error: dash.load_error().map(str::to_string),
        total_products: overview.total_products,
        category_count: overview.category_count,
        in_stock: overview.in_stock,
        out_of_stock: overview.out_of_stock,
        recent: overview
            .recent
            .iter()
            .map(|p| ProductCard::from_product(p, &state.image_base_url))
            .collect(),
        form: FormView::from_form(form, dash.categories(), form_error),
        search: query.search.clone(),
        category_filters,
        sort_options,
        list_state: list_state.to_string(),
        cards: paged
            .items
            .iter()
            .map(|p| ProductCard::from_product(p, &state.image_base_url))
            .collect(),
        summary: view.summary(),
        page_label: format!("Page {} of {}", paged.current_page, paged.total_pages),
        prev_url: paged
            .has_previous()
            .then(|| list_url(query, paged.current_page - 1)),
        next_url: paged.has_next().then(|| list_url(query, paged.current_page + 1)),
    })
}

pub async fn dashboard_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<DashboardQuery>,
) -> impl IntoResponse {
    let Some(session) = current_session(&state, &jar) else {
        return Redirect::to("/login").into_response();
    };
    let mut dash = dashboard_for(&state, session);
    dash.select_tab(Tab::parse(params.tab.as_deref().unwrap_or_default()));
    if let Err(e) = dash.refresh().await {
        if matches!(e, AdminError::Unauthorized) {
            expire_session(&state, &jar);
            return Redirect::to("/login").into_response();
        }
        tracing::warn!(%e, "Failed to load products for dashboard");
    }
    dash.load_categories().await;
    render_dashboard(
        &state,
        &jar,
        &dash,
        &params.view_query(),
        params.page(),
        &ProductForm::create(),
        None,
    )
}
