//! Dashboard orchestration: owns the product collection, refetches it after
//! every successful mutation and runs the delete confirmation flow.
//!
//! The collection is a cache of the remote service. It is never patched
//! locally; a mutation bumps the refresh generation and the whole list is
//! fetched again. Load results are applied only if they belong to the most
//! recently issued load, so a slow response never overwrites a newer one.

use std::fmt;

use crate::catalog::{derive_view, distinct_categories, CatalogView, SortKey, ViewQuery};
use crate::config::DEFAULT_CATEGORIES;
use crate::error::{Action, AdminError};
use crate::form::ProductForm;
use crate::models::{Product, Session};
use crate::services::ProductService;

/// Number of products listed under "Recent Activity".
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Overview,
    AddProduct,
    Products,
}

impl Tab {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "add-product" => Tab::AddProduct,
            "products" => Tab::Products,
            _ => Tab::Overview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::AddProduct => "add-product",
            Tab::Products => "products",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issued by [`Dashboard::begin_load`]; only the latest ticket is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\"? This action cannot be undone.",
            self.name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { id: String, name: String },
    Cancelled,
}

/// Aggregate numbers for the overview tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_products: usize,
    pub category_count: usize,
    pub in_stock: usize,
    pub out_of_stock: usize,
    pub recent: Vec<Product>,
}

pub struct Dashboard<S> {
    service: S,
    session: Session,
    products: Vec<Product>,
    categories: Vec<String>,
    tab: Tab,
    generation: u64,
    load_seq: u64,
    load_error: Option<String>,
    pending_delete: Option<PendingDelete>,
}

impl<S> Dashboard<S>
where
    S: ProductService + Sync,
{
    pub fn new(service: S, session: Session) -> Self {
        Self {
            service,
            session,
            products: Vec::new(),
            categories: Vec::new(),
            tab: Tab::default(),
            generation: 0,
            load_seq: 0,
            load_error: None,
            pending_delete: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Incremented after every successful create, update or delete.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Notice for the most recent applied load, if it failed.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        LoadTicket { seq: self.load_seq }
    }

    /// Applies a finished load. `Ok(false)` means a newer load was issued
    /// after this one (or the dashboard was closed) and the result was dropped.
    /// A failed load leaves the current collection in place.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Product>, AdminError>,
    ) -> Result<bool, AdminError> {
        if ticket.seq != self.load_seq {
            tracing::debug!(ticket = ticket.seq, current = self.load_seq, "Ignoring stale product load");
            return Ok(false);
        }
        match result {
            Ok(products) => {
                self.products = products;
                self.load_error = None;
                Ok(true)
            }
            Err(e) => {
                self.load_error = Some(e.notice(Action::Load));
                Err(e)
            }
        }
    }

    /// Fetches the full collection.
    pub async fn refresh(&mut self) -> Result<(), AdminError> {
        let ticket = self.begin_load();
        let result = self.service.list_products(&self.session).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Invalidates loads still in flight, e.g. when the view is torn down.
    pub fn close(&mut self) {
        self.load_seq += 1;
    }

    /// Loads category options, falling back to the built-in list.
    pub async fn load_categories(&mut self) -> &[String] {
        self.categories = match self.service.list_categories(&self.session).await {
            Ok(cats) if !cats.is_empty() => cats,
            Ok(_) => default_categories(),
            Err(e) => {
                tracing::warn!(%e, "Failed to load categories; using defaults");
                default_categories()
            }
        };
        &self.categories
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn view(&self, query: &ViewQuery) -> CatalogView<'_> {
        derive_view(&self.products, query)
    }

    pub fn overview(&self) -> Overview {
        let in_stock = self.products.iter().filter(|p| p.in_stock).count();
        let recent = derive_view(&self.products, &ViewQuery::new("", "", SortKey::Newest))
            .items
            .into_iter()
            .take(RECENT_LIMIT)
            .cloned()
            .collect();
        Overview {
            total_products: self.products.len(),
            category_count: distinct_categories(&self.products)
                .iter()
                .filter(|c| !c.is_empty())
                .count(),
            in_stock,
            out_of_stock: self.products.len() - in_stock,
            recent,
        }
    }

    /// Submits the form and, on success, refetches the collection once.
    pub async fn submit(&mut self, form: &mut ProductForm) -> Result<Product, AdminError> {
        let product = form.submit(&self.service, &self.session).await?;
        self.after_mutation().await;
        Ok(product)
    }

    /// First step of a delete: remember which product awaits confirmation.
    pub fn request_delete(&mut self, id: &str) -> Result<&PendingDelete, AdminError> {
        let product = self
            .find(id)
            .ok_or_else(|| AdminError::NotFound(id.to_string()))?;
        let pending = PendingDelete {
            id: product.id.clone(),
            name: product.name.clone(),
        };
        Ok(self.pending_delete.insert(pending))
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    /// Second step of a delete. `No` (or nothing pending) issues no request.
    /// On failure the collection is left untouched.
    pub async fn resolve_delete(&mut self, answer: Confirmation) -> Result<DeleteOutcome, AdminError> {
        let Some(pending) = self.pending_delete.take() else {
            return Ok(DeleteOutcome::Cancelled);
        };
        if answer == Confirmation::No {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.service.delete_product(&self.session, &pending.id).await?;
        tracing::info!(id = %pending.id, "Product deleted");
        self.after_mutation().await;
        Ok(DeleteOutcome::Deleted {
            id: pending.id,
            name: pending.name,
        })
    }

    async fn after_mutation(&mut self) {
        self.generation += 1;
        if let Err(e) = self.refresh().await {
            tracing::warn!(%e, generation = self.generation, "Refetch after mutation failed");
        }
    }
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::product_service::recording::{Call, RecordingService};
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str, category: &str, price: f64, day: u32) -> Product {
        Product {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            category: category.into(),
            image: None,
            in_stock: day % 2 == 0,
            date_added: Some(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()),
            ingredients: vec![],
            benefits: vec![],
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Aloe Gel", "Face Care", 10.0, 1),
            product("2", "Shea Cream", "Body Care", 25.0, 2),
        ]
    }

    async fn loaded(svc: &RecordingService) -> Dashboard<RecordingService> {
        let mut dash = Dashboard::new(svc.clone(), Session::new("tok", None));
        dash.refresh().await.unwrap();
        dash
    }

    #[tokio::test]
    async fn confirmed_delete_calls_service_and_refetches_once() {
        let svc = RecordingService::with_products(catalog());
        let mut dash = loaded(&svc).await;

        let pending = dash.request_delete("2").unwrap();
        assert!(pending.prompt().contains("Shea Cream"));
        let outcome = dash.resolve_delete(Confirmation::Yes).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted { id: "2".into(), name: "Shea Cream".into() });
        assert_eq!(svc.calls(), vec![Call::List, Call::Delete("2".into()), Call::List]);
        assert_eq!(dash.generation(), 1);
        assert_eq!(dash.products().len(), 1);
    }

    #[tokio::test]
    async fn declined_delete_issues_no_request() {
        let svc = RecordingService::with_products(catalog());
        let mut dash = loaded(&svc).await;

        dash.request_delete("1").unwrap();
        let outcome = dash.resolve_delete(Confirmation::No).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(svc.calls(), vec![Call::List]);
        assert!(dash.pending_delete().is_none());
        assert_eq!(dash.generation(), 0);
    }

    #[tokio::test]
    async fn failed_delete_leaves_collection_unchanged() {
        let svc = RecordingService::with_products(catalog());
        let mut dash = loaded(&svc).await;
        svc.fail_mutations();

        dash.request_delete("1").unwrap();
        let err = dash.resolve_delete(Confirmation::Yes).await.unwrap_err();
        assert!(matches!(err, AdminError::Network(_)));
        assert_eq!(dash.products(), catalog().as_slice());
        assert_eq!(svc.count(&Call::List), 1);
        assert_eq!(dash.generation(), 0);
    }

    #[tokio::test]
    async fn unknown_product_cannot_be_deleted() {
        let svc = RecordingService::with_products(catalog());
        let mut dash = loaded(&svc).await;
        assert!(matches!(dash.request_delete("nope"), Err(AdminError::NotFound(_))));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_service() {
        let svc = RecordingService::with_products(catalog());
        let mut dash = Dashboard::new(svc.clone(), Session::new("tok", None));
        let mut form = ProductForm::create();
        form.draft.description = "No name".into();
        form.draft.price = "1".into();
        form.draft.category = "Oils".into();

        assert!(dash.submit(&mut form).await.unwrap_err().is_validation());
        assert!(svc.calls().is_empty());
        assert_eq!(dash.generation(), 0);
    }

    #[tokio::test]
    async fn successful_create_bumps_generation_and_refetches() {
        let svc = RecordingService::with_products(catalog());
        let mut dash = loaded(&svc).await;
        let mut form = ProductForm::create();
        form.draft.name = "Rose Oil".into();
        form.draft.description = "Fragrant".into();
        form.draft.price = "40".into();
        form.draft.category = "Oils".into();

        dash.submit(&mut form).await.unwrap();
        assert_eq!(dash.generation(), 1);
        assert_eq!(svc.count(&Call::List), 2);
        assert_eq!(dash.products().len(), 3);
    }

    #[test]
    fn stale_loads_are_ignored() {
        let svc = RecordingService::default();
        let mut dash = Dashboard::new(svc, Session::new("tok", None));
        let slow = dash.begin_load();
        let fast = dash.begin_load();

        assert!(dash.finish_load(fast, Ok(catalog())).unwrap());
        assert!(!dash.finish_load(slow, Ok(vec![])).unwrap());
        assert_eq!(dash.products().len(), 2);

        let late = dash.begin_load();
        dash.close();
        assert!(!dash.finish_load(late, Ok(vec![])).unwrap());
        assert_eq!(dash.products().len(), 2);
    }

    #[test]
    fn failed_load_keeps_previous_collection() {
        let mut dash = Dashboard::new(RecordingService::default(), Session::new("tok", None));
        let first = dash.begin_load();
        dash.finish_load(first, Ok(catalog())).unwrap();
        let second = dash.begin_load();
        assert!(dash
            .finish_load(second, Err(AdminError::Network("timeout".into())))
            .is_err());
        assert_eq!(dash.products().len(), 2);
        assert_eq!(dash.load_error(), Some("Failed to fetch products"));
    }

    #[tokio::test]
    async fn overview_counts() {
        let mut products = catalog();
        products.push(product("3", "Mystery", "", 3.0, 3));
        let svc = RecordingService::with_products(products);
        let dash = loaded(&svc).await;
        let overview = dash.overview();
        assert_eq!(overview.total_products, 3);
        assert_eq!(overview.category_count, 2);
        assert_eq!(overview.in_stock, 1);
        assert_eq!(overview.out_of_stock, 2);
        let recent: Vec<&str> = overview.recent.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(recent, vec!["Mystery", "Shea Cream", "Aloe Gel"]);
    }

    #[tokio::test]
    async fn empty_category_list_falls_back_to_defaults() {
        let svc = RecordingService::default();
        let mut dash = Dashboard::new(svc, Session::new("tok", None));
        let cats = dash.load_categories().await;
        assert_eq!(cats.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(cats[0], "Face Care");
    }

    #[test]
    fn tab_parsing() {
        assert_eq!(Tab::parse("add-product"), Tab::AddProduct);
        assert_eq!(Tab::parse("products"), Tab::Products);
        assert_eq!(Tab::parse("whatever"), Tab::Overview);
    }
}
