//! Read-only derived view of a product collection: search, category filter
//! and sort. Pure functions of their inputs; the collection is never mutated.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::pagination::Page;
use crate::models::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    Name,
    PriceHigh,
    PriceLow,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::Name,
        SortKey::PriceHigh,
        SortKey::PriceLow,
    ];

    /// Parses the wire/query form; unknown values fall back to `Newest`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "oldest" => Self::Oldest,
            "name" => Self::Name,
            "price-high" => Self::PriceHigh,
            "price-low" => Self::PriceLow,
            _ => Self::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Name => "name",
            Self::PriceHigh => "price-high",
            Self::PriceLow => "price-low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::Oldest => "Oldest First",
            Self::Name => "Name (A-Z)",
            Self::PriceHigh => "Price (High to Low)",
            Self::PriceLow => "Price (Low to High)",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Newest => b.sort_timestamp().cmp(&a.sort_timestamp()),
            Self::Oldest => a.sort_timestamp().cmp(&b.sort_timestamp()),
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            Self::PriceHigh => b.price.total_cmp(&a.price),
            Self::PriceLow => a.price.total_cmp(&b.price),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search term, category filter (empty = all) and sort key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub category: String,
    pub sort: SortKey,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, category: impl Into<String>, sort: SortKey) -> Self {
        Self {
            search: search.into(),
            category: category.into(),
            sort,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = product.name.to_lowercase().contains(&needle)
            || product.description.to_lowercase().contains(&needle);
        let matches_category = self.category.is_empty() || product.category == self.category;
        matches_search && matches_category
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself is empty.
    NoProducts,
    /// The collection has products but none pass the filters.
    NoMatches,
    Populated,
}

/// Result of [`derive_view`]: borrowed products in display order.
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    pub items: Vec<&'a Product>,
    pub categories: Vec<String>,
    pub total: usize,
}

impl<'a> CatalogView<'a> {
    pub fn state(&self) -> EmptyState {
        if self.total == 0 {
            EmptyState::NoProducts
        } else if self.items.is_empty() {
            EmptyState::NoMatches
        } else {
            EmptyState::Populated
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} products", self.items.len(), self.total)
    }

    pub fn paginate(&self, page: usize, per_page: usize) -> Page<&'a Product> {
        Page::of(&self.items, page, per_page)
    }
}

/// Distinct categories in first-seen order; a missing category is `""`.
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for p in products {
        if !out.iter().any(|c| c == &p.category) {
            out.push(p.category.clone());
        }
    }
    out
}

pub fn derive_view<'a>(products: &'a [Product], query: &ViewQuery) -> CatalogView<'a> {
    let mut items: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    // `sort_by` is stable: equal keys keep collection order.
    items.sort_by(|a, b| query.sort.compare(a, b));
    CatalogView {
        items,
        categories: distinct_categories(products),
        total: products.len(),
    }
}
