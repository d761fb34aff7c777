pub mod pagination;
pub mod view;

pub use pagination::Page;
pub use view::{derive_view, distinct_categories, CatalogView, EmptyState, SortKey, ViewQuery};
