use std::future::Future;

use crate::error::AdminError;
use crate::models::{Product, ProductPayload, Session};

/// Operations of the remote product service.
///
/// Every call takes the session explicitly; nothing reads a global token.
pub trait ProductService {
    fn list_products(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Vec<Product>, AdminError>> + Send;

    fn create_product(
        &self,
        session: &Session,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<Product, AdminError>> + Send;

    fn update_product(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<Product, AdminError>> + Send;

    fn delete_product(
        &self,
        session: &Session,
        id: &str,
    ) -> impl Future<Output = Result<(), AdminError>> + Send;

    fn list_categories(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<Vec<String>, AdminError>> + Send;
}
