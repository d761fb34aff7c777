//! Product form shared by create and edit.

pub mod draft;
pub mod image;

pub use draft::ProductDraft;
pub use image::{ImagePicker, SelectedImage};

use crate::error::AdminError;
use crate::models::{Product, Session};
use crate::services::ProductService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug)]
pub struct ProductForm {
    mode: FormMode,
    pub draft: ProductDraft,
    pub image: ImagePicker,
    /// Image URL of the record being edited, shown until a new file is picked.
    existing_image: Option<String>,
    seeded_for: Option<String>,
    closed: bool,
}

impl ProductForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: ProductDraft::default(),
            image: ImagePicker::default(),
            existing_image: None,
            seeded_for: None,
            closed: false,
        }
    }

    pub fn edit(product: &Product) -> Self {
        let mut form = Self::create();
        form.seed_from(product);
        form
    }

    /// Seeds the draft from `product` once per product id. Returns whether
    /// seeding happened; a repeat for the same id keeps local edits.
    pub fn seed_from(&mut self, product: &Product) -> bool {
        if self.seeded_for.as_deref() == Some(product.id.as_str()) {
            return false;
        }
        self.mode = FormMode::Edit {
            id: product.id.clone(),
        };
        self.draft = ProductDraft::from_product(product);
        self.image.clear();
        self.existing_image = product.image.clone();
        self.seeded_for = Some(product.id.clone());
        self.closed = false;
        true
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// An edit form closes after a successful update.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Preview of the picked file, or the current image of the edited record.
    pub fn preview(&self) -> Option<&str> {
        self.image.preview().or(self.existing_image.as_deref())
    }

    pub fn reset(&mut self) {
        self.draft = ProductDraft::default();
        self.image.clear();
        self.existing_image = None;
    }

    /// Validates, then creates or updates. Validation failures issue no
    /// request. On failure the draft is kept for a retry.
    pub async fn submit<S>(&mut self, service: &S, session: &Session) -> Result<Product, AdminError>
    where
        S: ProductService + Sync,
    {
        let mut payload = self.draft.validate()?;
        payload.image = self.image.selected().map(SelectedImage::to_upload);

        let result = match &self.mode {
            FormMode::Create => service.create_product(session, &payload).await,
            FormMode::Edit { id } => service.update_product(session, id, &payload).await,
        };

        let product = result?;
        if self.mode == FormMode::Create {
            self.reset();
        } else {
            self.closed = true;
        }
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::product_service::recording::{Call, RecordingService};

    fn session() -> Session {
        Session::new("t0ken", None)
    }

    fn existing() -> Product {
        Product {
            id: "p1".into(),
            name: "Aloe Gel".into(),
            description: "Soothing".into(),
            price: 10.0,
            category: "Face Care".into(),
            image: Some("/uploads/aloe.png".into()),
            in_stock: true,
            date_added: None,
            ingredients: vec!["Aloe".into()],
            benefits: vec![],
        }
    }

    #[tokio::test]
    async fn empty_name_issues_no_request() {
        let svc = RecordingService::default();
        let mut form = ProductForm::create();
        form.draft.description = "desc".into();
        form.draft.price = "3".into();
        form.draft.category = "Oils".into();

        let err = form.submit(&svc, &session()).await.unwrap_err();
        assert!(err.is_validation());
        assert!(svc.calls().is_empty());
    }

    #[tokio::test]
    async fn successful_create_resets_the_draft() {
        let svc = RecordingService::default();
        let mut form = ProductForm::create();
        form.draft = ProductDraft {
            name: "Shea Cream".into(),
            description: "Rich".into(),
            price: "25".into(),
            category: "Body Care".into(),
            in_stock: false,
            ingredients: "Shea".into(),
            benefits: String::new(),
        };
        form.image
            .set(SelectedImage::from_bytes("shea.png", b"png".to_vec()).unwrap());

        let created = form.submit(&svc, &session()).await.unwrap();
        assert_eq!(created.name, "Shea Cream");
        assert!(!created.in_stock);
        assert!(created.image.is_some());
        assert_eq!(svc.calls(), vec![Call::Create("Shea Cream".into())]);
        assert_eq!(form.draft, ProductDraft::default());
        assert!(form.preview().is_none());
    }

    #[tokio::test]
    async fn failed_create_keeps_the_draft() {
        let svc = RecordingService::default();
        svc.fail_mutations();
        let mut form = ProductForm::create();
        form.draft.name = "Rose Oil".into();
        form.draft.description = "Fragrant".into();
        form.draft.price = "40".into();
        form.draft.category = "Oils".into();
        let before = form.draft.clone();

        assert!(form.submit(&svc, &session()).await.is_err());
        assert_eq!(form.draft, before);

        // Nothing is left in flight: the retry issues a second request.
        assert!(form.submit(&svc, &session()).await.is_err());
        assert_eq!(svc.count(&Call::Create("Rose Oil".into())), 2);
    }

    #[tokio::test]
    async fn edit_updates_by_id_and_closes() {
        let svc = RecordingService::with_products(vec![existing()]);
        let mut form = ProductForm::edit(&existing());
        form.draft.price = "12".into();

        let updated = form.submit(&svc, &session()).await.unwrap();
        assert_eq!(updated.price, 12.0);
        assert_eq!(svc.calls(), vec![Call::Update("p1".into())]);
        assert!(form.is_closed());
    }

    #[test]
    fn seeding_happens_once_per_identity() {
        let mut form = ProductForm::edit(&existing());
        assert_eq!(form.preview(), Some("/uploads/aloe.png"));
        form.draft.name = "Aloe Gel Plus".into();

        assert!(!form.seed_from(&existing()));
        assert_eq!(form.draft.name, "Aloe Gel Plus");

        let mut other = existing();
        other.id = "p2".into();
        other.name = "Other".into();
        assert!(form.seed_from(&other));
        assert_eq!(form.draft.name, "Other");
        assert_eq!(form.mode(), &FormMode::Edit { id: "p2".into() });
    }
}
