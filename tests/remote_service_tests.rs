mod common;

use stockroom::catalog::{SortKey, ViewQuery};
use stockroom::dashboard::{Confirmation, Dashboard, DeleteOutcome};
use stockroom::error::AdminError;
use stockroom::form::{ProductForm, SelectedImage};
use stockroom::models::Session;
use stockroom::services::{login, ProductService};

use common::{seeded, service_for, spawn_fake_service, FakeStore, PASSWORD, TOKEN};

fn session() -> Session {
    Session::new(TOKEN, Some("admin@example.com".into()))
}

#[tokio::test]
async fn login_returns_a_session_with_the_token() {
    let addr = spawn_fake_service(FakeStore::default()).await;
    let service = service_for(addr);

    let session = login(service.client(), "admin@example.com", PASSWORD).await.unwrap();
    assert_eq!(session.token(), TOKEN);
    assert_eq!(session.email(), Some("admin@example.com"));

    let err = login(service.client(), "admin@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, AdminError::Unauthorized));
}

#[tokio::test]
async fn list_decodes_lenient_records() {
    let addr = spawn_fake_service(FakeStore::with_products(seeded())).await;
    let service = service_for(addr);

    let products = service.list_products(&session()).await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, "p1");
    assert_eq!(products[1].price, 25.0);
    assert!(!products[1].in_stock);
}

#[tokio::test]
async fn wrong_token_maps_to_unauthorized() {
    let addr = spawn_fake_service(FakeStore::with_products(seeded())).await;
    let service = service_for(addr);

    let err = service.list_products(&Session::new("stale", None)).await.unwrap_err();
    assert!(matches!(err, AdminError::Unauthorized));
}

#[tokio::test]
async fn non_array_list_is_an_empty_collection() {
    let store = FakeStore::with_products(seeded());
    *store.list_as_object.lock().unwrap() = true;
    let addr = spawn_fake_service(store).await;
    let service = service_for(addr);

    assert!(service.list_products(&session()).await.unwrap().is_empty());
}

#[tokio::test]
async fn created_product_appears_in_the_next_list() {
    let store = FakeStore::default();
    let addr = spawn_fake_service(store.clone()).await;
    let mut dash = Dashboard::new(service_for(addr), session());

    let mut form = ProductForm::create();
    form.draft.name = "Rose Oil".into();
    form.draft.description = "Fragrant oil".into();
    form.draft.price = "40".into();
    form.draft.category = "Oils".into();
    form.draft.in_stock = false;
    form.draft.ingredients = "Rose, Jojoba".into();
    form.image
        .set(SelectedImage::from_bytes("rose.webp", b"RIFF....WEBP".to_vec()).unwrap());

    let created = dash.submit(&mut form).await.unwrap();
    assert_eq!(created.id, "p1");
    assert_eq!(created.image.as_deref(), Some("/uploads/rose.webp"));
    assert_eq!(dash.generation(), 1);

    // The refetch after the mutation already holds the new record.
    let view = dash.view(&ViewQuery::new("rose", "", SortKey::Newest));
    assert_eq!(view.len(), 1);
    let listed = &view.items[0];
    assert_eq!(listed.name, "Rose Oil");
    assert_eq!(listed.description, "Fragrant oil");
    assert_eq!(listed.price, 40.0);
    assert_eq!(listed.category, "Oils");
    assert!(!listed.in_stock);
    assert_eq!(listed.ingredients, vec!["Rose", "Jojoba"]);
    assert_eq!(store.names(), vec!["Rose Oil"]);
}

#[tokio::test]
async fn edit_overwrites_the_record() {
    let store = FakeStore::with_products(seeded());
    let addr = spawn_fake_service(store.clone()).await;
    let mut dash = Dashboard::new(service_for(addr), session());
    dash.refresh().await.unwrap();

    let mut form = ProductForm::edit(dash.find("p2").unwrap());
    form.draft.name = "Shea Butter Cream".into();
    form.draft.in_stock = true;
    dash.submit(&mut form).await.unwrap();

    assert!(form.is_closed());
    let updated = dash.find("p2").unwrap();
    assert_eq!(updated.name, "Shea Butter Cream");
    assert!(updated.in_stock);
}

#[tokio::test]
async fn missing_product_maps_to_not_found() {
    let addr = spawn_fake_service(FakeStore::with_products(seeded())).await;
    let service = service_for(addr);

    let err = service.delete_product(&session(), "nope").await.unwrap_err();
    assert!(matches!(err, AdminError::NotFound(_)));
}

#[tokio::test]
async fn confirmed_delete_removes_and_refetches() {
    let store = FakeStore::with_products(seeded());
    let addr = spawn_fake_service(store.clone()).await;
    let mut dash = Dashboard::new(service_for(addr), session());
    dash.refresh().await.unwrap();

    let pending = dash.request_delete("p2").unwrap();
    assert!(pending.prompt().contains("Shea Cream"));
    let outcome = dash.resolve_delete(Confirmation::Yes).await.unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::Deleted {
            id: "p2".into(),
            name: "Shea Cream".into()
        }
    );
    assert_eq!(dash.products().len(), 1);
    assert_eq!(store.names(), vec!["Aloe Gel"]);
}

#[tokio::test]
async fn plain_text_delete_reply_counts_as_success() {
    let store = FakeStore::with_products(seeded());
    *store.text_deletes.lock().unwrap() = true;
    let addr = spawn_fake_service(store.clone()).await;
    let mut dash = Dashboard::new(service_for(addr), session());
    dash.refresh().await.unwrap();

    dash.request_delete("p1").unwrap();
    let outcome = dash.resolve_delete(Confirmation::Yes).await.unwrap();

    assert!(matches!(outcome, DeleteOutcome::Deleted { .. }));
    assert_eq!(dash.generation(), 1);
    assert_eq!(dash.products().len(), 1);
    assert_eq!(store.names(), vec!["Shea Cream"]);
}

#[tokio::test]
async fn categories_come_from_the_service() {
    let addr = spawn_fake_service(FakeStore::default()).await;
    let mut dash = Dashboard::new(service_for(addr), session());

    assert_eq!(dash.load_categories().await, ["Face Care", "Body Care", "Oils"]);
}
