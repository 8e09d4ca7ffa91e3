mod support;

use std::sync::atomic::Ordering;

use catalog_overlay::error::CatalogError;
use catalog_overlay::ledger::InMemoryStore;
use catalog_overlay::lifecycle::CatalogService;
use catalog_overlay::model::{NewProduct, ProductId, ProductUpdate, Rating};
use catalog_overlay::remote::HttpCatalogClient;

use support::{client_for, local_ids, seed, FakeStore, LOCAL_IDS};

fn service(fake: &FakeStore) -> CatalogService<HttpCatalogClient, InMemoryStore> {
    let ids = local_ids();
    CatalogService::new(client_for(&fake.base_url, ids.clone()), InMemoryStore::new(), ids)
}

fn new_product(title: &str) -> NewProduct {
    NewProduct {
        title: title.into(),
        price: 9.5,
        description: "made locally".into(),
        category: "misc".into(),
        image: None,
    }
}

fn ids(products: &[catalog_overlay::model::Product]) -> Vec<u64> {
    products.iter().map(|p| p.id.0).collect()
}

#[tokio::test]
async fn test_local_intent_survives_a_forgetful_remote() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);

    service.delete_product_locally(ProductId(1)).await.unwrap();
    service
        .update_product_locally(
            ProductId(2),
            ProductUpdate {
                title: Some("T-Shirt (blue)".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let created = service
        .create_product_locally(new_product("Mug"))
        .await
        .unwrap();

    let products = service.list_effective_products().await.unwrap();

    assert_eq!(ids(&products), vec![2, 3, created.id.0]);
    assert_eq!(products[0].title, "T-Shirt (blue)");
    assert_eq!(products[0].price, 22.3);
    assert_eq!(products[0].rating, Some(Rating { rate: 4.1, count: 259 }));
    assert_eq!(products[2].title, "Mug");
    assert_eq!(products[2].rating, Some(Rating::default()));
}

#[tokio::test]
async fn test_create_while_offline_synthesizes_id() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);
    fake.state.set_offline(true);

    let outcome = service
        .create_with_outcome(new_product("Offline"))
        .await
        .unwrap();

    assert!(!outcome.remote_confirmed);
    assert_eq!(outcome.product.id, ProductId(LOCAL_IDS));
    let created = service.ledgers().created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, ProductId(LOCAL_IDS));

    fake.state.set_offline(false);
    let products = service.list_effective_products().await.unwrap();
    assert_eq!(products.last().unwrap().title, "Offline");
}

#[tokio::test]
async fn test_write_failures_are_swallowed() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);
    fake.state.fail_writes.store(true, Ordering::SeqCst);

    let updated = service
        .update_with_outcome(
            ProductId(3),
            ProductUpdate {
                price: Some(60.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let deleted = service.delete_with_outcome(ProductId(1)).await.unwrap();

    assert!(!updated.remote_confirmed);
    assert_eq!(updated.product.title, "Jacket");
    assert_eq!(updated.product.price, 60.0);
    assert!(!deleted.remote_confirmed);

    let products = service.list_effective_products().await.unwrap();
    assert_eq!(ids(&products), vec![2, 3]);
    assert_eq!(products[1].price, 60.0);
}

#[tokio::test]
async fn test_read_failure_reaches_the_caller() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);
    service.delete_product_locally(ProductId(1)).await.unwrap();
    fake.state.fail_reads.store(true, Ordering::SeqCst);

    assert_eq!(
        service.list_effective_products().await,
        Err(CatalogError::RemoteUnavailable(
            "500 Internal Server Error".into()
        ))
    );
    assert!(service.ledgers().deleted().contains(&ProductId(1)));
}

#[tokio::test]
async fn test_update_of_local_product_skips_remote_lookup() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);

    let created = service
        .create_product_locally(new_product("Draft"))
        .await
        .unwrap();
    let updated = service
        .update_product_locally(
            created.id,
            ProductUpdate {
                title: Some("Final".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.description, "made locally");
    assert_eq!(
        fake.state.requests(),
        vec![
            "POST /products".to_string(),
            format!("PUT /products/{}", created.id),
        ]
    );
    assert!(service.ledgers().updated().is_empty());
    assert_eq!(service.ledgers().created()[0].title, "Final");
}

#[tokio::test]
async fn test_update_of_deleted_product_is_rejected_locally() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);
    service.delete_product_locally(ProductId(3)).await.unwrap();

    let result = service
        .update_product_locally(ProductId(3), ProductUpdate::default())
        .await;

    assert_eq!(result, Err(CatalogError::NotFound(ProductId(3))));
    assert_eq!(fake.state.requests(), vec!["DELETE /products/3".to_string()]);
}

#[tokio::test]
async fn test_get_effective_product_matches_list_view() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);
    service
        .update_product_locally(
            ProductId(1),
            ProductUpdate {
                price: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let single = service.get_effective_product(ProductId(1)).await.unwrap();
    let listed = service.list_effective_products().await.unwrap();

    assert_eq!(single, listed[0]);
    assert_eq!(
        service.get_effective_product(ProductId(77)).await,
        Err(CatalogError::NotFound(ProductId(77)))
    );
}

#[tokio::test]
async fn test_partial_update_needs_a_readable_base_record() {
    let fake = FakeStore::spawn(seed()).await;
    let service = service(&fake);
    let price_only = ProductUpdate {
        price: Some(25.0),
        ..Default::default()
    };

    // Reads fail while writes still work
    fake.state.fail_reads.store(true, Ordering::SeqCst);
    let result = service
        .update_with_outcome(ProductId(2), price_only.clone())
        .await;
    assert_eq!(
        result,
        Err(CatalogError::RemoteUnavailable(
            "500 Internal Server Error".into()
        ))
    );
    assert_eq!(fake.state.requests(), vec!["GET /products/2".to_string()]);

    // Fully offline
    fake.state.set_offline(true);
    assert!(service
        .update_product_locally(ProductId(3), price_only)
        .await
        .is_err());

    fake.state.set_offline(false);
    let products = service.list_effective_products().await.unwrap();
    assert_eq!(products, seed());
    assert_eq!(products[1].title, "T-Shirt");
    assert_eq!(products[2].title, "Jacket");
    assert!(service.ledgers().updated().is_empty());
}
