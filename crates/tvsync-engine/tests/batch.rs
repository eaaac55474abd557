//! Batch sync tests: the per-call limit, skipping, and remote id attachment.

use rust_decimal::Decimal;
use serde_json::json;
use tvsync_client::{TilesViewClient, TransportError};
use tvsync_core::{
    Category, Credentials, EntityStatus, EntityType, MappingStore, MemoryMappingStore, Product,
    ProductMeta,
};
use tvsync_engine::{BatchReport, MemoryCatalog, ReconciliationEngine, SyncFailure};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOT: &str = "/Provider/webhooks";

fn engine(server: &MockServer) -> ReconciliationEngine<MemoryCatalog, MemoryMappingStore> {
    let client = TilesViewClient::with_base_url(
        Credentials::new("test-key", "test-secret"),
        5,
        &format!("{}{ROOT}/", server.uri()),
    )
    .expect("client construction should not fail");
    ReconciliationEngine::new(client, MemoryCatalog::new(), MemoryMappingStore::new())
}

fn product(id: u64) -> Product {
    Product {
        id,
        name: format!("Tile {id}"),
        status: EntityStatus::Published,
        is_revision: false,
        sku: Some(format!("T-{id}")),
        price: Some(Decimal::new(1000, 2)),
        image_id: None,
        categories: vec!["Porcelain".to_string()],
        meta: ProductMeta::default(),
    }
}

#[tokio::test]
async fn one_hundred_products_go_out_in_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product/sync/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let products: Vec<Product> = (1..=100).map(product).collect();
    let report = engine(&server).batch_sync_products(&products).await.unwrap();

    assert_eq!(
        report,
        BatchReport {
            sent: 100,
            skipped: 0
        }
    );
}

#[tokio::test]
async fn more_than_one_hundred_products_are_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let products: Vec<Product> = (1..=101).map(product).collect();
    let err = engine(&server)
        .batch_sync_products(&products)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncFailure::Transport(TransportError::BatchTooLarge {
            kind: "product",
            len: 101,
            max: 100
        })
    ));
}

#[tokio::test]
async fn skipped_products_do_not_count_toward_the_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product/sync/")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut products: Vec<Product> = (1..=100).map(product).collect();
    let mut draft = product(101);
    draft.status = EntityStatus::Draft;
    products.push(draft);

    let report = engine(&server).batch_sync_products(&products).await.unwrap();
    assert_eq!(report.sent, 100);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn more_than_one_hundred_categories_are_rejected_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let categories: Vec<Category> = (1..=101)
        .map(|id| Category {
            id,
            name: format!("Range {id}"),
            height: None,
            width: None,
        })
        .collect();
    let err = engine(&server)
        .batch_sync_categories(&categories)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncFailure::Transport(TransportError::BatchTooLarge { kind: "category", .. })
    ));
}

#[tokio::test]
async fn unpublished_and_unnamed_products_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product/sync/")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = product(2);
    draft.status = EntityStatus::Draft;
    let mut unnamed = product(3);
    unnamed.name = String::new();
    let products = vec![product(1), draft, unnamed];

    let report = engine(&server).batch_sync_products(&products).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.skipped, 2);
}

#[tokio::test]
async fn nothing_to_send_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = engine(&server).batch_sync_products(&[]).await.unwrap();
    assert_eq!(report, BatchReport::default());
}

#[tokio::test]
async fn mapped_categories_carry_their_remote_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/category/sync/")))
        .and(body_partial_json(json!({
            "category": [
                {"tv_prod_id": "12", "name": "Marble", "height": 600, "width": 600},
                {"name": "Slate", "height": 600, "width": 600}
            ]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine(&server);
    engine
        .store()
        .set(EntityType::Category, 1, "12")
        .await
        .unwrap();
    let categories = vec![
        Category {
            id: 1,
            name: "Marble".to_string(),
            height: None,
            width: None,
        },
        Category {
            id: 2,
            name: "Slate".to_string(),
            height: None,
            width: None,
        },
    ];

    let report = engine.batch_sync_categories(&categories).await.unwrap();
    assert_eq!(report.sent, 2);
}

#[tokio::test]
async fn failed_batch_request_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product/sync/")))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let products: Vec<Product> = (1..=3).map(product).collect();
    let err = engine(&server)
        .batch_sync_products(&products)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncFailure::Transport(ref e) if e.status() == Some(502)));
}
