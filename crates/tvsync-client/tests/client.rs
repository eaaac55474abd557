//! Integration tests for `TilesViewClient` using wiremock HTTP mocks.

use std::time::Duration;

use serde_json::json;
use tvsync_client::{
    CategoryPayload, DeletePayload, EnvelopeShape, NetworkErrorKind, ProductPayload,
    TilesViewClient, TransportError,
};
use tvsync_core::Credentials;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROOT: &str = "/Provider/webhooks";

fn base_url(server: &MockServer) -> String {
    format!("{}{ROOT}/", server.uri())
}

fn test_client(server: &MockServer) -> TilesViewClient {
    TilesViewClient::with_base_url(Credentials::new("test-key", "test-secret"), 5, &base_url(server))
        .expect("client construction should not fail")
}

fn product(name: &str) -> ProductPayload {
    ProductPayload {
        tv_prod_id: None,
        category: vec!["Marble".to_string()],
        sku: "CM-1".to_string(),
        name: name.to_string(),
        price: "49.90".to_string(),
        price_type: 0,
        image_path: String::new(),
        thumb_path: String::new(),
        surface_type: "0".to_string(),
        product_surface: "floor,wall".to_string(),
        is_bookmatch: 0,
    }
}

#[tokio::test]
async fn create_product_sends_credentials_and_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product")))
        .and(header("app_key", "test-key"))
        .and(header("app_secret", "test-secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "category": ["Marble"],
            "sku": "CM-1",
            "name": "Carrara",
            "price": "49.90",
            "price_type": 0,
            "image_path": "",
            "thumb_path": "",
            "surface_type": "0",
            "product_surface": "floor,wall",
            "is_bookmatch": 0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"success": true, "tv_prod_id": 42}})))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client(&server)
        .create_product(&product("Carrara"), "test insert")
        .await
        .expect("create should succeed");

    assert_eq!(response.status, 201);
    assert_eq!(response.shape, EnvelopeShape::DataSuccess);
    assert_eq!(response.remote_id().as_deref(), Some("42"));
}

#[tokio::test]
async fn missing_credentials_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    for credentials in [
        Credentials::new("", "secret"),
        Credentials::new("key", ""),
        Credentials::default(),
    ] {
        let client = TilesViewClient::with_base_url(credentials, 5, &base_url(&server)).unwrap();
        let err = client
            .create_product(&product("Carrara"), "test insert")
            .await
            .unwrap_err();
        assert!(
            matches!(err, TransportError::MissingCredentials),
            "expected MissingCredentials, got: {err:?}"
        );
    }
}

#[tokio::test]
async fn server_error_is_http_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{ROOT}/product")))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut payload = product("Carrara");
    payload.tv_prod_id = Some("42".to_string());
    let err = test_client(&server)
        .update_product(&payload, "test update")
        .await
        .unwrap_err();

    match err {
        TransportError::Http { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn only_200_and_201_count_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/category/")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let payload = CategoryPayload {
        tv_prod_id: None,
        name: "Marble".to_string(),
        height: 600,
        width: 600,
    };
    let err = test_client(&server)
        .create_category(&payload, "test category")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(204));
}

#[tokio::test]
async fn unrecognized_2xx_body_is_success() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{ROOT}/category/")))
        .and(body_json(json!({"tv_prod_id": "9", "name": "Marble", "height": 1200, "width": 600})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .mount(&server)
        .await;

    let payload = CategoryPayload {
        tv_prod_id: Some("9".to_string()),
        name: "Marble".to_string(),
        height: 1200,
        width: 600,
    };
    let response = test_client(&server)
        .update_category(&payload, "test category update")
        .await
        .expect("unrecognized 2xx should be success");

    assert_eq!(response.shape, EnvelopeShape::Unrecognized);
    assert!(response.interpret().ok);
    assert!(response.remote_id().is_none());
}

#[tokio::test]
async fn non_json_2xx_body_decodes_to_null() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product")))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let response = test_client(&server)
        .create_product(&product("Carrara"), "test insert")
        .await
        .unwrap();
    assert_eq!(response.body, serde_json::Value::Null);
    assert_eq!(response.shape, EnvelopeShape::Unrecognized);
}

#[tokio::test]
async fn delete_sends_hard_delete_payload() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{ROOT}/product")))
        .and(body_json(json!({"tv_prod_ids": [42], "hard_delete": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client(&server)
        .delete_products(&DeletePayload::hard(vec![42]), "test delete")
        .await
        .unwrap();
    assert_eq!(response.shape, EnvelopeShape::Success);
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let client =
        TilesViewClient::with_base_url(Credentials::new("k", "s"), 5, "http://127.0.0.1:1/").unwrap();
    let err = client
        .create_product(&product("Carrara"), "test insert")
        .await
        .unwrap_err();
    assert!(
        matches!(err, TransportError::Network { .. }),
        "expected Network, got: {err:?}"
    );
    assert_eq!(err.network_kind(), Some(NetworkErrorKind::Connect));
}

#[tokio::test]
async fn slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client =
        TilesViewClient::with_base_url(Credentials::new("k", "s"), 1, &base_url(&server)).unwrap();
    let err = client
        .create_product(&product("Carrara"), "test insert")
        .await
        .unwrap_err();
    assert_eq!(err.network_kind(), Some(NetworkErrorKind::Timeout));
}

#[tokio::test]
async fn list_filters_is_a_bodyless_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{ROOT}/filters/")))
        .and(header("app_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_client(&server).list_filters().await.unwrap();
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn add_and_find_filter_use_distinct_paths() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/filters/")))
        .and(body_json(json!({"lbl_name": "Finish", "values": ["Matt", "Gloss"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/filters")))
        .and(body_json(json!({"lbl_name": "Finish"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"lbl_name": "Finish"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .add_filter("Finish", &["Matt".to_string(), "Gloss".to_string()])
        .await
        .unwrap();
    let found = client.find_filter("Finish").await.unwrap();
    assert_eq!(found.body["data"]["lbl_name"], json!("Finish"));
}

#[tokio::test]
async fn batch_of_101_is_rejected_without_a_call() {
    let server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let items: Vec<ProductPayload> = (0..101).map(|i| product(&format!("P{i}"))).collect();
    let err = test_client(&server)
        .batch_sync_products(&items)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TransportError::BatchTooLarge { len: 101, max: 100, .. }
    ));
}

#[tokio::test]
async fn batch_of_100_is_a_single_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/product/sync/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let items: Vec<ProductPayload> = (0..100).map(|i| product(&format!("P{i}"))).collect();
    test_client(&server)
        .batch_sync_products(&items)
        .await
        .expect("batch of 100 should be accepted");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["product"].as_array().map(Vec::len), Some(100));
}

#[tokio::test]
async fn category_batch_wraps_items_under_category_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{ROOT}/category/sync/")))
        .and(body_json(json!({"category": [{"name": "Marble", "height": 600, "width": 600}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let items = vec![CategoryPayload {
        tv_prod_id: None,
        name: "Marble".to_string(),
        height: 600,
        width: 600,
    }];
    test_client(&server)
        .batch_sync_categories(&items)
        .await
        .unwrap();
}
