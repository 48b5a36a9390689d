//! `HttpProductSource` against a stub product endpoint.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use tee_storefront::product::{FetchError, HttpProductSource, ProductSource};
use tee_storefront_integration_tests::StubProductApi;

#[tokio::test]
async fn test_fetch_parses_product() {
    let stub = StubProductApi::serving_sample().await;
    let source = HttpProductSource::new(&stub.config());

    let product = source.fetch_product().await.unwrap();

    assert_eq!(product.title, "Classic Tee");
    assert_eq!(product.price, Decimal::new(75, 0));
    assert_eq!(product.display_price().to_string(), "$75");
    assert_eq!(product.size_labels().collect::<Vec<_>>(), ["S", "M", "L"]);
    assert_eq!(product.image_url, "https://cdn.example.com/classic-tee.jpg");
    assert_eq!(stub.hits(), 1);
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let stub = StubProductApi::start(503, r#"{"message":"Service Unavailable"}"#).await;
    let source = HttpProductSource::new(&stub.config());

    let err = source.fetch_product().await.unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("Service Unavailable"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_malformed_payload() {
    let stub = StubProductApi::start(200, r#"{"title": 42}"#).await;
    let source = HttpProductSource::new(&stub.config());

    let err = source.fetch_product().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_fetch_unreachable_endpoint() {
    let stub = StubProductApi::serving_sample().await;
    let mut config = stub.config();
    // Port 9 (discard) is closed on test machines.
    config.url.set_port(Some(9)).unwrap();

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    let err = HttpProductSource::with_client(client, &config)
        .fetch_product()
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http(_)), "got {err:?}");
    assert_eq!(stub.hits(), 0);
}
