use reqwest::StatusCode;
use serde_json::json;

use labelforge_api::app::{build_app, AppConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Build the app (same router as prod) on the in-memory backend and
    /// bind it to an ephemeral port. Each test gets isolated state.
    async fn spawn() -> Self {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: None,
            static_root: std::env::temp_dir().join("labelforge-black-box"),
            public_base_url: "/static".to_string(),
        };
        let app = build_app(config).await.expect("failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn generate_barcode_derives_the_check_digit_and_stores_the_product() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 9.99, "gtin": "400638133393"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["gtin"], json!("4006381333931"));
    assert_eq!(
        body["barcode_image_path"],
        json!("/static/barcodes/4006381333931.png")
    );

    let res = client
        .post(format!("{}/scan_barcode", srv.base_url))
        .json(&json!({"gtin": "4006381333931"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], json!("Widget"));
    assert_eq!(body["price"], json!(9.99));
    assert_eq!(
        body["barcode_image_path"],
        json!("/static/barcodes/4006381333931.png")
    );
}

#[tokio::test]
async fn generate_barcode_truncates_oversized_gtin_input() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 9.99, "gtin": "4006381333935555"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["gtin"], json!("4006381333931"));
}

#[tokio::test]
async fn generate_barcode_requires_name_and_price() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"price": 9.99, "gtin": "400638133393"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("validation_error"));

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"name": "Widget", "gtin": "400638133393"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_barcode_requires_a_gtin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 9.99}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["message"], json!("GTIN required"));
}

#[tokio::test]
async fn generate_barcode_rejects_malformed_gtin() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for bad in ["12345", "12345678901a"] {
        let res = client
            .post(format!("{}/generate_barcode", srv.base_url))
            .json(&json!({"name": "Widget", "price": 9.99, "gtin": bad}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "input {bad:?}");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], json!("validation_error"));
    }
}

#[tokio::test]
async fn duplicate_gtin_is_rejected_without_overwriting() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 9.99, "gtin": "400638133393"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/generate_barcode", srv.base_url))
        .json(&json!({"name": "Impostor", "price": 1.0, "gtin": "400638133393"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("conflict"));

    // First record still intact.
    let res = client
        .post(format!("{}/scan_barcode", srv.base_url))
        .json(&json!({"gtin": "4006381333931"}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], json!("Widget"));
}

#[tokio::test]
async fn scan_barcode_misses_and_missing_input() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/scan_barcode", srv.base_url))
        .json(&json!({"gtin": "0000000000000"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));

    let res = client
        .post(format!("{}/scan_barcode", srv.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn qr_lifecycle_generate_then_fetch() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_qrcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 9.99}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["qr_code_image_path"], json!("/static/qrcodes/widget.png"));

    let res = client
        .post(format!("{}/get_qr", srv.base_url))
        .json(&json!({"name": "Widget"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["name"], json!("Widget"));
    assert_eq!(body["price"], json!(9.99));
}

#[tokio::test]
async fn duplicate_qr_name_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_qrcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 9.99}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/generate_qrcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": 4.5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("conflict"));
}

#[tokio::test]
async fn get_qr_misses_return_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/get_qr", srv.base_url))
        .json(&json!({"name": "Nobody"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_qrcode_rejects_non_positive_price() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/generate_qrcode", srv.base_url))
        .json(&json!({"name": "Widget", "price": -2.0}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], json!("validation_error"));
}
