mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use jewelry_storefront_api::{routes::doc::ApiDoc, store::StockMode};
use utoipa::OpenApi;

use common::spawn_app;

#[test]
fn webhook_documents_a_raw_json_body() {
    let doc = ApiDoc::openapi();
    let webhook = doc
        .paths
        .paths
        .get("/api/razorpay/webhook")
        .and_then(|item| item.post.as_ref())
        .expect("webhook operation");
    let body = webhook.request_body.as_ref().expect("webhook request body");
    assert!(body.content.contains_key("application/json"));
}

#[test]
fn every_admin_route_is_documented() {
    let doc = ApiDoc::openapi();
    for path in [
        "/api/admin/products",
        "/api/admin/products/{id}",
        "/api/admin/products/{id}/stock",
        "/api/admin/products/reload",
        "/api/admin/categories",
        "/api/admin/categories/{id}",
        "/api/admin/orders",
        "/api/admin/orders/{id}",
        "/api/admin/orders/{id}/status",
        "/api/admin/upload-image",
        "/api/admin/upload-category-image",
        "/api/admin/delete-image",
        "/api/admin/test-email",
        "/api/admin/send-test-email",
    ] {
        assert!(doc.paths.paths.contains_key(path), "{path}");
    }
}

#[tokio::test]
async fn docs_page_is_served() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let status = app
        .status(Request::builder().uri("/docs").body(Body::empty())?)
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
