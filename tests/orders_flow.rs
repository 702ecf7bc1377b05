mod common;

use axum::http::StatusCode;
use jewelry_storefront_api::{models::UserRole, store::StockMode};
use serde_json::json;

use common::{checkout, spawn_app};

// Integration flow: customer places a COD order -> stock drops -> admin moves it along.
#[tokio::test]
async fn cod_order_reserves_stock_and_admin_ships_it() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let ring = app.product("diamond-solitaire-ring").await?;
    assert_eq!(ring.stock, 3);

    let (status, body) = app
        .send_json("POST", "/api/orders", None, checkout(&ring, 1))
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order = &body["data"];
    assert_eq!(order["paymentMethod"], "cod");
    assert_eq!(order["paymentStatus"], "pending");
    assert_eq!(order["orderStatus"], "processing");
    let order_id = order["id"].as_str().unwrap_or_default().to_string();

    assert_eq!(app.product("diamond-solitaire-ring").await?.stock, 2);

    let (status, body) = app.get(&format!("/api/orders/{order_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 1);

    app.settle().await;
    assert_eq!(
        app.mail.subjects(),
        vec![format!("Order Confirmation - {order_id}")]
    );

    let admin = app.token_for(UserRole::Admin).await?;
    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/admin/orders/{order_id}/status"),
            Some(&admin),
            json!({ "status": "shipped", "trackingNumber": "TRK123" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["orderStatus"], "shipped");
    assert_eq!(body["data"]["trackingNumber"], "TRK123");

    // Same status again changes nothing and sends nothing.
    let (status, _) = app
        .send_json(
            "PUT",
            &format!("/api/admin/orders/{order_id}/status"),
            Some(&admin),
            json!({ "status": "shipped" }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    app.settle().await;
    let subjects = app.mail.subjects();
    assert_eq!(subjects.len(), 2);
    assert_eq!(subjects[1], format!("Order Status Update - {order_id}"));

    let (status, body) = app.get("/api/admin/orders?status=shipped", Some(&admin)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = app
        .send_json("DELETE", &format!("/api/admin/orders/{order_id}"), Some(&admin), json!({}))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deletedOrder"]["id"], order_id.as_str());
    let (status, _) = app.get(&format!("/api/orders/{order_id}"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn shortfall_rejects_whole_order_and_keeps_stock() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let ring = app.product("diamond-solitaire-ring").await?;
    let bangle = app.product("wave-bangle").await?;

    let mut body = checkout(&ring, 4);
    if let Some(items) = body["items"].as_array_mut() {
        items.push(json!({
            "productId": bangle.id,
            "name": bangle.name,
            "price": bangle.price,
            "quantity": 1,
        }));
    }

    let (status, resp) = app.send_json("POST", "/api/orders", None, body).await?;
    assert_eq!(status, StatusCode::CONFLICT, "{resp}");
    let items = resp["data"]["outOfStockItems"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], ring.id.as_str());
    assert_eq!(items[0]["requestedQuantity"], 4);
    assert_eq!(items[0]["availableStock"], 3);

    assert_eq!(app.product("diamond-solitaire-ring").await?.stock, 3);
    assert_eq!(app.product("wave-bangle").await?.stock, bangle.stock);
    assert!(app.state.store.orders.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn stock_of_three_allows_exactly_three_single_orders() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let ring = app.product("diamond-solitaire-ring").await?;

    for _ in 0..3 {
        let (status, _) = app
            .send_json("POST", "/api/orders", None, checkout(&ring, 1))
            .await?;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = app
        .send_json("POST", "/api/orders", None, checkout(&ring, 1))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["outOfStockItems"][0]["availableStock"], 0);

    assert_eq!(app.product("diamond-solitaire-ring").await?.stock, 0);
    assert_eq!(app.state.store.orders.len().await, 3);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn locked_mode_never_oversells_under_concurrency() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let ring = app.product("diamond-solitaire-ring").await?;
    let app = std::sync::Arc::new(app);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let app = app.clone();
        let body = checkout(&ring, 1);
        tasks.spawn(async move { app.send_json("POST", "/api/orders", None, body).await });
    }

    let mut accepted = 0;
    let mut rejected = 0;
    while let Some(joined) = tasks.join_next().await {
        let (status, _) = joined??;
        match status {
            StatusCode::OK => accepted += 1,
            StatusCode::CONFLICT => rejected += 1,
            other => anyhow::bail!("unexpected status {other}"),
        }
    }

    assert_eq!(accepted, 3);
    assert_eq!(rejected, 5);
    assert_eq!(app.product("diamond-solitaire-ring").await?.stock, 0);
    Ok(())
}

#[tokio::test]
async fn order_keeps_its_snapshot_after_product_edits() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let bangle = app.product("wave-bangle").await?;

    let (_, body) = app
        .send_json("POST", "/api/orders", None, checkout(&bangle, 2))
        .await?;
    let order_id = body["data"]["id"].as_str().unwrap_or_default().to_string();

    let admin = app.token_for(UserRole::Admin).await?;
    let (status, body) = app
        .send_json(
            "PUT",
            &format!("/api/admin/products/{}", bangle.id),
            Some(&admin),
            json!({
                "name": "Ocean Wave Bangle",
                "description": "Reworked",
                "category": "bracelets",
                "price": "999.00",
            }),
        )
        .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["slug"], "ocean-wave-bangle");
    // Stock is left alone when the form omits it.
    assert_eq!(body["data"]["stock"], bangle.stock - 2);

    let (_, body) = app.get(&format!("/api/orders/{order_id}"), None).await?;
    let item = &body["data"]["items"][0];
    assert_eq!(item["name"], "Wave Bangle");
    assert_eq!(item["price"], json!(bangle.price));
    Ok(())
}

#[tokio::test]
async fn checkout_validation() -> anyhow::Result<()> {
    let app = spawn_app(StockMode::Locked).await?;
    let ring = app.product("textured-band-ring").await?;

    let mut online = checkout(&ring, 1);
    online["paymentMethod"] = json!("razorpay");
    let (status, _) = app.send_json("POST", "/api/orders", None, online).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut incomplete = checkout(&ring, 1);
    incomplete["city"] = json!("");
    incomplete["pinCode"] = json!("  ");
    let (status, body) = app.send_json("POST", "/api/orders", None, incomplete).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("city"), "{message}");
    assert!(message.contains("pinCode"), "{message}");

    let mut prepaid = checkout(&ring, 1);
    prepaid["paymentMethod"] = json!("upi");
    let (status, body) = app.send_json("POST", "/api/orders", None, prepaid).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentStatus"], "completed");

    assert_eq!(app.product("textured-band-ring").await?.stock, ring.stock - 1);
    Ok(())
}
