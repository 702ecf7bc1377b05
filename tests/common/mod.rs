#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use jewelry_storefront_api::{
    assets::AssetStore,
    email::{EmailError, EmailMessage, EmailTransport, Mailer, Sender},
    middleware::auth::issue_token,
    models::{Product, UserRole},
    payment::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway, signature},
    routes::create_app,
    services::auth_service,
    state::{AppState, JwtSettings, PaymentSettings},
    store::{StockMode, Store},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const KEY_SECRET: &str = "test_key_secret";
pub const WEBHOOK_SECRET: &str = "test_webhook_secret";

/// Hands out sequential gateway order ids and remembers every request.
#[derive(Default)]
pub struct FakeGateway {
    counter: AtomicUsize,
    pub requests: Mutex<Vec<GatewayOrderRequest>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn key_id(&self) -> &str {
        "rzp_test_key"
    }

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let order = GatewayOrder {
            id: format!("order_test_{n}"),
            amount: request.amount,
            currency: request.currency.clone(),
        };
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        Ok(order)
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingTransport {
    pub fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .map(|sent| sent.iter().map(|m| m.subject.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailTransport for RecordingTransport {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, _from: &Sender, message: &EmailMessage) -> Result<(), EmailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub gateway: Arc<FakeGateway>,
    pub mail: Arc<RecordingTransport>,
    _dir: TempDir,
}

pub async fn spawn_app(mode: StockMode) -> anyhow::Result<TestApp> {
    spawn_app_with_webhook(mode, Some(WEBHOOK_SECRET.to_string())).await
}

pub async fn spawn_app_with_webhook(
    mode: StockMode,
    webhook_secret: Option<String>,
) -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let store = Store::open(dir.path().join("data"), mode).await?;
    let gateway = Arc::new(FakeGateway::default());
    let mail = Arc::new(RecordingTransport::default());
    let mailer = Mailer::new(
        Sender {
            email: "shop@example.com".into(),
            name: "Shop".into(),
        },
        vec![mail.clone()],
    );

    let state = AppState {
        store: Arc::new(store),
        gateway: gateway.clone(),
        mailer: Arc::new(mailer),
        assets: Arc::new(AssetStore::new(dir.path().join("attached_assets"))),
        jwt: Arc::new(JwtSettings {
            secret: "test_jwt_secret".into(),
            ttl_hours: 1,
        }),
        payments: Arc::new(PaymentSettings::new(KEY_SECRET, webhook_secret)),
    };

    Ok(TestApp {
        router: create_app(state.clone()),
        state,
        gateway,
        mail,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(req).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, body))
    }

    /// Status only, for responses that are not JSON.
    pub async fn status(&self, req: Request<Body>) -> anyhow::Result<StatusCode> {
        Ok(self.router.clone().oneshot(req).await?.status())
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> anyhow::Result<(StatusCode, Value)> {
        self.request(build("GET", uri, token, None)?).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> anyhow::Result<(StatusCode, Value)> {
        self.request(build(method, uri, token, Some(body))?).await
    }

    /// Posts `bytes` as the `image` field of a multipart form.
    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> anyhow::Result<(StatusCode, Value)> {
        let boundary = "XBOUNDARYX";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"ring.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))?;
        self.request(req).await
    }

    pub async fn token_for(&self, role: UserRole) -> anyhow::Result<String> {
        let email = format!("{}-{}@example.com", role.as_str(), uuid::Uuid::new_v4());
        let user = auth_service::new_user("Tester", Some(email), None, "secret123", role)?;
        self.state.store.users.upsert(user.clone()).await?;
        Ok(issue_token(&self.state.jwt, &user)?)
    }

    pub async fn product(&self, slug: &str) -> anyhow::Result<Product> {
        self.state
            .store
            .product_by_slug(slug)
            .await
            .ok_or_else(|| anyhow::anyhow!("no product {slug}"))
    }

    pub async fn set_stock(&self, product_id: &str, stock: i64) -> anyhow::Result<()> {
        self.state
            .store
            .products
            .update(product_id, |p| p.stock = stock)
            .await?;
        Ok(())
    }

    /// Lets spawned email tasks run.
    pub async fn settle(&self) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }
}

fn build(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };
    Ok(req)
}

/// Checkout body for `quantity` units of `product`.
pub fn checkout(product: &Product, quantity: i64) -> Value {
    let total = product.price * rust_decimal::Decimal::from(quantity);
    json!({
        "customerName": "Asha Rao",
        "customerEmail": "asha@example.com",
        "customerPhone": "9876543210",
        "shippingAddress": "12 MG Road",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pinCode": "560001",
        "items": [{
            "productId": product.id,
            "name": product.name,
            "price": product.price,
            "quantity": quantity,
            "image": product.images.first().cloned().unwrap_or_default(),
        }],
        "subtotal": total,
        "shipping": "0",
        "total": total,
    })
}

pub fn payment_signature(order_id: &str, payment_id: &str) -> String {
    signature::sign(KEY_SECRET, signature::payment_payload(order_id, payment_id).as_bytes())
        .unwrap_or_default()
}
