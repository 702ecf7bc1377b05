use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway};

const ORDERS_PATH: &str = "/v1/orders";

pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

#[derive(Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: bool,
    notes: &'a std::collections::BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    description: Option<String>,
    code: Option<String>,
}

impl RazorpayClient {
    pub fn new(base_url: impl Into<String>, key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let body = CreateOrderBody {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            payment_capture: true,
            notes: &request.notes,
        };

        tracing::debug!(amount = request.amount, receipt = %request.receipt, "creating gateway order");
        let response = self
            .http
            .post(format!("{}{ORDERS_PATH}", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error.description.or(e.error.code))
                .unwrap_or(text);
            tracing::error!(status = status.as_u16(), %message, "gateway order creation failed");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order: GatewayOrder = response.json().await?;
        tracing::info!(gateway_order_id = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }
}
