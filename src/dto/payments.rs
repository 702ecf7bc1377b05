use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::orders::CheckoutDetails;
use crate::models::Order;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderRequest {
    #[schema(value_type = Option<String>, example = "250.00")]
    pub total: Option<Decimal>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentOrderResponse {
    pub id: String,
    /// Amount in paise.
    pub amount: i64,
    pub currency: String,
    /// Public key for the checkout widget.
    pub key: String,
}

/// Gateway callback fields plus the checkout the customer paid for.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
    #[serde(flatten)]
    pub details: CheckoutDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifiedPayment {
    pub order: Order,
    /// False when this gateway order had already been turned into an order.
    pub created: bool,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: Option<WebhookPayload>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<WebhookPayment>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPayment {
    pub entity: PaymentEntity,
}

#[derive(Debug, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    pub order_id: Option<String>,
    pub status: Option<String>,
}

impl WebhookEvent {
    pub fn payment(&self) -> Option<&PaymentEntity> {
        self.payload
            .as_ref()
            .and_then(|p| p.payment.as_ref())
            .map(|p| &p.entity)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub status: String,
}
