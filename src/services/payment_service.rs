use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{
    dto::payments::{
        PaymentOrderRequest, PaymentOrderResponse, VerifiedPayment, VerifyPaymentRequest,
        WebhookAck, WebhookEvent,
    },
    error::{AppError, AppResult},
    models::{PAYMENT_METHOD_RAZORPAY, PaymentStatus},
    payment::{GatewayOrderRequest, signature},
    response::{ApiResponse, Meta},
    services::order_service::{self, PaymentRecord},
    state::AppState,
};

/// Rupees to paise, rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

fn present(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Opens a payment intent with the gateway. Nothing is stored locally.
pub async fn create_gateway_order(
    state: &AppState,
    payload: PaymentOrderRequest,
) -> AppResult<ApiResponse<PaymentOrderResponse>> {
    let total = payload.total.filter(|t| *t > Decimal::ZERO);
    let (Some(total), Some(customer_name), Some(customer_email)) = (
        total,
        present(payload.customer_name),
        present(payload.customer_email),
    ) else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };
    let amount = to_minor_units(total)
        .ok_or_else(|| AppError::BadRequest("Order total is out of range".into()))?;

    let mut notes = BTreeMap::new();
    notes.insert("customer_name".to_string(), customer_name);
    notes.insert("customer_email".to_string(), customer_email);
    if let Some(phone) = present(payload.customer_phone) {
        notes.insert("customer_phone".to_string(), phone);
    }

    let request = GatewayOrderRequest {
        amount,
        currency: state.payments.currency.clone(),
        receipt: format!("receipt_{}", Utc::now().timestamp_millis()),
        notes,
    };
    tracing::info!(amount, receipt = %request.receipt, "creating gateway order");

    let order = state.gateway.create_order(request).await?;
    let data = PaymentOrderResponse {
        id: order.id,
        amount: order.amount,
        currency: order.currency,
        key: state.gateway.key_id().to_string(),
    };
    Ok(ApiResponse::success("Payment order created", data, Some(Meta::empty())))
}

/// Checks the gateway signature and turns the paid checkout into an order.
/// A gateway order id is only ever turned into one order; repeats return it.
pub async fn verify_payment(
    state: &AppState,
    payload: VerifyPaymentRequest,
) -> AppResult<ApiResponse<VerifiedPayment>> {
    let gateway_order_id = payload.razorpay_order_id.trim().to_string();
    let payment_id = payload.razorpay_payment_id.trim().to_string();
    let provided = payload.razorpay_signature.trim();
    if gateway_order_id.is_empty() || payment_id.is_empty() || provided.is_empty() {
        return Err(AppError::BadRequest("Missing payment verification data".into()));
    }

    if !signature::verify_payment(
        &state.payments.key_secret,
        &gateway_order_id,
        &payment_id,
        provided,
    ) {
        tracing::warn!(%gateway_order_id, %payment_id, "payment signature mismatch");
        return Err(AppError::BadRequest("Invalid payment signature".into()));
    }
    tracing::info!(%gateway_order_id, %payment_id, "payment signature verified");

    let _guard = state.payments.verify_lock.lock().await;
    if let Some(existing) = state.store.order_by_gateway_id(&gateway_order_id).await {
        tracing::info!(order_id = %existing.id, %gateway_order_id, "payment already verified");
        return Ok(ApiResponse::success(
            "Payment already verified",
            VerifiedPayment {
                order: existing,
                created: false,
            },
            Some(Meta::empty()),
        ));
    }

    let payment = PaymentRecord {
        method: PAYMENT_METHOD_RAZORPAY.to_string(),
        status: PaymentStatus::Completed,
        payment_id: Some(payment_id),
        gateway_order_id: Some(gateway_order_id),
    };
    let order = order_service::place_order(state, payload.details, payment).await?;

    Ok(ApiResponse::success(
        "Payment verified and order created successfully",
        VerifiedPayment {
            order,
            created: true,
        },
        Some(Meta::empty()),
    ))
}

pub async fn handle_webhook(
    state: &AppState,
    signature_header: Option<&str>,
    body: &[u8],
) -> AppResult<WebhookAck> {
    let Some(secret) = state.payments.webhook_secret.as_deref() else {
        tracing::warn!("webhook received but no webhook secret is configured");
        return Err(AppError::BadRequest("Webhook not configured".into()));
    };
    let valid = signature_header.is_some_and(|sig| signature::verify_webhook(secret, body, sig));
    if !valid {
        tracing::warn!("invalid webhook signature");
        return Err(AppError::BadRequest("Invalid signature".into()));
    }

    let event: WebhookEvent = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid webhook payload: {e}")))?;

    match event.event.as_str() {
        "payment.captured" => {
            if let Some(entity) = event.payment() {
                mark_captured(state, &entity.id, entity.order_id.as_deref()).await?;
            }
        }
        "payment.failed" => {
            let payment_id = event.payment().map(|e| e.id.as_str()).unwrap_or("-");
            let status = event
                .payment()
                .and_then(|e| e.status.as_deref())
                .unwrap_or("-");
            tracing::warn!(%payment_id, %status, "payment failed");
        }
        other => tracing::debug!(event = %other, "unhandled webhook event"),
    }

    Ok(WebhookAck {
        status: "ok".to_string(),
    })
}

async fn mark_captured(
    state: &AppState,
    payment_id: &str,
    gateway_order_id: Option<&str>,
) -> AppResult<()> {
    let Some(gateway_order_id) = gateway_order_id else {
        tracing::info!(%payment_id, "captured payment has no gateway order id");
        return Ok(());
    };
    let Some(order) = state.store.order_by_gateway_id(gateway_order_id).await else {
        tracing::info!(%payment_id, %gateway_order_id, "captured payment has no matching order yet");
        return Ok(());
    };

    state
        .store
        .orders
        .update(&order.id, |o| {
            o.payment_status = PaymentStatus::Completed;
            if o.payment_id.is_none() {
                o.payment_id = Some(payment_id.to_string());
            }
            o.updated_at = Some(Utc::now());
        })
        .await?;
    tracing::info!(order_id = %order.id, %payment_id, "payment captured");
    Ok(())
}
