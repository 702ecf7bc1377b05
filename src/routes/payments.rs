use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
};

use crate::{
    dto::{
        AppJson,
        payments::{
            PaymentOrderRequest, PaymentOrderResponse, VerifiedPayment, VerifyPaymentRequest,
            WebhookAck,
        },
    },
    error::AppResult,
    response::ApiResponse,
    services::payment_service,
    state::AppState,
};

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/razorpay/order", post(create_payment_order))
        .route("/razorpay/verify", post(verify_payment))
        .route("/razorpay/webhook", post(webhook))
}

#[utoipa::path(
    post,
    path = "/api/razorpay/order",
    request_body = PaymentOrderRequest,
    responses(
        (status = 200, description = "Gateway order created", body = ApiResponse<PaymentOrderResponse>),
        (status = 400, description = "Missing required fields"),
        (status = 500, description = "Gateway error"),
    ),
    tag = "Payments"
)]
pub async fn create_payment_order(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PaymentOrderRequest>,
) -> AppResult<Json<ApiResponse<PaymentOrderResponse>>> {
    let resp = payment_service::create_gateway_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/razorpay/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified, order stored", body = ApiResponse<VerifiedPayment>),
        (status = 400, description = "Missing data or invalid signature"),
        (status = 409, description = "Not enough stock"),
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<VerifiedPayment>>> {
    let resp = payment_service::verify_payment(&state, payload).await?;
    Ok(Json(resp))
}

// The signature covers the raw body, so it is read as bytes.
#[utoipa::path(
    post,
    path = "/api/razorpay/webhook",
    params(
        ("x-razorpay-signature" = String, Header, description = "HMAC-SHA256 of the body")
    ),
    request_body(content = String, content_type = "application/json", description = "Raw gateway event"),
    responses(
        (status = 200, description = "Event accepted", body = WebhookAck),
        (status = 400, description = "Not configured or bad signature"),
    ),
    tag = "Payments"
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let ack = payment_service::handle_webhook(&state, signature, &body).await?;
    Ok(Json(ack))
}
