use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    dto::email::{EmailCheck, EmailDelivery, TestEmailRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, OrderStatus, PAYMENT_METHOD_COD, PaymentStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn email_status(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<EmailCheck>> {
    ensure_admin(user)?;
    let data = EmailCheck {
        configured: state.mailer.is_configured(),
        transports: state
            .mailer
            .transport_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    let message = if data.configured {
        "Email is configured"
    } else {
        "Email is not configured"
    };
    Ok(ApiResponse::success(message, data, Some(Meta::empty())))
}

/// Sends an order confirmation to `email`, for a stored order or a sample.
pub async fn send_test_email(
    state: &AppState,
    user: &AuthUser,
    payload: TestEmailRequest,
) -> AppResult<ApiResponse<EmailDelivery>> {
    ensure_admin(user)?;
    let to = payload.email.trim().to_string();
    if !to.contains('@') {
        return Err(AppError::BadRequest("A valid email address is required".into()));
    }

    let mut order = match payload.order_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => state
            .store
            .orders
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound("Order not found".into()))?,
        None => sample_order(),
    };
    order.customer_email = to.clone();

    let delivered = state.mailer.send_order_confirmation(&order).await;
    let message = if delivered {
        "Test email sent"
    } else {
        "Test email could not be delivered"
    };
    Ok(ApiResponse::success(
        message,
        EmailDelivery { delivered, to },
        Some(Meta::empty()),
    ))
}

fn sample_order() -> Order {
    let price = Decimal::new(12_500, 2);
    Order {
        id: "TEST-ORDER".to_string(),
        customer_name: "Test Customer".to_string(),
        customer_email: String::new(),
        customer_phone: "+91 90000 00000".to_string(),
        shipping_address: "123 Test Street".to_string(),
        city: "Mumbai".to_string(),
        state: "Maharashtra".to_string(),
        pin_code: "400001".to_string(),
        items: vec![OrderItem {
            product_id: "sample".to_string(),
            name: "Pearl Stud Earrings".to_string(),
            price,
            quantity: 1,
            image: String::new(),
        }],
        subtotal: price,
        shipping: Decimal::ZERO,
        total: price,
        payment_method: PAYMENT_METHOD_COD.to_string(),
        payment_status: PaymentStatus::Pending,
        order_status: OrderStatus::Processing,
        payment_id: None,
        gateway_order_id: None,
        tracking_number: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}
