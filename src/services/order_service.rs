use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutDetails, CreateOrderRequest, DeletedOrder, OrderList, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus, PAYMENT_METHOD_COD, PAYMENT_METHOD_RAZORPAY, PaymentStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
    store::Reconciliation,
};

/// How an order was (or will be) paid.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub method: String,
    pub status: PaymentStatus,
    pub payment_id: Option<String>,
    pub gateway_order_id: Option<String>,
}

/// Validates the checkout, reserves stock and stores the order. The
/// confirmation email goes out in the background.
pub async fn place_order(
    state: &AppState,
    details: CheckoutDetails,
    payment: PaymentRecord,
) -> AppResult<Order> {
    details.validate()?;

    match state.store.reconcile_stock(&details.stock_requests()).await? {
        Reconciliation::Reserved => {}
        Reconciliation::Rejected(shortfall) => {
            tracing::warn!(
                customer = %details.customer_email,
                items = shortfall.out_of_stock_items.len(),
                message = %shortfall.message,
                "order rejected for stock"
            );
            return Err(AppError::OutOfStock(shortfall));
        }
    }

    let order = Order {
        id: Uuid::new_v4().to_string(),
        customer_name: details.customer_name.trim().to_string(),
        customer_email: details.customer_email.trim().to_string(),
        customer_phone: details.customer_phone.trim().to_string(),
        shipping_address: details.shipping_address.trim().to_string(),
        city: details.city.trim().to_string(),
        state: details.state.trim().to_string(),
        pin_code: details.pin_code.trim().to_string(),
        items: details.items,
        subtotal: details.subtotal,
        shipping: details.shipping,
        total: details.total,
        payment_method: payment.method,
        payment_status: payment.status,
        order_status: OrderStatus::Processing,
        payment_id: payment.payment_id,
        gateway_order_id: payment.gateway_order_id,
        tracking_number: None,
        created_at: Utc::now(),
        updated_at: None,
    };

    let order = state.store.orders.upsert(order).await?;
    tracing::info!(
        order_id = %order.id,
        payment_method = %order.payment_method,
        total = %order.total,
        items = order.items.len(),
        "order created"
    );

    let mailer = state.mailer.clone();
    let snapshot = order.clone();
    tokio::spawn(async move {
        mailer.send_order_confirmation(&snapshot).await;
    });

    Ok(order)
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let method = payload.payment_method.trim().to_ascii_lowercase();
    if method.is_empty() {
        return Err(AppError::BadRequest("Missing required fields: paymentMethod".into()));
    }
    if method == PAYMENT_METHOD_RAZORPAY {
        return Err(AppError::BadRequest(
            "Online payments are confirmed through /api/razorpay/verify".into(),
        ));
    }

    let status = if method == PAYMENT_METHOD_COD {
        PaymentStatus::Pending
    } else {
        PaymentStatus::Completed
    };
    let payment = PaymentRecord {
        method,
        status,
        payment_id: payload.payment_id.filter(|v| !v.is_empty()),
        gateway_order_id: payload.order_id.filter(|v| !v.is_empty()),
    };

    let order = place_order(state, payload.details, payment).await?;
    Ok(ApiResponse::success("Order created", order, Some(Meta::empty())))
}

pub async fn get_order(state: &AppState, id: &str) -> AppResult<ApiResponse<Order>> {
    let order = state
        .store
        .orders
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    Ok(ApiResponse::success("Order", order, None))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut orders = match query.status {
        Some(status) => state.store.orders.filter(|o| o.order_status == status).await,
        None => state.store.orders.all().await,
    };
    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => orders.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::Desc => orders.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let total = orders.len();
    let items = orders.into_iter().skip(offset).take(limit).collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let tracking_number = payload
        .tracking_number
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let new_status = payload.status;

    let (order, old_status) = state
        .store
        .orders
        .update(id, |o| {
            let old = std::mem::replace(&mut o.order_status, new_status);
            if let Some(tracking) = &tracking_number {
                o.tracking_number = Some(tracking.clone());
            }
            o.updated_at = Some(Utc::now());
            old
        })
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    tracing::info!(order_id = %order.id, from = %old_status, to = %new_status, "order status updated");

    if old_status != new_status {
        let mailer = state.mailer.clone();
        let snapshot = order.clone();
        tokio::spawn(async move {
            mailer
                .send_status_update(&snapshot, old_status, tracking_number.as_deref())
                .await;
        });
    }

    Ok(ApiResponse::success("Order status updated", order, Some(Meta::empty())))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<DeletedOrder>> {
    ensure_admin(user)?;
    let order = state
        .store
        .orders
        .remove(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    tracing::info!(order_id = %order.id, "order deleted");
    Ok(ApiResponse::success(
        "Order deleted",
        DeletedOrder { deleted_order: order },
        Some(Meta::empty()),
    ))
}
