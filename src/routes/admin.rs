use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, patch, post, put},
};

use crate::{
    assets::{AssetKind, MAX_UPLOAD_BYTES, StoredAsset},
    dto::{
        AppJson,
        assets::{DeleteImageRequest, ImageUpload},
        categories::{CategoryList, CategoryPayload},
        email::{EmailCheck, EmailDelivery, TestEmailRequest},
        orders::{DeletedOrder, OrderList, UpdateOrderStatusRequest},
        products::{ProductList, ProductPayload, ReloadSummary, StockUpdateRequest},
    },
    error::AppResult,
    middleware::auth::AdminUser,
    models::{Category, Order, Product},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{
        asset_service, category_service, notification_service, order_service, product_service,
    },
    state::AppState,
};

/// Room for multipart framing around a maximum-size image.
pub const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

pub fn router() -> Router<AppState> {
    let uploads = Router::new()
        .route("/upload-image", post(upload_product_image))
        .route("/upload-category-image", post(upload_category_image))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/reload", post(reload_products))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/products/{id}/stock", patch(set_stock))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", put(update_category).delete(delete_category))
        .route("/orders", get(list_orders))
        .route("/orders/{id}", delete(delete_order))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/delete-image", delete(delete_image))
        .route("/test-email", post(test_email))
        .route("/send-test-email", post(send_test_email))
        .merge(uploads)
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses(
        (status = 200, description = "All products", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Missing required fields"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    AppJson(payload): AppJson<ProductPayload>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 400, description = "Missing required fields"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ProductPayload>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/products/{id}/stock",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    request_body = StockUpdateRequest,
    responses(
        (status = 200, description = "Stock set", body = ApiResponse<Product>),
        (status = 400, description = "Negative stock"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_stock(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<StockUpdateRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::set_stock(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<Product>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::delete_product(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products/reload",
    responses(
        (status = 200, description = "Products re-read from disk", body = ApiResponse<ReloadSummary>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reload_products(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> AppResult<Json<ApiResponse<ReloadSummary>>> {
    let resp = product_service::reload_products(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<CategoryList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    AdminUser(_user): AdminUser,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<Category>),
        (status = 400, description = "Category name is required"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Slug already in use"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    AppJson(payload): AppJson<CategoryPayload>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::update_category(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = String, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<Category>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::delete_category(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(
        ("page" = Option<usize>, Query, description = "Page number, default 1"),
        ("per_page" = Option<usize>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "pending, processing, shipped or delivered"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc (default)")
    ),
    responses(
        (status = 200, description = "Orders, newest first", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, &user, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = String, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order deleted", body = ApiResponse<DeletedOrder>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeletedOrder>>> {
    let resp = order_service::delete_order(&state, &user, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/upload-image",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<StoredAsset>),
        (status = 400, description = "No file or not an image"),
        (status = 403, description = "Forbidden"),
        (status = 413, description = "File larger than 5 MB"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_product_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<StoredAsset>>> {
    let resp = asset_service::upload_image(&state, &user, AssetKind::Products, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/upload-category-image",
    request_body(content = ImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<StoredAsset>),
        (status = 400, description = "No file or not an image"),
        (status = 403, description = "Forbidden"),
        (status = 413, description = "File larger than 5 MB"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_category_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<StoredAsset>>> {
    let resp = asset_service::upload_image(&state, &user, AssetKind::Categories, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/delete-image",
    request_body = DeleteImageRequest,
    responses(
        (status = 200, description = "Image deleted"),
        (status = 400, description = "Missing or invalid URL"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Image file not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_image(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    AppJson(payload): AppJson<DeleteImageRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = asset_service::delete_image(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/test-email",
    responses(
        (status = 200, description = "Email transport status", body = ApiResponse<EmailCheck>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn test_email(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> AppResult<Json<ApiResponse<EmailCheck>>> {
    let resp = notification_service::email_status(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/send-test-email",
    request_body = TestEmailRequest,
    responses(
        (status = 200, description = "Delivery attempted", body = ApiResponse<EmailDelivery>),
        (status = 400, description = "Invalid email"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn send_test_email(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
    AppJson(payload): AppJson<TestEmailRequest>,
) -> AppResult<Json<ApiResponse<EmailDelivery>>> {
    let resp = notification_service::send_test_email(&state, &user, payload).await?;
    Ok(Json(resp))
}
