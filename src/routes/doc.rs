use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    assets::StoredAsset,
    dto::{
        assets::{DeleteImageRequest, ImageUpload},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        categories::{CategoryList, CategoryPayload},
        email::{EmailCheck, EmailDelivery, TestEmailRequest},
        orders::{CheckoutDetails, CreateOrderRequest, DeletedOrder, OrderList, UpdateOrderStatusRequest},
        payments::{
            PaymentOrderRequest, PaymentOrderResponse, VerifiedPayment, VerifyPaymentRequest,
            WebhookAck,
        },
        products::{ProductList, ProductPayload, ReloadSummary, StockUpdateRequest},
    },
    models::{Category, Order, OrderItem, OrderStatus, PaymentStatus, Product, PublicUser, UserRole},
    response::{ApiResponse, Meta},
    routes::{admin, auth, categories, health, orders, params, payments, products},
    store::{OutOfStockItem, StockShortfall},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::list_best_sellers,
        products::list_new_arrivals,
        products::list_by_category,
        products::get_product_by_slug,
        products::get_product,
        categories::list_categories,
        categories::get_category,
        orders::create_order,
        orders::get_order,
        payments::create_payment_order,
        payments::verify_payment,
        payments::webhook,
        auth::register,
        auth::login,
        auth::me,
        admin::list_products,
        admin::create_product,
        admin::update_product,
        admin::set_stock,
        admin::delete_product,
        admin::reload_products,
        admin::list_categories,
        admin::create_category,
        admin::update_category,
        admin::delete_category,
        admin::list_orders,
        admin::update_order_status,
        admin::delete_order,
        admin::upload_product_image,
        admin::upload_category_image,
        admin::delete_image,
        admin::test_email,
        admin::send_test_email
    ),
    components(
        schemas(
            Product,
            Category,
            Order,
            OrderItem,
            OrderStatus,
            PaymentStatus,
            PublicUser,
            UserRole,
            ProductPayload,
            ProductList,
            StockUpdateRequest,
            ReloadSummary,
            CategoryPayload,
            CategoryList,
            CheckoutDetails,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderList,
            DeletedOrder,
            PaymentOrderRequest,
            PaymentOrderResponse,
            VerifyPaymentRequest,
            VerifiedPayment,
            WebhookAck,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            DeleteImageRequest,
            ImageUpload,
            StoredAsset,
            TestEmailRequest,
            EmailCheck,
            EmailDelivery,
            OutOfStockItem,
            StockShortfall,
            params::Pagination,
            params::SortOrder,
            params::OrderListQuery,
            health::HealthData,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<StockShortfall>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalogue endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Orders", description = "Checkout endpoints"),
        (name = "Payments", description = "Razorpay order, verification and webhook"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Admin", description = "Admin endpoints, bearer token with the admin role"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
