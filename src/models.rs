use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "125.00")]
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub is_best_seller: u8,
    #[serde(default)]
    pub is_new_arrival: u8,
    pub material: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Line item captured at order time. Never re-read from the live product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    #[schema(value_type = String, example = "125.00")]
    pub price: Decimal,
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PAYMENT_METHOD_COD: &str = "cod";
pub const PAYMENT_METHOD_RAZORPAY: &str = "razorpay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub items: Vec<OrderItem>,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub shipping: Decimal,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub payment_id: Option<String>,
    /// Gateway-side order reference.
    #[serde(rename = "orderId")]
    pub gateway_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// True when `email` or `phone` matches this account exactly.
    pub fn matches_contact(&self, email: Option<&str>, phone: Option<&str>) -> bool {
        let email_hit = matches!((self.email.as_deref(), email), (Some(a), Some(b)) if a == b);
        let phone_hit = matches!((self.phone.as_deref(), phone), (Some(a), Some(b)) if a == b);
        email_hit || phone_hit
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_uses_camel_case_wire_names() {
        let raw = r#"{
            "id": "p1",
            "name": "Wave Bangle",
            "slug": "wave-bangle",
            "description": null,
            "price": "285.00",
            "category": "bracelets",
            "images": [],
            "stock": 8,
            "isBestSeller": 1,
            "isNewArrival": 0,
            "material": "18k Gold"
        }"#;
        let product: Product = serde_json::from_str(raw).expect("parse product");
        assert_eq!(product.is_best_seller, 1);
        assert_eq!(product.price.to_string(), "285.00");

        let value = serde_json::to_value(&product).expect("serialize");
        assert_eq!(value["isBestSeller"], 1);
        assert_eq!(value["price"], "285.00");
    }

    #[test]
    fn order_gateway_reference_keeps_order_id_name() {
        let raw = r#"{
            "id": "o1",
            "customerName": "Asha",
            "customerEmail": "asha@example.com",
            "customerPhone": "9876543210",
            "shippingAddress": "12 MG Road",
            "city": "Pune",
            "state": "MH",
            "pinCode": "411001",
            "items": [],
            "subtotal": "100.00",
            "shipping": "0",
            "total": "100.00",
            "paymentMethod": "razorpay",
            "paymentStatus": "completed",
            "orderStatus": "processing",
            "paymentId": "pay_1",
            "orderId": "order_1",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }"#;
        let order: Order = serde_json::from_str(raw).expect("parse order");
        assert_eq!(order.gateway_order_id.as_deref(), Some("order_1"));
        assert_eq!(order.order_status, OrderStatus::Processing);
        assert!(order.tracking_number.is_none());
    }

    #[test]
    fn contact_match_ignores_missing_fields() {
        let user = User {
            id: "u1".into(),
            name: "Asha".into(),
            email: None,
            phone: Some("9876543210".into()),
            password_hash: "x".into(),
            role: UserRole::Customer,
            created_at: Utc::now(),
        };
        assert!(user.matches_contact(None, Some("9876543210")));
        assert!(!user.matches_contact(None, None));
        assert!(!user.matches_contact(Some("asha@example.com"), None));
    }
}
