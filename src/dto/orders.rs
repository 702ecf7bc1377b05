use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::missing_fields;
use crate::{
    error::AppError,
    models::{Order, OrderItem, OrderStatus, PAYMENT_METHOD_COD},
    store::StockRequest,
};

/// Customer, address, cart and totals submitted at checkout.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    #[schema(value_type = String, example = "250.00")]
    pub subtotal: Decimal,
    #[serde(default)]
    #[schema(value_type = String, example = "0")]
    pub shipping: Decimal,
    #[serde(default)]
    #[schema(value_type = String, example = "250.00")]
    pub total: Decimal,
}

impl CheckoutDetails {
    pub fn validate(&self) -> Result<(), AppError> {
        let missing = missing_fields(&[
            ("customerName", self.customer_name.as_str()),
            ("customerEmail", self.customer_email.as_str()),
            ("customerPhone", self.customer_phone.as_str()),
            ("shippingAddress", self.shipping_address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("pinCode", self.pin_code.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        if !self.customer_email.contains('@') {
            return Err(AppError::BadRequest("Invalid customer email".into()));
        }
        if self.items.is_empty() {
            return Err(AppError::BadRequest("Order must contain at least one item".into()));
        }
        for item in &self.items {
            if item.product_id.trim().is_empty() {
                return Err(AppError::BadRequest("Every item needs a productId".into()));
            }
            if item.quantity < 1 {
                return Err(AppError::BadRequest(format!(
                    "Quantity for {} must be at least 1",
                    item.name
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(AppError::BadRequest(format!("Price for {} cannot be negative", item.name)));
            }
        }
        if self.subtotal < Decimal::ZERO || self.shipping < Decimal::ZERO || self.total <= Decimal::ZERO {
            return Err(AppError::BadRequest("Order amounts are invalid".into()));
        }
        Ok(())
    }

    pub fn stock_requests(&self) -> Vec<StockRequest> {
        self.items
            .iter()
            .map(|item| StockRequest {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                name: Some(item.name.clone()),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(flatten)]
    pub details: CheckoutDetails,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
}

fn default_payment_method() -> String {
    PAYMENT_METHOD_COD.to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedOrder {
    pub deleted_order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(raw: &str) -> CheckoutDetails {
        serde_json::from_str(raw).expect("details")
    }

    const VALID: &str = r#"{
        "customerName": "Asha",
        "customerEmail": "asha@example.com",
        "customerPhone": "9999999999",
        "shippingAddress": "12 MG Road",
        "city": "Pune",
        "state": "MH",
        "pinCode": "411001",
        "items": [{"productId": "p1", "name": "Ring", "price": "100", "quantity": 2}],
        "subtotal": "200",
        "shipping": 0,
        "total": "200"
    }"#;

    #[test]
    fn complete_checkout_is_valid() {
        let d = details(VALID);
        d.validate().expect("valid");
        let requests = d.stock_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].quantity, 2);
    }

    #[test]
    fn blank_address_fields_are_reported() {
        let d = details(r#"{"customerName": "Asha", "items": []}"#);
        let err = d.validate().unwrap_err().to_string();
        assert!(err.contains("customerEmail"));
        assert!(err.contains("pinCode"));
        assert!(!err.contains("customerName"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let raw = VALID.replace(r#""quantity": 2"#, r#""quantity": 0"#);
        assert!(matches!(details(&raw).validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn payment_method_defaults_to_cod() {
        let request: CreateOrderRequest = serde_json::from_str(VALID).expect("request");
        assert_eq!(request.payment_method, "cod");
        assert_eq!(request.details.city, "Pune");
    }
}
