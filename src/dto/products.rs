use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{flag, missing_fields};
use crate::{error::AppError, models::Product};

/// Admin product form. Create and update both send the full record.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = Option<String>, example = "125.00")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Defaults to 0 on create; left unchanged on update when absent.
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    #[schema(value_type = Option<u8>)]
    pub is_best_seller: Option<u8>,
    #[serde(default, deserialize_with = "flag")]
    #[schema(value_type = Option<u8>)]
    pub is_new_arrival: Option<u8>,
    pub material: Option<String>,
}

impl ProductPayload {
    /// Checks the required fields and returns the price.
    pub fn validate(&self) -> Result<Decimal, AppError> {
        let mut missing = missing_fields(&[
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
            ("category", self.category.as_str()),
        ]);
        if self.price.is_none() {
            missing.push("price");
        }
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let price = self.price.unwrap_or_default();
        if price <= Decimal::ZERO {
            return Err(AppError::BadRequest("Price must be greater than 0".into()));
        }
        if self.stock.is_some_and(|s| s < 0) {
            return Err(AppError::BadRequest("Stock cannot be negative".into()));
        }
        Ok(price)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockUpdateRequest {
    pub stock: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadSummary {
    pub products: usize,
}
