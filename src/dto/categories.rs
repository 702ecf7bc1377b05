use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppError, models::Category};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryPayload {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl CategoryPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Category name is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}
