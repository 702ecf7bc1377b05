use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestEmailRequest {
    #[serde(default)]
    pub email: String,
    pub order_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmailCheck {
    pub configured: bool,
    pub transports: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmailDelivery {
    pub delivered: bool,
    pub to: String,
}
