use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    assets::AssetStore,
    config::AppConfig,
    email::Mailer,
    payment::{PaymentGateway, RazorpayClient},
    store::Store,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<Mailer>,
    pub assets: Arc<AssetStore>,
    pub jwt: Arc<JwtSettings>,
    pub payments: Arc<PaymentSettings>,
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl_hours: i64,
}

pub struct PaymentSettings {
    pub key_secret: String,
    pub webhook_secret: Option<String>,
    pub currency: String,
    /// Serialises signature verification so one gateway order yields one row.
    pub verify_lock: Mutex<()>,
}

impl PaymentSettings {
    pub fn new(key_secret: impl Into<String>, webhook_secret: Option<String>) -> Self {
        Self {
            key_secret: key_secret.into(),
            webhook_secret,
            currency: "INR".to_string(),
            verify_lock: Mutex::new(()),
        }
    }
}

impl AppState {
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = Store::open(&config.data_dir, config.stock_mode).await?;
        let gateway = RazorpayClient::new(
            config.razorpay.base_url.clone(),
            config.razorpay.key_id.clone(),
            config.razorpay.key_secret.clone(),
        );
        let mailer = Mailer::from_config(&config.email).await;

        Ok(Self {
            store: Arc::new(store),
            gateway: Arc::new(gateway),
            mailer: Arc::new(mailer),
            assets: Arc::new(AssetStore::new(config.assets_dir.clone())),
            jwt: Arc::new(JwtSettings {
                secret: config.jwt_secret.clone(),
                ttl_hours: config.jwt_ttl_hours,
            }),
            payments: Arc::new(PaymentSettings::new(
                config.razorpay.key_secret.clone(),
                config.razorpay.webhook_secret.clone(),
            )),
        })
    }
}
