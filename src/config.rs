use std::{env, path::PathBuf};

use anyhow::Context;

use crate::store::StockMode;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub stock_mode: StockMode,
    pub razorpay: RazorpayConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub webhook_secret: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub from_email: Option<String>,
    pub from_name: String,
    pub aws: Option<AwsCredentials>,
    pub sendgrid_api_key: Option<String>,
    pub prefer_sendgrid: bool,
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let assets_dir = env::var("ASSETS_DIR").unwrap_or_else(|_| "attached_assets".to_string());
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .unwrap_or(24);
        let stock_mode = match env::var("STOCK_MODE") {
            Ok(raw) => raw.parse::<StockMode>()?,
            Err(_) => StockMode::default(),
        };

        Ok(Self {
            host,
            port,
            data_dir: PathBuf::from(data_dir),
            assets_dir: PathBuf::from(assets_dir),
            jwt_secret,
            jwt_ttl_hours,
            stock_mode,
            razorpay: RazorpayConfig::from_env()?,
            email: EmailConfig::from_env(),
        })
    }
}

impl RazorpayConfig {
    fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            key_id: env::var("RAZORPAY_KEY_ID").context("RAZORPAY_KEY_ID is not set")?,
            key_secret: env::var("RAZORPAY_SECRET").context("RAZORPAY_SECRET is not set")?,
            webhook_secret: non_empty_var("RAZORPAY_WEBHOOK_SECRET"),
            base_url: env::var("RAZORPAY_BASE_URL")
                .unwrap_or_else(|_| "https://api.razorpay.com".to_string()),
        })
    }
}

impl EmailConfig {
    fn from_env() -> Self {
        let aws = match (
            non_empty_var("AWS_ACCESS_KEY_ID"),
            non_empty_var("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
                region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            }),
            _ => None,
        };

        Self {
            from_email: non_empty_var("FROM_EMAIL"),
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Radheya Alankara".to_string()),
            aws,
            sendgrid_api_key: non_empty_var("SENDGRID_API_KEY"),
            prefer_sendgrid: env::var("EMAIL_PREFER_SENDGRID")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            max_attempts: env::var("EMAIL_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(2)
                .max(1),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
