//! Outbound order emails.
//!
//! Delivery is best effort: the [`Mailer`] walks its transports in order,
//! retrying the first one, and reports failure with a log entry instead of an
//! error so that order handling never depends on email.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::EmailConfig,
    models::{Order, OrderStatus},
};

mod sendgrid;
mod ses;
pub mod templates;

pub use sendgrid::SendGridTransport;
pub use ses::SesTransport;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("{transport} delivery failed: {reason}")]
    Delivery { transport: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Sender {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, from: &Sender, message: &EmailMessage) -> Result<(), EmailError>;
}

pub struct Mailer {
    sender: Option<Sender>,
    transports: Vec<Arc<dyn EmailTransport>>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Mailer {
    pub fn new(sender: Sender, transports: Vec<Arc<dyn EmailTransport>>) -> Self {
        Self {
            sender: Some(sender),
            transports,
            max_attempts: 2,
            retry_delay: Duration::from_secs(1),
        }
    }

    /// A mailer that logs every message as undeliverable.
    pub fn disabled() -> Self {
        Self {
            sender: None,
            transports: Vec::new(),
            max_attempts: 1,
            retry_delay: Duration::ZERO,
        }
    }

    /// Attempts on the first transport before falling back.
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Builds SES and SendGrid transports from whatever credentials are set.
    pub async fn from_config(config: &EmailConfig) -> Self {
        let Some(from_email) = config.from_email.clone() else {
            tracing::warn!("FROM_EMAIL is not set, order emails are disabled");
            return Self::disabled();
        };

        let mut transports: Vec<Arc<dyn EmailTransport>> = Vec::new();
        if let Some(aws) = &config.aws {
            transports.push(Arc::new(SesTransport::load(aws).await));
        }
        if let Some(api_key) = &config.sendgrid_api_key {
            transports.push(Arc::new(SendGridTransport::new(api_key.clone())));
        }
        if config.prefer_sendgrid {
            transports.reverse();
        }
        if transports.is_empty() {
            tracing::warn!("no email transport configured, order emails are disabled");
        }

        let names: Vec<_> = transports.iter().map(|t| t.name()).collect();
        tracing::info!(transports = ?names, "mailer ready");

        Self::new(
            Sender {
                email: from_email,
                name: config.from_name.clone(),
            },
            transports,
        )
        .with_retry(config.max_attempts, Duration::from_secs(1))
    }

    pub fn is_configured(&self) -> bool {
        self.sender.is_some() && !self.transports.is_empty()
    }

    pub fn transport_names(&self) -> Vec<&'static str> {
        self.transports.iter().map(|t| t.name()).collect()
    }

    /// Sends `message`, returning whether any transport accepted it.
    pub async fn send(&self, message: &EmailMessage) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };

        for (index, transport) in self.transports.iter().enumerate() {
            let attempts = if index == 0 { self.max_attempts } else { 1 };
            for attempt in 1..=attempts {
                match transport.send(sender, message).await {
                    Ok(()) => {
                        tracing::info!(transport = transport.name(), to = %message.to, "email sent");
                        return true;
                    }
                    Err(err) => {
                        tracing::warn!(
                            transport = transport.name(),
                            attempt,
                            error = %err,
                            "email attempt failed"
                        );
                        if attempt < attempts && !self.retry_delay.is_zero() {
                            tokio::time::sleep(self.retry_delay).await;
                        }
                    }
                }
            }
        }
        false
    }

    pub async fn send_order_confirmation(&self, order: &Order) -> bool {
        let message = templates::order_confirmation(order);
        let delivered = self.send(&message).await;
        if !delivered {
            tracing::error!(
                order_id = %order.id,
                customer = %order.customer_name,
                email = %order.customer_email,
                phone = %order.customer_phone,
                total = %order.total,
                status = %order.order_status,
                "order confirmation email failed, manual follow-up required"
            );
        }
        delivered
    }

    pub async fn send_status_update(
        &self,
        order: &Order,
        old_status: OrderStatus,
        tracking_number: Option<&str>,
    ) -> bool {
        let message = templates::status_update(order, old_status, tracking_number);
        let delivered = self.send(&message).await;
        if !delivered {
            tracing::error!(
                order_id = %order.id,
                customer = %order.customer_name,
                email = %order.customer_email,
                from = %old_status,
                to = %order.order_status,
                tracking = tracking_number.unwrap_or("-"),
                "status update email failed, manual follow-up required"
            );
        }
        delivered
    }
}
