use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{EmailError, EmailMessage, EmailTransport, Sender};

const NAME: &str = "sendgrid";
const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridTransport {
    http: Client,
    api_key: String,
}

impl SendGridTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl EmailTransport for SendGridTransport {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, from: &Sender, message: &EmailMessage) -> Result<(), EmailError> {
        let payload = json!({
            "personalizations": [{ "to": [{ "email": message.to }] }],
            "from": { "email": from.email, "name": from.name },
            "subject": message.subject,
            "content": [{ "type": "text/plain", "value": message.body }],
        });

        let response = self
            .http
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| EmailError::Delivery {
                transport: NAME,
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, body = %body, "SendGrid rejected email");
            return Err(EmailError::Delivery {
                transport: NAME,
                reason: format!("status {status}"),
            });
        }

        Ok(())
    }
}
