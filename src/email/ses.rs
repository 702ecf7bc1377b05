use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sesv2::{
    Client as SesClient,
    config::Credentials,
    types::{Body, Content, Destination, EmailContent, Message},
};

use super::{EmailError, EmailMessage, EmailTransport, Sender};
use crate::config::AwsCredentials;

const NAME: &str = "ses";

pub struct SesTransport {
    client: SesClient,
}

impl SesTransport {
    pub async fn load(aws: &AwsCredentials) -> Self {
        let credentials = Credentials::new(
            aws.access_key_id.clone(),
            aws.secret_access_key.clone(),
            None,
            None,
            "env-credentials",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(aws.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        tracing::info!(region = %aws.region, "AWS SES client initialized");

        Self {
            client: SesClient::new(&config),
        }
    }
}

fn utf8(data: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::Delivery {
            transport: NAME,
            reason: e.to_string(),
        })
}

#[async_trait]
impl EmailTransport for SesTransport {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn send(&self, from: &Sender, message: &EmailMessage) -> Result<(), EmailError> {
        let destination = Destination::builder().to_addresses(&message.to).build();

        let body = Body::builder().text(utf8(&message.body)?).build();
        let simple = Message::builder()
            .subject(utf8(&message.subject)?)
            .body(body)
            .build();
        let content = EmailContent::builder().simple(simple).build();

        self.client
            .send_email()
            .from_email_address(format!("{} <{}>", from.name, from.email))
            .destination(destination)
            .content(content)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send email: {:?}", e);
                EmailError::Delivery {
                    transport: NAME,
                    reason: e.to_string(),
                }
            })?;

        Ok(())
    }
}
