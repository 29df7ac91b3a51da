use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    application::services::gateway::{
        DeliveryGateway, DeliveryReceipt, EmailRecipient, GatewayError,
    },
    config::ProviderConfig,
};

/// MaddyCMS bulk delivery client. Every call is signed with the static
/// client-id/secret pair as a basic-auth header; credentials and the base
/// endpoint are fixed for the process lifetime.
pub struct MaddyCmsClient {
    http: Client,
    base_url: String,
    client_id: String,
    secret_key: String,
}

impl MaddyCmsClient {
    pub fn new(config: &ProviderConfig) -> Arc<dyn DeliveryGateway> {
        Arc::new(Self {
            http: Client::builder()
                .user_agent("bulk-messaging/maddycms")
                .build()
                .expect("failed to build maddycms client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            secret_key: config.secret_key.clone(),
        }) as Arc<dyn DeliveryGateway>
    }

    async fn post<T: Serialize + Sync>(
        &self,
        path: &str,
        payload: &T,
        fallback: &str,
    ) -> Result<ProviderResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.secret_key))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ProviderResponse>()
                .await
                .ok()
                .and_then(|body| body.detail.or(body.message))
                .unwrap_or_else(|| fallback.to_string());
            tracing::error!(status = %status, detail, "provider rejected request");
            return Err(GatewayError::Provider(detail));
        }

        response
            .json::<ProviderResponse>()
            .await
            .map_err(|_| GatewayError::Provider(fallback.to_string()))
    }
}

#[async_trait]
impl DeliveryGateway for MaddyCmsClient {
    async fn send_bulk_sms(
        &self,
        numbers: &[String],
        body: &str,
        sender_label: &str,
    ) -> Result<DeliveryReceipt, GatewayError> {
        if numbers.is_empty() {
            return Err(GatewayError::Provider(
                "empty recipient batch".to_string(),
            ));
        }

        tracing::debug!(recipients = numbers.len(), "sending bulk sms");

        let request = SmsSendRequest {
            recipients: numbers
                .iter()
                .map(|phone| SmsRecipientPayload { phone })
                .collect(),
            message: body,
            sender_id: (!sender_label.is_empty()).then_some(sender_label),
        };

        let payload = self.post("/sms/send", &request, "Failed to send SMS").await?;

        Ok(DeliveryReceipt {
            accepted: payload.success.unwrap_or(false) || payload.message_id.is_some(),
            correlation_id: payload.message_id,
        })
    }

    async fn send_bulk_email(
        &self,
        recipients: &[EmailRecipient],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<DeliveryReceipt, GatewayError> {
        if recipients.is_empty() {
            return Err(GatewayError::Provider(
                "empty recipient batch".to_string(),
            ));
        }

        tracing::debug!(recipients = recipients.len(), "sending bulk email");

        let request = EmailSendRequest {
            recipients: recipients
                .iter()
                .map(|recipient| EmailRecipientPayload {
                    email: &recipient.address,
                    name: &recipient.display_name,
                })
                .collect(),
            subject,
            html: html_body,
            text: text_body,
        };

        let payload = self
            .post("/email/send-bulk", &request, "Failed to send bulk email")
            .await?;

        Ok(DeliveryReceipt {
            accepted: payload.success.unwrap_or(false)
                || payload.batch_id.is_some()
                || payload.message_id.is_some(),
            correlation_id: payload.batch_id.or(payload.message_id),
        })
    }
}

#[derive(Serialize)]
struct SmsSendRequest<'a> {
    recipients: Vec<SmsRecipientPayload<'a>>,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_id: Option<&'a str>,
}

#[derive(Serialize)]
struct SmsRecipientPayload<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct EmailSendRequest<'a> {
    recipients: Vec<EmailRecipientPayload<'a>>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct EmailRecipientPayload<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    success: Option<bool>,
    message_id: Option<String>,
    batch_id: Option<String>,
    detail: Option<String>,
    message: Option<String>,
}
