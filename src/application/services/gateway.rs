use async_trait::async_trait;
use thiserror::Error;

/// Provider-side failure of a batch submission: transport errors, non-2xx
/// responses, and payloads the provider contract does not cover. Carries
/// the provider's reported detail where one was given.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Provider(String),
    #[error("failed to reach delivery provider: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Normalized provider answer for one batch. A batch counts as accepted
/// when the provider reports an explicit success flag or supplies any
/// message/batch identifier; absence of both is a provider-level failure.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    pub accepted: bool,
    pub correlation_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailRecipient {
    pub address: String,
    pub display_name: String,
}

/// Uniform interface to the external bulk delivery capability, one
/// operation per channel. Each call covers the whole batch in a single
/// round-trip; there is no per-recipient submission.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    async fn send_bulk_sms(
        &self,
        numbers: &[String],
        body: &str,
        sender_label: &str,
    ) -> Result<DeliveryReceipt, GatewayError>;

    async fn send_bulk_email(
        &self,
        recipients: &[EmailRecipient],
        subject: &str,
        html_body: &str,
        text_body: &str,
    ) -> Result<DeliveryReceipt, GatewayError>;
}

/// Naive markup-stripping pass used to derive the plain-text email body
/// from the HTML content. Not an HTML parser.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}
