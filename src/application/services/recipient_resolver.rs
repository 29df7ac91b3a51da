use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    errors::DispatchError,
    models::{Channel, MessageStatus, Recipient},
    repositories::ContactRepository,
};

/// An ad-hoc addressee supplied directly in the dispatch request instead of
/// referencing a stored contact.
#[derive(Debug, Clone)]
pub struct DirectRecipient {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// Turns contact references and direct addressees into the channel-eligible
/// recipient list a message is persisted with. Contact ids that are unknown
/// or owned by someone else are dropped silently, as are candidates lacking
/// the channel-required address field. No deduplication is performed across
/// the two sources.
pub struct RecipientResolver {
    contact_repo: Arc<dyn ContactRepository>,
}

impl RecipientResolver {
    pub fn new(contact_repo: Arc<dyn ContactRepository>) -> Self {
        Self { contact_repo }
    }

    pub async fn resolve(
        &self,
        user_id: Uuid,
        channel: Channel,
        contact_ids: &[Uuid],
        direct: &[DirectRecipient],
    ) -> Result<Vec<Recipient>, DispatchError> {
        if contact_ids.is_empty() && direct.is_empty() {
            return Err(DispatchError::MissingRecipients);
        }

        let mut candidates = Vec::new();

        if !contact_ids.is_empty() {
            let contacts = self
                .contact_repo
                .find_by_ids_for_owner(user_id, contact_ids)
                .await?;
            tracing::debug!(requested = contact_ids.len(), found = contacts.len(), "resolved contact references");
            candidates.extend(contacts.into_iter().map(|contact| Recipient {
                name: contact.name,
                phone_number: contact.phone_number,
                email: contact.email,
                status: MessageStatus::Pending,
                message_id: None,
                error: None,
            }));
        }

        candidates.extend(direct.iter().map(|recipient| Recipient {
            name: recipient
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Direct Recipient".to_string()),
            phone_number: recipient.phone_number.clone(),
            email: recipient.email.clone(),
            status: MessageStatus::Pending,
            message_id: None,
            error: None,
        }));

        let total = candidates.len();
        let recipients: Vec<Recipient> = candidates
            .into_iter()
            .filter(|recipient| recipient.eligible_for(channel))
            .collect();
        tracing::debug!(candidates = total, eligible = recipients.len(), "filtered recipients for channel");

        if recipients.is_empty() {
            return Err(DispatchError::NoValidRecipients);
        }

        Ok(recipients)
    }
}
