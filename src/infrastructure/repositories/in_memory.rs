use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{
    models::{Contact, Message, MessageStats, MessageStatus, NewMessage},
    repositories::{ContactRepository, MessageFilter, MessageRepository},
};

#[derive(Default)]
pub struct InMemoryContactRepository {
    contacts: Arc<RwLock<HashMap<Uuid, Contact>>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, contact: Contact) {
        let mut contacts = self.contacts.write().await;
        contacts.insert(contact.id, contact);
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn find_by_ids_for_owner(
        &self,
        owner_id: Uuid,
        ids: &[Uuid],
    ) -> anyhow::Result<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| contacts.get(id))
            .filter(|contact| contact.user_id == owner_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<HashMap<Uuid, Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, draft: NewMessage) -> anyhow::Result<Message> {
        let now = Utc::now();
        let message = Message {
            id: Uuid::new_v4(),
            user_id: draft.user_id,
            channel: draft.channel,
            content: draft.content,
            subject: draft.subject,
            total_recipients: draft.recipients.len() as u32,
            recipients: draft.recipients,
            successful_sends: 0,
            failed_sends: 0,
            status: MessageStatus::Pending,
            scheduled_for: draft.scheduled_for,
            sent_at: None,
            cost: 0.0,
            created_at: now,
            updated_at: now,
        };
        let mut messages = self.messages.write().await;
        messages.insert(message.id, message.clone());
        Ok(message)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        let messages = self.messages.read().await;
        Ok(messages.get(&id).cloned())
    }

    async fn save(&self, message: &Message) -> anyhow::Result<Message> {
        let mut messages = self.messages.write().await;
        messages.insert(message.id, message.clone());
        Ok(message.clone())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: MessageFilter,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<(Vec<Message>, u64)> {
        let messages = self.messages.read().await;
        let mut matching: Vec<Message> = messages
            .values()
            .filter(|m| m.user_id == user_id)
            .filter(|m| filter.channel.is_none_or(|channel| m.channel == channel))
            .filter(|m| filter.status.is_none_or(|status| m.status == status))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let offset = (page.saturating_sub(1) as usize) * limit as usize;
        let page_items = matching
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        Ok((page_items, total))
    }

    async fn stats_for_user(&self, user_id: Uuid) -> anyhow::Result<MessageStats> {
        let messages = self.messages.read().await;
        let day_start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();

        let mut stats = MessageStats::default();
        for message in messages.values().filter(|m| m.user_id == user_id) {
            stats.total_messages += 1;
            stats.total_recipients += u64::from(message.total_recipients);
            stats.successful_sends += u64::from(message.successful_sends);
            stats.failed_sends += u64::from(message.failed_sends);
            stats.total_cost += message.cost;
            if message.created_at >= day_start {
                stats.today_messages += 1;
                stats.today_recipients += u64::from(message.total_recipients);
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Channel;

    fn draft(user_id: Uuid, channel: Channel) -> NewMessage {
        NewMessage {
            user_id,
            channel,
            content: "hi".to_string(),
            subject: None,
            recipients: vec![],
            scheduled_for: None,
        }
    }

    #[tokio::test]
    async fn create_initializes_counters_and_status() {
        let repo = InMemoryMessageRepository::new();
        let message = repo.create(draft(Uuid::new_v4(), Channel::Sms)).await.unwrap();

        assert_eq!(message.status, MessageStatus::Pending);
        assert_eq!(message.successful_sends, 0);
        assert_eq!(message.failed_sends, 0);
        assert_eq!(message.cost, 0.0);
        assert!(message.sent_at.is_none());
    }

    #[tokio::test]
    async fn list_filters_by_channel_and_pages_newest_first() {
        let repo = InMemoryMessageRepository::new();
        let user_id = Uuid::new_v4();
        for _ in 0..3 {
            repo.create(draft(user_id, Channel::Sms)).await.unwrap();
        }
        repo.create(draft(user_id, Channel::Email)).await.unwrap();
        repo.create(draft(Uuid::new_v4(), Channel::Sms)).await.unwrap();

        let filter = MessageFilter {
            channel: Some(Channel::Sms),
            status: None,
        };
        let (page_one, total) = repo.list_by_user(user_id, filter, 1, 2).await.unwrap();
        let (page_two, _) = repo.list_by_user(user_id, filter, 2, 2).await.unwrap();

        assert_eq!(total, 3);
        assert_eq!(page_one.len(), 2);
        assert_eq!(page_two.len(), 1);
        assert!(page_one[0].created_at >= page_one[1].created_at);
    }

    #[tokio::test]
    async fn stats_aggregate_per_user() {
        let repo = InMemoryMessageRepository::new();
        let user_id = Uuid::new_v4();

        let mut first = repo.create(draft(user_id, Channel::Sms)).await.unwrap();
        first.total_recipients = 3;
        first.successful_sends = 2;
        first.failed_sends = 1;
        first.cost = 0.02;
        repo.save(&first).await.unwrap();

        let mut second = repo.create(draft(user_id, Channel::Email)).await.unwrap();
        second.total_recipients = 1;
        second.failed_sends = 1;
        repo.save(&second).await.unwrap();

        repo.create(draft(Uuid::new_v4(), Channel::Sms)).await.unwrap();

        let stats = repo.stats_for_user(user_id).await.unwrap();

        assert_eq!(stats.total_messages, 2);
        assert_eq!(stats.total_recipients, 4);
        assert_eq!(stats.successful_sends, 2);
        assert_eq!(stats.failed_sends, 2);
        assert!((stats.total_cost - 0.02).abs() < 1e-9);
        assert_eq!(stats.today_messages, 2);
        assert_eq!(stats.today_recipients, 4);
    }

    #[tokio::test]
    async fn contact_lookup_is_scoped_to_owner() {
        let repo = InMemoryContactRepository::new();
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            user_id: owner,
            name: "A".to_string(),
            phone_number: Some("+111".to_string()),
            email: None,
            created_at: now,
            updated_at: now,
        };
        let id = contact.id;
        repo.insert(contact).await;

        let mine = repo.find_by_ids_for_owner(owner, &[id]).await.unwrap();
        let theirs = repo
            .find_by_ids_for_owner(Uuid::new_v4(), &[id])
            .await
            .unwrap();

        assert_eq!(mine.len(), 1);
        assert!(theirs.is_empty());
    }
}
