use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{Channel, Contact, Message, MessageStats, MessageStatus, NewMessage};

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter {
    pub channel: Option<Channel>,
    pub status: Option<MessageStatus>,
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Look up contacts by id, restricted to the owner. Ids that do not
    /// exist or belong to another user are omitted, not reported.
    async fn find_by_ids_for_owner(
        &self,
        owner_id: Uuid,
        ids: &[Uuid],
    ) -> anyhow::Result<Vec<Contact>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, draft: NewMessage) -> anyhow::Result<Message>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Message>>;

    /// Full-document upsert of the mutated message; returns the persisted
    /// state.
    async fn save(&self, message: &Message) -> anyhow::Result<Message>;

    /// Newest-first page of a user's history plus the total matching count.
    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: MessageFilter,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<(Vec<Message>, u64)>;

    async fn stats_for_user(&self, user_id: Uuid) -> anyhow::Result<MessageStats>;
}
