use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    models::Message,
    repositories::{MessageFilter, MessageRepository},
};

pub struct ListMessagesUseCase {
    repo: Arc<dyn MessageRepository>,
}

pub struct ListMessagesResult {
    pub messages: Vec<Message>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl ListMessagesUseCase {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        filter: MessageFilter,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> anyhow::Result<ListMessagesResult> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(20).clamp(1, 100);

        let (messages, total) = self.repo.list_by_user(user_id, filter, page, limit).await?;

        Ok(ListMessagesResult {
            messages,
            page,
            limit,
            total,
            pages: total.div_ceil(u64::from(limit)),
        })
    }
}
