use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{models::Message, repositories::MessageRepository};

pub struct GetMessageUseCase {
    repo: Arc<dyn MessageRepository>,
}

impl GetMessageUseCase {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, message_id: Uuid, user_id: Uuid) -> anyhow::Result<Message> {
        let message = self
            .repo
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("message not found"))?;

        if message.user_id != user_id {
            anyhow::bail!("forbidden");
        }

        Ok(message)
    }
}
