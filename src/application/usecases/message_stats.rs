use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{models::MessageStats, repositories::MessageRepository};

pub struct MessageStatsUseCase {
    repo: Arc<dyn MessageRepository>,
}

impl MessageStatsUseCase {
    pub fn new(repo: Arc<dyn MessageRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<MessageStats> {
        self.repo.stats_for_user(user_id).await
    }
}
