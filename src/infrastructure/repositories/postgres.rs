use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, Row, types::Json};
use uuid::Uuid;

use crate::domain::{
    models::{
        Channel, Contact, Message, MessageStats, MessageStatus, NewMessage, Recipient,
    },
    repositories::{ContactRepository, MessageFilter, MessageRepository},
};

pub type PgPool = Pool<Postgres>;

#[derive(Clone)]
pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn find_by_ids_for_owner(
        &self,
        owner_id: Uuid,
        ids: &[Uuid],
    ) -> anyhow::Result<Vec<Contact>> {
        let records = sqlx::query_as::<_, ContactRecord>(
            r#"
            SELECT id, user_id, name, phone_number, email, created_at, updated_at
            FROM contacts
            WHERE user_id = $1
              AND id = ANY($2)
            "#,
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(records.into_iter().map(Contact::from).collect())
    }
}

#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: PgPool,
}

impl PostgresMessageRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn create(&self, draft: NewMessage) -> anyhow::Result<Message> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let total = draft.recipients.len() as i32;

        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (
                id, user_id, channel, content, subject, recipients,
                total_recipients, successful_sends, failed_sends, status,
                scheduled_for, sent_at, cost, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15)
            RETURNING
                id, user_id, channel, content, subject, recipients,
                total_recipients, successful_sends, failed_sends, status,
                scheduled_for, sent_at, cost, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(draft.user_id)
        .bind(draft.channel.as_str())
        .bind(&draft.content)
        .bind(&draft.subject)
        .bind(Json(&draft.recipients))
        .bind(total)
        .bind(0_i32)
        .bind(0_i32)
        .bind(status_to_str(MessageStatus::Pending))
        .bind(draft.scheduled_for)
        .bind(Option::<DateTime<Utc>>::None)
        .bind(0.0_f64)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        record.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Message>> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, user_id, channel, content, subject, recipients,
                   total_recipients, successful_sends, failed_sends, status,
                   scheduled_for, sent_at, cost, created_at, updated_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        record.map(|record| record.try_into()).transpose()
    }

    async fn save(&self, message: &Message) -> anyhow::Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r#"
            INSERT INTO messages (
                id, user_id, channel, content, subject, recipients,
                total_recipients, successful_sends, failed_sends, status,
                scheduled_for, sent_at, cost, created_at, updated_at
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15)
            ON CONFLICT (id) DO UPDATE
            SET recipients = EXCLUDED.recipients,
                successful_sends = EXCLUDED.successful_sends,
                failed_sends = EXCLUDED.failed_sends,
                status = EXCLUDED.status,
                sent_at = EXCLUDED.sent_at,
                cost = EXCLUDED.cost,
                updated_at = EXCLUDED.updated_at
            RETURNING
                id, user_id, channel, content, subject, recipients,
                total_recipients, successful_sends, failed_sends, status,
                scheduled_for, sent_at, cost, created_at, updated_at
            "#,
        )
        .bind(message.id)
        .bind(message.user_id)
        .bind(message.channel.as_str())
        .bind(&message.content)
        .bind(&message.subject)
        .bind(Json(&message.recipients))
        .bind(message.total_recipients as i32)
        .bind(message.successful_sends as i32)
        .bind(message.failed_sends as i32)
        .bind(status_to_str(message.status))
        .bind(message.scheduled_for)
        .bind(message.sent_at)
        .bind(message.cost)
        .bind(message.created_at)
        .bind(message.updated_at)
        .fetch_one(&self.pool)
        .await?;

        record.try_into()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        filter: MessageFilter,
        page: u32,
        limit: u32,
    ) -> anyhow::Result<(Vec<Message>, u64)> {
        let channel = filter.channel.map(|c| c.as_str());
        let status = filter.status.map(status_to_str);
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let records = sqlx::query_as::<_, MessageRecord>(
            r#"
            SELECT id, user_id, channel, content, subject, recipients,
                   total_recipients, successful_sends, failed_sends, status,
                   scheduled_for, sent_at, cost, created_at, updated_at
            FROM messages
            WHERE user_id = $1
              AND ($2::text IS NULL OR channel = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(channel)
        .bind(status)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM messages
            WHERE user_id = $1
              AND ($2::text IS NULL OR channel = $2)
              AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(user_id)
        .bind(channel)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let messages = records
            .into_iter()
            .map(|record| record.try_into())
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok((messages, total as u64))
    }

    async fn stats_for_user(&self, user_id: Uuid) -> anyhow::Result<MessageStats> {
        let overall = sqlx::query(
            r#"
            SELECT COUNT(*) AS total_messages,
                   COALESCE(SUM(total_recipients), 0) AS total_recipients,
                   COALESCE(SUM(successful_sends), 0) AS successful_sends,
                   COALESCE(SUM(failed_sends), 0) AS failed_sends,
                   COALESCE(SUM(cost), 0) AS total_cost
            FROM messages
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let today = sqlx::query(
            r#"
            SELECT COUNT(*) AS today_messages,
                   COALESCE(SUM(total_recipients), 0) AS today_recipients
            FROM messages
            WHERE user_id = $1
              AND created_at >= date_trunc('day', NOW())
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(MessageStats {
            total_messages: overall.try_get::<i64, _>("total_messages")? as u64,
            total_recipients: overall.try_get::<i64, _>("total_recipients")? as u64,
            successful_sends: overall.try_get::<i64, _>("successful_sends")? as u64,
            failed_sends: overall.try_get::<i64, _>("failed_sends")? as u64,
            total_cost: overall.try_get::<f64, _>("total_cost")?,
            today_messages: today.try_get::<i64, _>("today_messages")? as u64,
            today_recipients: today.try_get::<i64, _>("today_recipients")? as u64,
        })
    }
}

#[derive(FromRow)]
struct ContactRecord {
    id: Uuid,
    user_id: Uuid,
    name: String,
    phone_number: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRecord> for Contact {
    fn from(value: ContactRecord) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            phone_number: value.phone_number,
            email: value.email,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(FromRow)]
struct MessageRecord {
    id: Uuid,
    user_id: Uuid,
    channel: String,
    content: String,
    subject: Option<String>,
    recipients: Json<Vec<Recipient>>,
    total_recipients: i32,
    successful_sends: i32,
    failed_sends: i32,
    status: String,
    scheduled_for: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    cost: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MessageRecord> for Message {
    type Error = anyhow::Error;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let channel = Channel::from_str(&value.channel)
            .ok_or_else(|| anyhow::anyhow!("unknown channel {}", value.channel))?;
        let status = status_from_str(&value.status)?;

        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            channel,
            content: value.content,
            subject: value.subject,
            recipients: value.recipients.0,
            total_recipients: value.total_recipients as u32,
            successful_sends: value.successful_sends as u32,
            failed_sends: value.failed_sends as u32,
            status,
            scheduled_for: value.scheduled_for,
            sent_at: value.sent_at,
            cost: value.cost,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

fn status_to_str(status: MessageStatus) -> &'static str {
    match status {
        MessageStatus::Pending => "pending",
        MessageStatus::Sent => "sent",
        MessageStatus::Failed => "failed",
        MessageStatus::Delivered => "delivered",
    }
}

fn status_from_str(value: &str) -> anyhow::Result<MessageStatus> {
    match value {
        "pending" => Ok(MessageStatus::Pending),
        "sent" => Ok(MessageStatus::Sent),
        "failed" => Ok(MessageStatus::Failed),
        "delivered" => Ok(MessageStatus::Delivered),
        other => anyhow::bail!("unknown message status {other}"),
    }
}
