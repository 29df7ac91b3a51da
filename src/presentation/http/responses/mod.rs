use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::{ChannelKind, MessageStatusDto};

#[derive(Object)]
pub struct RecipientDto {
    pub name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub status: MessageStatusDto,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Object)]
pub struct MessageDto {
    pub id: Uuid,
    pub channel: ChannelKind,
    pub content: String,
    pub subject: Option<String>,
    pub recipients: Vec<RecipientDto>,
    pub total_recipients: u32,
    pub successful_sends: u32,
    pub failed_sends: u32,
    pub status: MessageStatusDto,
    pub scheduled_for: Option<String>,
    pub sent_at: Option<String>,
    pub cost: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Object)]
pub struct PaginationDto {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Object)]
pub struct PaginatedMessagesDto {
    pub messages: Vec<MessageDto>,
    pub pagination: PaginationDto,
}

#[derive(Object)]
pub struct OverallStatsDto {
    pub total_messages: u64,
    pub total_recipients: u64,
    pub successful_sends: u64,
    pub failed_sends: u64,
    pub total_cost: f64,
}

#[derive(Object)]
pub struct TodayStatsDto {
    pub today_messages: u64,
    pub today_recipients: u64,
}

#[derive(Object)]
pub struct MessageStatsDto {
    pub overall: OverallStatsDto,
    pub today: TodayStatsDto,
}
