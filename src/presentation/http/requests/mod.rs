use chrono::{DateTime, Utc};
use poem_openapi::Object;
use uuid::Uuid;

use crate::presentation::models::ChannelKind;

#[derive(Object, Debug)]
pub struct DirectRecipientDto {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

#[derive(Object, Debug)]
pub struct SendMessageRequestDto {
    pub channel: ChannelKind,
    #[oai(validator(min_length = 1))]
    pub content: String,
    pub subject: Option<String>,
    #[oai(default)]
    pub recipient_ids: Vec<Uuid>,
    #[oai(default)]
    pub direct_recipients: Vec<DirectRecipientDto>,
    pub schedule: Option<DateTime<Utc>>,
}
