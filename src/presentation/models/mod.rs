use poem_openapi::Enum;

use crate::domain::models::{Channel, MessageStatus};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelKind {
    #[oai(rename = "sms")]
    Sms,
    #[oai(rename = "email")]
    Email,
}

impl From<ChannelKind> for Channel {
    fn from(value: ChannelKind) -> Self {
        match value {
            ChannelKind::Sms => Channel::Sms,
            ChannelKind::Email => Channel::Email,
        }
    }
}

impl From<Channel> for ChannelKind {
    fn from(value: Channel) -> Self {
        match value {
            Channel::Sms => ChannelKind::Sms,
            Channel::Email => ChannelKind::Email,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum MessageStatusDto {
    #[oai(rename = "pending")]
    Pending,
    #[oai(rename = "sent")]
    Sent,
    #[oai(rename = "failed")]
    Failed,
    #[oai(rename = "delivered")]
    Delivered,
}

impl From<MessageStatus> for MessageStatusDto {
    fn from(value: MessageStatus) -> Self {
        match value {
            MessageStatus::Pending => MessageStatusDto::Pending,
            MessageStatus::Sent => MessageStatusDto::Sent,
            MessageStatus::Failed => MessageStatusDto::Failed,
            MessageStatus::Delivered => MessageStatusDto::Delivered,
        }
    }
}

impl From<MessageStatusDto> for MessageStatus {
    fn from(value: MessageStatusDto) -> Self {
        match value {
            MessageStatusDto::Pending => MessageStatus::Pending,
            MessageStatusDto::Sent => MessageStatus::Sent,
            MessageStatusDto::Failed => MessageStatus::Failed,
            MessageStatusDto::Delivered => MessageStatus::Delivered,
        }
    }
}
