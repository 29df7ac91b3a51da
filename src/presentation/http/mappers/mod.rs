use crate::{
    domain::models::{Message, MessageStats, Recipient},
    presentation::http::responses::{
        MessageDto, MessageStatsDto, OverallStatsDto, RecipientDto, TodayStatsDto,
    },
};

pub fn map_message(message: &Message) -> MessageDto {
    MessageDto {
        id: message.id,
        channel: message.channel.into(),
        content: message.content.clone(),
        subject: message.subject.clone(),
        recipients: message.recipients.iter().map(map_recipient).collect(),
        total_recipients: message.total_recipients,
        successful_sends: message.successful_sends,
        failed_sends: message.failed_sends,
        status: message.status.into(),
        scheduled_for: message.scheduled_for.map(|at| at.to_rfc3339()),
        sent_at: message.sent_at.map(|at| at.to_rfc3339()),
        cost: message.cost,
        created_at: message.created_at.to_rfc3339(),
        updated_at: message.updated_at.to_rfc3339(),
    }
}

fn map_recipient(recipient: &Recipient) -> RecipientDto {
    RecipientDto {
        name: recipient.name.clone(),
        phone_number: recipient.phone_number.clone(),
        email: recipient.email.clone(),
        status: recipient.status.into(),
        message_id: recipient.message_id.clone(),
        error: recipient.error.clone(),
    }
}

pub fn map_stats(stats: &MessageStats) -> MessageStatsDto {
    MessageStatsDto {
        overall: OverallStatsDto {
            total_messages: stats.total_messages,
            total_recipients: stats.total_recipients,
            successful_sends: stats.successful_sends,
            failed_sends: stats.failed_sends,
            total_cost: stats.total_cost,
        },
        today: TodayStatsDto {
            today_messages: stats.today_messages,
            today_recipients: stats.today_recipients,
        },
    }
}
