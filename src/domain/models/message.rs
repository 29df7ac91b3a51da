use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Email => "email",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "sms" => Some(Channel::Sms),
            "email" => Some(Channel::Email),
            _ => None,
        }
    }

    /// Flat per-recipient rate charged for an accepted batch; not
    /// provider-reported.
    pub fn unit_rate(&self) -> f64 {
        match self {
            Channel::Sms => 0.01,
            Channel::Email => 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
    // reserved for a delivery-receipt path; nothing assigns it yet
    Delivered,
}

/// One addressee embedded in a message. Carries its own delivery status,
/// the provider correlation id once a batch is accepted, and the failure
/// reason otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub status: MessageStatus,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl Recipient {
    /// Whether this recipient carries the address field the channel needs.
    /// An empty string counts as missing.
    pub fn eligible_for(&self, channel: Channel) -> bool {
        match channel {
            Channel::Sms => self.phone_number.as_deref().is_some_and(|p| !p.is_empty()),
            Channel::Email => self.email.as_deref().is_some_and(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub channel: Channel,
    pub content: String,
    pub subject: Option<String>,
    pub recipients: Vec<Recipient>,
    pub total_recipients: u32,
    pub successful_sends: u32,
    pub failed_sends: u32,
    pub status: MessageStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub cost: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation draft handed to the store. The store assigns id and timestamps
/// and zeroes the counters.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: Uuid,
    pub channel: Channel,
    pub content: String,
    pub subject: Option<String>,
    pub recipients: Vec<Recipient>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

/// The single outcome of one provider round-trip, fanned out uniformly to
/// every eligible recipient. There is no partial-batch outcome.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Accepted { correlation_id: Option<String> },
    Rejected { reason: String },
}

impl Message {
    /// Reconcile one batch outcome into per-recipient state and aggregate
    /// counters, and move the message to its terminal status.
    ///
    /// Invariant: afterwards `successful_sends + failed_sends` equals the
    /// number of channel-eligible recipients, which is `total_recipients`
    /// for messages built by the resolver.
    pub fn apply_outcome(&mut self, outcome: &BatchOutcome, now: DateTime<Utc>) {
        let channel = self.channel;
        match outcome {
            BatchOutcome::Accepted { correlation_id } => {
                let mut eligible = 0u32;
                for recipient in self
                    .recipients
                    .iter_mut()
                    .filter(|r| r.eligible_for(channel))
                {
                    recipient.status = MessageStatus::Sent;
                    recipient.message_id = correlation_id.clone();
                    eligible += 1;
                }
                self.successful_sends += eligible;
                self.cost = f64::from(eligible) * channel.unit_rate();
                self.status = MessageStatus::Sent;
                self.sent_at = Some(now);
            }
            BatchOutcome::Rejected { reason } => {
                let reason = if reason.is_empty() {
                    "Service error"
                } else {
                    reason.as_str()
                };
                let mut eligible = 0u32;
                for recipient in self
                    .recipients
                    .iter_mut()
                    .filter(|r| r.eligible_for(channel))
                {
                    recipient.status = MessageStatus::Failed;
                    recipient.error = Some(reason.to_string());
                    eligible += 1;
                }
                self.failed_sends += eligible;
                self.status = MessageStatus::Failed;
            }
        }
        self.updated_at = now;
    }
}

/// Per-user aggregates over the whole history plus the current UTC day.
#[derive(Debug, Clone, Default)]
pub struct MessageStats {
    pub total_messages: u64,
    pub total_recipients: u64,
    pub successful_sends: u64,
    pub failed_sends: u64,
    pub total_cost: f64,
    pub today_messages: u64,
    pub today_recipients: u64,
}
