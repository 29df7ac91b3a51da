pub mod dispatch_message;
pub mod get_message;
pub mod list_messages;
pub mod message_stats;
