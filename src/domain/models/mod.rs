pub mod contact;
pub mod message;

pub use contact::Contact;
pub use message::{
    BatchOutcome, Channel, Message, MessageStats, MessageStatus, NewMessage, Recipient,
};
