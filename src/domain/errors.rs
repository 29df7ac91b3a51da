use thiserror::Error;

/// Failures surfaced to the caller before a message is persisted. Anything
/// that happens after persistence is recorded on the message instead of
/// being raised.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Missing required fields")]
    InvalidRequest,
    #[error("No recipients supplied")]
    MissingRecipients,
    #[error("No valid recipients found")]
    NoValidRecipients,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DispatchError {
    /// True for the pre-persistence validation variants that map to a
    /// client error at the HTTP layer.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidRequest
                | DispatchError::MissingRecipients
                | DispatchError::NoValidRecipients
        )
    }
}
