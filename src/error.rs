use thiserror::Error;

/// Failures at the record store seam.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("permission denied by the record store")]
    PermissionDenied,
    #[error("record store unavailable")]
    Unavailable,
    #[error("document already exists")]
    AlreadyExists,
    #[error("record store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("record store returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed record store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Tailored user-facing text for the two distinguished causes. Everything
    /// else gets the caller's generic flow message.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            StoreError::PermissionDenied => {
                Some("Permission denied. Please check the record store security rules.")
            }
            StoreError::Unavailable => {
                Some("The record store is unavailable. Please check your internet connection.")
            }
            _ => None,
        }
    }
}

/// Failures while building or sending a confirmation email.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("smtp transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),
}
