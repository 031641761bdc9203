use thiserror::Error;

use crate::model::toast::Toast;

pub mod cipher;
pub mod ids;
pub mod passkey;
pub mod utils;

pub use cipher::{CipherError, SessionCipher};
pub use passkey::PasskeyGate;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid passkey")]
    InvalidPasskey,
    #[error("device limit of {max} reached")]
    DeviceLimit { max: usize },
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("session expired")]
    SessionExpired,
    #[error("storage: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AuthError {
    /// The toast the dashboard shows for this failure.
    pub fn toast(&self) -> Toast {
        match self {
            AuthError::InvalidPasskey => Toast::error("Invalid passkey. Please try again."),
            AuthError::DeviceLimit { max } => Toast::error(format!(
                "Maximum {max} devices allowed. Please log out from other devices."
            )),
            AuthError::NotAuthenticated => Toast::error("Please log in to continue."),
            AuthError::SessionExpired => {
                Toast::warning("Session expired due to inactivity. Please log in again.")
            }
            AuthError::Storage(_) => Toast::error("Something went wrong. Please try again."),
        }
    }
}
