//! Access Control Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("route guard declares no allowed roles")]
    EmptyGuard,

    #[error("identity provider error: {message}")]
    Identity { message: String },

    #[error("role store error: {message}")]
    RoleStore { message: String },
}

impl AccessError {
    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity {
            message: message.into(),
        }
    }

    pub fn role_store(message: impl Into<String>) -> Self {
        Self::RoleStore {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccessError>;
