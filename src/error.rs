use derive_more::{Display, From};
use serde_json::Value;

use crate::leave::ValidationErrors;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong between a command and the HR backend.
#[derive(Debug, Display, From)]
pub enum ClientError {
    #[display(fmt = "request failed: {}", _0)]
    Http(reqwest::Error),

    #[display(fmt = "malformed payload: {}", _0)]
    Decode(serde_json::Error),

    #[display(fmt = "io error: {}", _0)]
    Io(std::io::Error),

    /// The backend answered 401; the session has already been dropped.
    #[from(ignore)]
    #[display(fmt = "session expired or invalid, please login again")]
    Unauthorized,

    #[from(ignore)]
    #[display(fmt = "please login to continue")]
    NotLoggedIn,

    #[from(ignore)]
    #[display(fmt = "access denied: {}", _0)]
    Forbidden(String),

    /// Non-2xx answer other than 401.
    #[from(ignore)]
    #[display(fmt = "backend returned {}: {}", status, message)]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
        body: Value,
    },

    /// 2xx answer whose envelope carried `success: false`.
    #[from(ignore)]
    #[display(fmt = "{}", _0)]
    Rejected(String),

    /// Form input failed client-side checks; nothing was sent.
    #[from(ignore)]
    #[display(fmt = "invalid input: {}", _0)]
    Invalid(ValidationErrors),
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(e) => Some(e),
            ClientError::Decode(e) => Some(e),
            ClientError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
