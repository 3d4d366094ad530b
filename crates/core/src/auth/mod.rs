//! Shared-secret request authentication.

mod none;
mod token;

pub use none::NoneAuthenticator;
pub use token::{TokenAuthenticator, TOKEN_HEADER};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::AuthConfig;

/// What a request presented to prove itself.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Value of the [`TOKEN_HEADER`] header, if sent
    pub token: Option<String>,
}

impl Credentials {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// Who a request was accepted as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("API token required")]
    NotAuthenticated,

    #[error("Invalid API token")]
    InvalidCredentials,
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// Short name used in logs; `"none"` means every request is let through
    fn method_name(&self) -> &'static str;
}

/// A non-empty token selects [`TokenAuthenticator`], anything else lets
/// every request through.
pub fn create_authenticator(config: &AuthConfig) -> Box<dyn Authenticator> {
    match config.token() {
        Some(token) => Box::new(TokenAuthenticator::new(token.to_string())),
        None => Box::new(NoneAuthenticator),
    }
}
