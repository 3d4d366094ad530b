//! Shared-secret token authentication.

use async_trait::async_trait;

use super::{AuthError, Authenticator, Credentials, Identity};

/// Header carrying the token
pub const TOKEN_HEADER: &str = "token";

/// Authenticator that compares the `token` header against a configured secret.
pub struct TokenAuthenticator {
    expected_token: String,
}

impl TokenAuthenticator {
    pub fn new(token: String) -> Self {
        Self {
            expected_token: token,
        }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let provided = credentials
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::NotAuthenticated)?;

        if constant_time_eq(provided.as_bytes(), self.expected_token.as_bytes()) {
            Ok(Identity {
                user_id: "token_user".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn method_name(&self) -> &'static str {
        "token"
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
