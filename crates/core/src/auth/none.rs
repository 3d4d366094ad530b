use async_trait::async_trait;

use super::{AuthError, Authenticator, Credentials, Identity};

/// Lets every request through as [`Identity::anonymous`]; selected when no
/// token is configured.
#[derive(Debug, Default)]
pub struct NoneAuthenticator;

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, _credentials: &Credentials) -> Result<Identity, AuthError> {
        Ok(Identity::anonymous())
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_token_is_anonymous() {
        for credentials in [Credentials::default(), Credentials::with_token("whatever")] {
            let identity = NoneAuthenticator.authenticate(&credentials).await.unwrap();
            assert_eq!(identity.user_id, "anonymous");
        }
    }
}
