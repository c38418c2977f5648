//! Bearer tokens for protected catalog calls

use async_trait::async_trait;

use crate::session::Session;
use crate::AuthError;

/// Supplies the bearer token attached to private and admin requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed token, e.g. one obtained out of band
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[async_trait]
impl TokenProvider for Session {
    async fn access_token(&self) -> Result<String, AuthError> {
        self.access_token
            .clone()
            .ok_or(AuthError::MissingAccessToken)
    }
}

/// No session at all: every protected call fails before reaching the network
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

#[async_trait]
impl TokenProvider for Anonymous {
    async fn access_token(&self) -> Result<String, AuthError> {
        Err(AuthError::MissingSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::session::SessionClaims;

    #[test]
    fn test_session_token() {
        tokio_test::block_on(async {
            let claims = SessionClaims::new(Identity::new("auth0|x"), Some("tok".to_string()), 0);
            let session = Session::from_claims(claims, "roles");
            assert_eq!(session.access_token().await.unwrap(), "tok");

            let bare = Session::from_claims(SessionClaims::new(Identity::new("auth0|y"), None, 0), "roles");
            assert!(matches!(
                TokenProvider::access_token(&bare).await,
                Err(AuthError::MissingAccessToken)
            ));
        });
    }

    #[test]
    fn test_anonymous_has_no_token() {
        tokio_test::block_on(async {
            assert!(matches!(Anonymous.access_token().await, Err(AuthError::MissingSession)));
        });
    }
}
