//! Session cookie payload, lifetime rules and codec

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::identity::{Capabilities, Identity, DEFAULT_ROLES_CLAIM};
use crate::{AuthError, SessionError};

/// Lifetime and claim settings for sessions
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Maximum age of a session since it was created
    pub absolute_duration: Duration,

    /// Whether activity extends the session
    pub rolling: bool,

    /// Maximum idle time when rolling is enabled
    pub rolling_duration: Duration,

    /// Name of the custom claim carrying role names
    pub roles_claim: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            absolute_duration: Duration::from_secs(24 * 60 * 60),
            rolling: true,
            rolling_duration: Duration::from_secs(60 * 60),
            roles_claim: DEFAULT_ROLES_CLAIM.to_string(),
        }
    }
}

impl SessionOptions {
    pub fn with_absolute_duration(mut self, value: Duration) -> Self {
        self.absolute_duration = value;
        self
    }

    pub fn with_rolling(mut self, value: bool) -> Self {
        self.rolling = value;
        self
    }

    pub fn with_rolling_duration(mut self, value: Duration) -> Self {
        self.rolling_duration = value;
        self
    }

    pub fn with_roles_claim(mut self, value: &str) -> Self {
        self.roles_claim = value.to_string();
        self
    }
}

/// What the session cookie carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: Identity,

    /// Access token for the catalog API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Seconds since the epoch
    pub created_at: i64,

    /// Seconds since the epoch
    pub last_active: i64,
}

impl SessionClaims {
    /// Claims for a session that starts at `now`
    pub fn new(user: Identity, access_token: Option<String>, now: i64) -> Self {
        Self {
            user,
            access_token,
            created_at: now,
            last_active: now,
        }
    }
}

/// A resolved, unexpired session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity: Identity,

    /// Decoded once from the role claim when the session was resolved
    pub capabilities: Capabilities,

    pub(crate) access_token: Option<String>,
    pub created_at: i64,
    pub last_active: i64,
}

impl Session {
    pub fn from_claims(claims: SessionClaims, roles_claim: &str) -> Self {
        let capabilities = claims.user.capabilities(roles_claim);
        Self {
            identity: claims.user,
            capabilities,
            access_token: claims.access_token,
            created_at: claims.created_at,
            last_active: claims.last_active,
        }
    }

    pub fn to_claims(&self) -> SessionClaims {
        SessionClaims {
            user: self.identity.clone(),
            access_token: self.access_token.clone(),
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

/// Signs and verifies the session cookie with the session secret
#[derive(Clone)]
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    options: SessionOptions,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: &str, options: SessionOptions) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        // Lifetime is enforced from the session timestamps, not `exp`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            options,
        })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn encode(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?)
    }

    /// Decode a cookie value at time `now`.
    ///
    /// A cookie that cannot be verified is a decryption failure. A valid but
    /// expired one resolves to `Ok(None)`.
    pub fn decode(&self, value: &str, now: i64) -> Result<Option<Session>, SessionError> {
        let data = decode::<SessionClaims>(value, &self.decoding_key, &self.validation)
            .map_err(SessionError::Decryption)?;

        let claims = data.claims;
        if self.is_expired(&claims, now) {
            log::debug!("session for {} expired", claims.user.sub);
            return Ok(None);
        }

        Ok(Some(Session::from_claims(claims, &self.options.roles_claim)))
    }

    /// Re-issue the cookie value with `last_active = now` when rolling is on
    pub fn touch(&self, session: &mut Session, now: i64) -> Result<Option<String>, AuthError> {
        if !self.options.rolling {
            return Ok(None);
        }
        session.last_active = now;
        self.encode(&session.to_claims()).map(Some)
    }

    /// Seal a brand new session for `user`
    pub fn issue(&self, user: Identity, access_token: Option<String>) -> Result<String, AuthError> {
        let claims = SessionClaims::new(user, access_token, Utc::now().timestamp());
        self.encode(&claims)
    }

    fn is_expired(&self, claims: &SessionClaims, now: i64) -> bool {
        let absolute = self.options.absolute_duration.as_secs() as i64;
        if now - claims.created_at > absolute {
            return true;
        }

        let idle = self.options.rolling_duration.as_secs() as i64;
        self.options.rolling && now - claims.last_active > idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;

    const SECRET: &str = "a-long-session-secret-for-tests";

    fn admin() -> Identity {
        Identity::new("auth0|admin")
            .with_email("admin@example.com")
            .with_roles(DEFAULT_ROLES_CLAIM, &[Role::Admin])
    }

    #[test]
    fn test_decode_resolves_capabilities_once() {
        let codec = SessionCodec::new(SECRET, SessionOptions::default()).unwrap();
        let claims = SessionClaims::new(admin(), Some("api-token".to_string()), 1_000);
        let cookie = codec.encode(&claims).unwrap();

        let session = codec.decode(&cookie, 1_010).unwrap().expect("session");
        assert!(session.capabilities.admin);
        assert!(!session.capabilities.client);
        assert_eq!(session.token(), Some("api-token"));
        assert_eq!(session.identity.email.as_deref(), Some("admin@example.com"));
    }

    #[test]
    fn test_wrong_secret_is_decryption_failure() {
        let codec = SessionCodec::new(SECRET, SessionOptions::default()).unwrap();
        let other = SessionCodec::new("another-secret", SessionOptions::default()).unwrap();
        let cookie = other.encode(&SessionClaims::new(admin(), None, 1_000)).unwrap();

        let err = codec.decode(&cookie, 1_000).unwrap_err();
        assert!(err.is_decryption());

        let err = codec.decode("not-a-token", 1_000).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn test_idle_session_expires_when_rolling() {
        let codec = SessionCodec::new(SECRET, SessionOptions::default()).unwrap();
        let cookie = codec.encode(&SessionClaims::new(admin(), None, 0)).unwrap();

        assert!(codec.decode(&cookie, 3_600).unwrap().is_some());
        assert!(codec.decode(&cookie, 3_601).unwrap().is_none());
    }

    #[test]
    fn test_absolute_duration_applies_without_rolling() {
        let options = SessionOptions::default().with_rolling(false);
        let codec = SessionCodec::new(SECRET, options).unwrap();
        let cookie = codec.encode(&SessionClaims::new(admin(), None, 0)).unwrap();

        assert!(codec.decode(&cookie, 7_200).unwrap().is_some());
        assert!(codec.decode(&cookie, 24 * 3_600 + 1).unwrap().is_none());
    }

    #[test]
    fn test_touch_extends_rolling_session() {
        let codec = SessionCodec::new(SECRET, SessionOptions::default()).unwrap();
        let cookie = codec.encode(&SessionClaims::new(admin(), None, 0)).unwrap();
        let mut session = codec.decode(&cookie, 3_000).unwrap().unwrap();

        let refreshed = codec.touch(&mut session, 3_000).unwrap().expect("refreshed cookie");
        assert!(codec.decode(&cookie, 6_000).unwrap().is_none());
        assert!(codec.decode(&refreshed, 6_000).unwrap().is_some());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            SessionCodec::new("", SessionOptions::default()),
            Err(AuthError::InvalidSecret)
        ));
    }
}
