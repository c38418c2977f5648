//! Resolving the current session from an incoming cookie header

use async_trait::async_trait;
use chrono::Utc;
use cookie::{Cookie, SameSite};

use crate::session::{Session, SessionCodec};
use crate::SessionError;

/// Cookie holding the sealed session
pub const SESSION_COOKIE: &str = "appSession";

/// Transient cookie used by the login transaction
pub const STATE_COOKIE: &str = "a0:state";

/// A session plus the re-issued cookie value, if the session was rolled
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session: Session,
    pub refreshed_cookie: Option<String>,
}

/// Looks up the session attached to a request
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve from the raw `Cookie` header, if the request had one
    async fn resolve(&self, cookie_header: Option<&str>)
        -> Result<Option<ResolvedSession>, SessionError>;
}

/// Resolver that reads the signed `appSession` cookie
#[derive(Debug, Clone)]
pub struct CookieSessionResolver {
    codec: SessionCodec,
}

impl CookieSessionResolver {
    pub fn new(codec: SessionCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Resolve as of `now` (seconds since the epoch)
    pub fn resolve_at(
        &self,
        cookie_header: Option<&str>,
        now: i64,
    ) -> Result<Option<ResolvedSession>, SessionError> {
        let Some(value) = cookie_header.and_then(|h| find_cookie(h, SESSION_COOKIE)) else {
            return Ok(None);
        };

        let Some(mut session) = self.codec.decode(&value, now)? else {
            return Ok(None);
        };

        let refreshed_cookie = self
            .codec
            .touch(&mut session, now)
            .map_err(|e| SessionError::other(format!("failed to roll session: {}", e)))?
            .map(|value| session_set_cookie(&value));

        Ok(Some(ResolvedSession {
            session,
            refreshed_cookie,
        }))
    }
}

#[async_trait]
impl SessionResolver for CookieSessionResolver {
    async fn resolve(
        &self,
        cookie_header: Option<&str>,
    ) -> Result<Option<ResolvedSession>, SessionError> {
        self.resolve_at(cookie_header, Utc::now().timestamp())
    }
}

/// Value of the cookie called `name` inside a `Cookie` header
pub fn find_cookie(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// `Set-Cookie` value that stores a sealed session
pub fn session_set_cookie(value: &str) -> String {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}

/// `Set-Cookie` value that deletes the cookie called `name`
pub fn removal_set_cookie(name: &str) -> String {
    let mut cookie = Cookie::build((name, "")).path("/").build();
    cookie.make_removal();
    cookie.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Identity, Role, DEFAULT_ROLES_CLAIM};
    use crate::session::{SessionClaims, SessionOptions};

    fn resolver() -> CookieSessionResolver {
        let codec = SessionCodec::new("resolver-secret", SessionOptions::default()).unwrap();
        CookieSessionResolver::new(codec)
    }

    #[test]
    fn test_find_cookie_among_others() {
        let header = "theme=dark; appSession=abc.def.ghi; a0:state=xyz";
        assert_eq!(find_cookie(header, SESSION_COOKIE).as_deref(), Some("abc.def.ghi"));
        assert_eq!(find_cookie(header, "missing"), None);
    }

    #[test]
    fn test_no_cookie_is_no_session() {
        let resolver = resolver();
        assert!(resolver.resolve_at(None, 0).unwrap().is_none());
        assert!(resolver.resolve_at(Some("theme=dark"), 0).unwrap().is_none());
    }

    #[test]
    fn test_resolve_rolls_cookie() {
        let resolver = resolver();
        let identity = Identity::new("auth0|client").with_roles(DEFAULT_ROLES_CLAIM, &[Role::Client]);
        let value = resolver
            .codec()
            .encode(&SessionClaims::new(identity, None, 100))
            .unwrap();

        let header = format!("{}={}", SESSION_COOKIE, value);
        let resolved = resolver.resolve_at(Some(&header), 200).unwrap().unwrap();
        assert!(resolved.session.capabilities.client);
        assert_eq!(resolved.session.last_active, 200);

        let set_cookie = resolved.refreshed_cookie.expect("rolled cookie");
        assert!(set_cookie.starts_with("appSession="));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let header = removal_set_cookie(STATE_COOKIE);
        assert!(header.starts_with("a0:state=;"));
        assert!(header.contains("Max-Age=0"));
        assert!(header.contains("Path=/"));
    }
}
