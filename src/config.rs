//! Configuration for the CineApp client

use std::time::Duration;

use cineapp_auth::{SessionOptions, DEFAULT_ROLES_CLAIM};
use url::Url;

use crate::error::Error;

/// Default OAuth scope requested at login
pub const DEFAULT_SCOPE: &str = "openid profile";

/// Deployment settings, normally read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Identity provider tenant domain, e.g. `cineapp.eu.auth0.com`
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,

    /// Public URL of this application
    pub app_base_url: Url,

    /// Secret used to seal the session cookie
    pub secret: String,

    pub scope: String,
    pub audience: Option<String>,

    /// Base URL of the catalog REST API
    pub api_server_url: Url,

    /// Namespace of the role claim
    pub roles_claim: String,
}

impl AppConfig {
    /// Attempts to create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup (used by `from_env` and tests)
    pub fn from_vars<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config(format!("{} environment variable not found", name)))
        };

        let app_base_url = Url::parse(&required("APP_BASE_URL")?)?;
        let api_server_url = Url::parse(&required("API_SERVER_URL")?)?;

        Ok(Self {
            domain: required("AUTH0_DOMAIN")?,
            client_id: required("AUTH0_CLIENT_ID")?,
            client_secret: required("AUTH0_CLIENT_SECRET")?,
            app_base_url,
            secret: required("AUTH0_SECRET")?,
            scope: lookup("AUTH0_SCOPE")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            audience: lookup("AUTH0_AUDIENCE").filter(|v| !v.is_empty()),
            api_server_url,
            roles_claim: lookup("ROLES_CLAIM")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_ROLES_CLAIM.to_string()),
        })
    }

    /// Origin of this application, e.g. `https://cine.example.com`
    pub fn app_origin(&self) -> String {
        self.app_base_url.origin().ascii_serialization()
    }

    /// URL the login route sends the browser to
    pub fn authorize_url(&self, state: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("https://{}/authorize", self.domain))?;
        let mut redirect_uri = self.app_base_url.clone();
        redirect_uri
            .path_segments_mut()
            .map_err(|_| Error::config("APP_BASE_URL cannot be a base URL"))?
            .pop_if_empty()
            .extend(["auth", "callback"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.client_id)
                .append_pair("redirect_uri", redirect_uri.as_str())
                .append_pair("scope", &self.scope)
                .append_pair("state", state);
            if let Some(audience) = &self.audience {
                query.append_pair("audience", audience);
            }
        }
        Ok(url)
    }

    /// URL the logout route sends the browser to
    pub fn logout_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&format!("https://{}/v2/logout", self.domain))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("returnTo", self.app_base_url.as_str());
        Ok(url)
    }
}

/// What the gate does when session resolution fails for a reason other
/// than an unreadable cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailPolicy {
    /// Continue unauthenticated
    #[default]
    Open,
    /// Send protected paths to the login page
    Closed,
}

/// Configuration options for the CineApp client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Session lifetime and role claim
    pub session: SessionOptions,

    pub fail_policy: FailPolicy,

    /// Where unauthenticated requests are redirected
    pub login_path: String,

    /// Paths under this prefix belong to the login flow
    pub auth_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            session: SessionOptions::default(),
            fail_policy: FailPolicy::Open,
            login_path: "/auth/login".to_string(),
            auth_prefix: "/auth".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the session options
    pub fn with_session(mut self, value: SessionOptions) -> Self {
        self.session = value;
        self
    }

    pub fn with_fail_policy(mut self, value: FailPolicy) -> Self {
        self.fail_policy = value;
        self
    }

    pub fn with_login_path(mut self, value: &str) -> Self {
        self.login_path = value.to_string();
        self
    }
}
