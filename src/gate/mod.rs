//! Session gate run in front of every page request
//!
//! The gate resolves the session once per request and decides whether the
//! request continues, is redirected to the login page, or continues with the
//! session cookies cleared. Resolution errors never block navigation.

mod matcher;

use http::header::{HeaderValue, COOKIE, HOST, LOCATION, SET_COOKIE};
use http::{Request, Response, StatusCode};
use log::{debug, error};

use cineapp_auth::{
    removal_set_cookie, ResolvedSession, Session, SessionResolver, SESSION_COOKIE, STATE_COOKIE,
};

use crate::config::{ClientOptions, FailPolicy};
use crate::views::Viewer;

pub use matcher::{PathMatcher, EXCLUDED_PREFIXES};

/// Outcome of gating one request
#[derive(Debug, Clone)]
pub enum GateDecision {
    /// The path is outside the gate; the request is left untouched
    Excluded,

    /// Continue, with whatever session was found
    PassThrough {
        session: Option<Session>,
        /// `Set-Cookie` values to add to the response (rolled session)
        set_cookies: Vec<String>,
    },

    /// No session on a protected path
    Redirect { location: String },

    /// The session cookie was unreadable: continue unauthenticated and
    /// delete the session and state cookies
    ResetSession { set_cookies: Vec<String> },
}

impl GateDecision {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::PassThrough { session, .. } => session.as_ref(),
            _ => None,
        }
    }

    /// Per-request view context for the page that will be rendered
    pub fn viewer(&self) -> Viewer {
        Viewer::from_session(self.session())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    pub fn set_cookies(&self) -> &[String] {
        match self {
            Self::PassThrough { set_cookies, .. } | Self::ResetSession { set_cookies } => {
                set_cookies
            }
            _ => &[],
        }
    }

    /// Write the decision's `Set-Cookie` headers onto a response
    pub fn apply<B>(&self, response: &mut Response<B>) {
        for value in self.set_cookies() {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    response.headers_mut().append(SET_COOKIE, v);
                }
                Err(e) => error!("session gate: dropping invalid Set-Cookie value: {}", e),
            }
        }
    }

    /// The 307 response for a redirect decision
    pub fn redirect_response(&self) -> Option<Response<()>> {
        let Self::Redirect { location } = self else {
            return None;
        };

        let mut response = Response::new(());
        *response.status_mut() = StatusCode::TEMPORARY_REDIRECT;
        if let Ok(value) = HeaderValue::from_str(location) {
            response.headers_mut().insert(LOCATION, value);
        }
        Some(response)
    }
}

/// Gate over a pluggable session resolver
pub struct SessionGate<R> {
    resolver: R,
    matcher: PathMatcher,
    login_path: String,
    auth_prefix: String,
    fail_policy: FailPolicy,
    fallback_origin: Option<String>,
}

impl<R: SessionResolver> SessionGate<R> {
    pub fn new(resolver: R, options: &ClientOptions) -> Self {
        Self {
            resolver,
            matcher: PathMatcher::default(),
            login_path: options.login_path.clone(),
            auth_prefix: options.auth_prefix.clone(),
            fail_policy: options.fail_policy,
            fallback_origin: None,
        }
    }

    pub fn with_matcher(mut self, matcher: PathMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Origin used for redirects when the request carries none
    pub fn with_fallback_origin(mut self, origin: &str) -> Self {
        self.fallback_origin = Some(origin.trim_end_matches('/').to_string());
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub async fn evaluate<B>(&self, request: &Request<B>) -> GateDecision {
        let path = request.uri().path();
        if !self.matcher.matches(path) {
            return GateDecision::Excluded;
        }

        let cookie_header = cookie_header(request);
        let resolved = match self.resolver.resolve(cookie_header.as_deref()).await {
            Ok(resolved) => resolved,
            Err(err) if err.is_decryption() => {
                error!("session gate: {}", err);
                return GateDecision::ResetSession {
                    set_cookies: vec![
                        removal_set_cookie(SESSION_COOKIE),
                        removal_set_cookie(STATE_COOKIE),
                    ],
                };
            }
            Err(err) => {
                error!("session gate: {}", err);
                if self.fail_policy == FailPolicy::Closed && !self.is_public(path) {
                    return self.redirect(request);
                }
                return GateDecision::PassThrough {
                    session: None,
                    set_cookies: Vec::new(),
                };
            }
        };

        if self.is_public(path) || resolved.is_some() {
            return pass_through(resolved);
        }

        debug!("session gate: no session for {}, redirecting to login", path);
        self.redirect(request)
    }

    /// The root page and the login flow are reachable without a session
    fn is_public(&self, path: &str) -> bool {
        path == "/" || path.starts_with(self.auth_prefix.as_str())
    }

    fn redirect<B>(&self, request: &Request<B>) -> GateDecision {
        let origin = self.origin(request).unwrap_or_default();
        GateDecision::Redirect {
            location: format!("{}{}", origin, self.login_path),
        }
    }

    fn origin<B>(&self, request: &Request<B>) -> Option<String> {
        let uri = request.uri();
        if let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) {
            return Some(format!("{}://{}", scheme, authority));
        }

        let host = request.headers().get(HOST).and_then(|h| h.to_str().ok());
        match (host, &self.fallback_origin) {
            (Some(host), Some(fallback)) => {
                let scheme = fallback.split("://").next().unwrap_or("http");
                Some(format!("{}://{}", scheme, host))
            }
            (Some(host), None) => Some(format!("http://{}", host)),
            (None, fallback) => fallback.clone(),
        }
    }
}

fn pass_through(resolved: Option<ResolvedSession>) -> GateDecision {
    match resolved {
        Some(ResolvedSession {
            session,
            refreshed_cookie,
        }) => GateDecision::PassThrough {
            session: Some(session),
            set_cookies: refreshed_cookie.into_iter().collect(),
        },
        None => GateDecision::PassThrough {
            session: None,
            set_cookies: Vec::new(),
        },
    }
}

/// All `Cookie` headers of a request, joined
fn cookie_header<B>(request: &Request<B>) -> Option<String> {
    let values: Vec<&str> = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join("; "))
    }
}
