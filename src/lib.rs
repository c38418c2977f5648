//! CineApp client library
//!
//! Front end plumbing for a movie catalog: the session gate run in front of
//! every page request, the navigation derived from the viewer's roles, and
//! the page controllers that talk to the catalog REST API.

pub mod config;
pub mod error;
pub mod gate;
pub mod views;

use std::sync::Arc;

use reqwest::Client;

use cineapp_auth::{CookieSessionResolver, SessionCodec, TokenProvider};
use cineapp_catalog::CatalogClient;

use crate::config::{AppConfig, ClientOptions};
use crate::error::Result;
use crate::gate::SessionGate;
use crate::views::{AdminPage, ClientPage, HomePage};

pub use cineapp_auth as auth;
pub use cineapp_catalog as catalog;

/// The main entry point for the CineApp client
pub struct CineApp {
    config: AppConfig,
    /// HTTP client shared by every catalog request
    pub http_client: Client,
    catalog: CatalogClient,
    codec: SessionCodec,
    options: ClientOptions,
}

impl CineApp {
    /// Create a new client with default options
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cineapp::{CineApp, config::AppConfig};
    ///
    /// let app = CineApp::new(AppConfig::from_env()?)?;
    /// # Ok::<(), cineapp::error::Error>(())
    /// ```
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::new_with_options(config, ClientOptions::default())
    }

    /// Create a new client with custom options.
    ///
    /// The role claim namespace always comes from `config`.
    pub fn new_with_options(config: AppConfig, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;
        let catalog = CatalogClient::new(config.api_server_url.as_str(), http_client.clone())?;

        let mut options = options;
        options.session = options.session.with_roles_claim(&config.roles_claim);
        let codec = SessionCodec::new(&config.secret, options.session.clone())?;

        Ok(Self {
            config,
            http_client,
            catalog,
            codec,
            options,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Codec for the session cookie, used by the login callback to issue it
    pub fn session_codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// Client for the catalog REST API
    pub fn catalog(&self) -> CatalogClient {
        self.catalog.clone()
    }

    /// Session gate reading the `appSession` cookie
    pub fn gate(&self) -> SessionGate<CookieSessionResolver> {
        SessionGate::new(CookieSessionResolver::new(self.codec.clone()), &self.options)
            .with_fallback_origin(&self.config.app_origin())
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.catalog())
    }

    /// Personal list page acting with the given credentials
    pub fn client_page(&self, tokens: Arc<dyn TokenProvider>) -> ClientPage {
        ClientPage::new(self.catalog(), tokens)
    }

    /// Administration page acting with the given credentials
    pub fn admin_page(&self, tokens: Arc<dyn TokenProvider>) -> AdminPage {
        AdminPage::new(self.catalog(), tokens)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{AppConfig, ClientOptions, FailPolicy};
    pub use crate::error::Error;
    pub use crate::gate::{GateDecision, SessionGate};
    pub use crate::views::{
        AdminPage, ClientPage, Header, HomePage, MutationOutcome, Navigation, ProfileView, Prompt,
        Route, Viewer,
    };
    pub use crate::CineApp;
    pub use cineapp_auth::{Session, StaticToken, TokenProvider};
    pub use cineapp_catalog::{Movie, MovieForm};
}
