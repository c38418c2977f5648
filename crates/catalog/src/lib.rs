//! CineApp catalog client for Rust
//!
//! Typed access to the movie catalog REST API: the public listing, the
//! signed-in user's personal list and the administrator CRUD endpoints.

mod fetch;
mod models;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use url::Url;

pub use fetch::{Fetch, FetchBuilder};
pub use models::*;

/// エラー型
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CatalogError {
    /// HTTP status of a rejected call
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: Url,
    http_client: Client,
}

impl CatalogClient {
    /// 新しいカタログクライアントを作成
    pub fn new(api_server_url: &str, http_client: Client) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(api_server_url)?,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /public/peliculas`
    pub async fn public_movies(&self) -> Result<Vec<Movie>> {
        let url = self.endpoint(&["public", "peliculas"])?;
        Fetch::get(&self.http_client, url).execute().await
    }

    /// `GET /private/peliculas`: the caller's personal list
    pub async fn private_movies(&self, token: &str) -> Result<Vec<Movie>> {
        let url = self.endpoint(&["private", "peliculas"])?;
        Fetch::get(&self.http_client, url)
            .bearer_auth(token)
            .execute()
            .await
    }

    /// `POST /private/peliculas/agregar/{id}`
    pub async fn add_to_list(&self, token: &str, id: MovieId) -> Result<()> {
        let id = id.to_string();
        let url = self.endpoint(&["private", "peliculas", "agregar", &id])?;
        Fetch::post(&self.http_client, url)
            .bearer_auth(token)
            .json(&json!({}))?
            .execute_empty()
            .await
    }

    /// `DELETE /private/peliculas/remover/{id}`
    pub async fn remove_from_list(&self, token: &str, id: MovieId) -> Result<()> {
        let id = id.to_string();
        let url = self.endpoint(&["private", "peliculas", "remover", &id])?;
        Fetch::delete(&self.http_client, url)
            .bearer_auth(token)
            .execute_empty()
            .await
    }

    /// `GET /admin/peliculas`: every movie, public or not
    pub async fn admin_movies(&self, token: &str) -> Result<Vec<Movie>> {
        let url = self.endpoint(&["admin", "peliculas"])?;
        Fetch::get(&self.http_client, url)
            .bearer_auth(token)
            .execute()
            .await
    }

    /// `POST /admin/peliculas`. The form is validated before sending.
    pub async fn create_movie(&self, token: &str, form: &MovieForm) -> Result<()> {
        form.validate()?;
        let url = self.endpoint(&["admin", "peliculas"])?;
        Fetch::post(&self.http_client, url)
            .bearer_auth(token)
            .json(form)?
            .execute_empty()
            .await
    }

    /// `PUT /admin/peliculas/{id}`. The form is validated before sending.
    pub async fn update_movie(&self, token: &str, id: MovieId, form: &MovieForm) -> Result<()> {
        form.validate()?;
        let id = id.to_string();
        let url = self.endpoint(&["admin", "peliculas", &id])?;
        Fetch::put(&self.http_client, url)
            .bearer_auth(token)
            .json(form)?
            .execute_empty()
            .await
    }

    /// `DELETE /admin/peliculas/{id}`
    pub async fn delete_movie(&self, token: &str, id: MovieId) -> Result<()> {
        let id = id.to_string();
        let url = self.endpoint(&["admin", "peliculas", &id])?;
        Fetch::delete(&self.http_client, url)
            .bearer_auth(token)
            .execute_empty()
            .await
    }
}
