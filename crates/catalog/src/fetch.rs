//! Request helper shared by the catalog calls

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::CatalogError;

/// Builds and executes a single catalog request
pub struct FetchBuilder<'a> {
    client: &'a Client,
    url: Url,
    method: Method,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl<'a> FetchBuilder<'a> {
    pub fn new(client: &'a Client, url: Url, method: Method) -> Self {
        Self {
            client,
            url,
            method,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Add `Authorization: Bearer <token>`
    pub fn bearer_auth(mut self, token: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Send `body` as JSON
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, CatalogError> {
        self.body = Some(serde_json::to_vec(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    async fn send(self) -> Result<Response, CatalogError> {
        let mut req = self
            .client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers);

        if let Some(body) = self.body {
            req = req.body(body);
        }

        log::debug!("{} {}", self.method, self.url);
        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api { status, body });
        }

        Ok(response)
    }

    /// Execute the request and parse the response as JSON
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T, CatalogError> {
        let response = self.send().await?;
        Ok(response.json::<T>().await?)
    }

    /// Execute the request and discard any response body
    pub async fn execute_empty(self) -> Result<(), CatalogError> {
        self.send().await?;
        Ok(())
    }
}

/// Shorthands for the verbs the catalog uses
pub struct Fetch;

impl Fetch {
    pub fn get(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::GET)
    }

    pub fn post(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::POST)
    }

    pub fn put(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    pub fn delete(client: &Client, url: Url) -> FetchBuilder<'_> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}
