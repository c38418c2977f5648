//! Public catalog page

use log::error;

use cineapp_catalog::{CatalogClient, Movie};

pub const LOAD_ERROR: &str = "Error al cargar las películas";
pub const EMPTY_MESSAGE: &str = "No hay películas disponibles";

pub struct HomePage {
    catalog: CatalogClient,
    pub movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
}

impl HomePage {
    pub fn new(catalog: CatalogClient) -> Self {
        Self {
            catalog,
            movies: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Fetch the public catalog
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        match self.catalog.public_movies().await {
            Ok(movies) => self.movies = movies,
            Err(e) => {
                error!("failed to load public catalog: {}", e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }

        self.loading = false;
    }

    /// Message for an empty, successfully loaded catalog
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.loading && self.error.is_none() && self.movies.is_empty() {
            Some(EMPTY_MESSAGE)
        } else {
            None
        }
    }
}
