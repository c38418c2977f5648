//! Personal list page: the user's movies and the public ones left to add

use std::sync::Arc;

use log::{debug, error};

use cineapp_auth::TokenProvider;
use cineapp_catalog::{CatalogClient, Movie, MovieId};

use crate::error::Result;
use crate::views::{MutationOutcome, PendingSlot, Prompt};

pub const LOAD_ERROR: &str = "Error al cargar tu lista de películas";
pub const ADD_ERROR: &str = "Error al agregar la película a tu lista";
pub const REMOVE_ERROR: &str = "Error al eliminar la película de tu lista";
pub const ALL_ADDED: &str = "Ya tienes todas las películas disponibles en tu lista";
pub const NONE_PUBLIC: &str = "No hay películas públicas disponibles";

pub struct ClientPage {
    catalog: CatalogClient,
    tokens: Arc<dyn TokenProvider>,
    pub private_movies: Vec<Movie>,
    pub public_movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    pending: PendingSlot,
}

impl ClientPage {
    pub fn new(catalog: CatalogClient, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            catalog,
            tokens,
            private_movies: Vec::new(),
            public_movies: Vec::new(),
            loading: true,
            error: None,
            pending: PendingSlot::new(),
        }
    }

    /// Movie whose add/remove control is currently busy
    pub fn pending(&self) -> Option<MovieId> {
        self.pending.get()
    }

    /// Handle the UI keeps to read the pending id while a mutation runs
    pub fn pending_slot(&self) -> PendingSlot {
        self.pending.clone()
    }

    /// Fetch both lists concurrently; `loading` clears once both are done
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        let (private, public) = tokio::join!(
            fetch_private(&self.catalog, self.tokens.as_ref()),
            self.catalog.public_movies()
        );

        self.apply_private(private);
        match public {
            Ok(movies) => self.public_movies = movies,
            Err(e) => error!("failed to load public catalog: {}", e),
        }

        self.loading = false;
    }

    async fn refetch_private(&mut self) {
        let private = fetch_private(&self.catalog, self.tokens.as_ref()).await;
        self.apply_private(private);
    }

    fn apply_private(&mut self, result: Result<Vec<Movie>>) {
        match result {
            Ok(movies) => self.private_movies = movies,
            Err(e) => {
                error!("failed to load personal list: {}", e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
    }

    /// Whether `id` is already in the personal list
    pub fn in_list(&self, id: MovieId) -> bool {
        self.private_movies.iter().any(|m| m.id == id)
    }

    /// Public movies not yet in the personal list
    pub fn available(&self) -> Vec<&Movie> {
        self.public_movies
            .iter()
            .filter(|m| !self.in_list(m.id))
            .collect()
    }

    /// Message shown when nothing is left to add
    pub fn available_empty_message(&self) -> Option<&'static str> {
        if self.loading || !self.available().is_empty() {
            return None;
        }
        if self.public_movies.is_empty() {
            Some(NONE_PUBLIC)
        } else {
            Some(ALL_ADDED)
        }
    }

    /// Add a public movie to the personal list, then refetch it
    pub async fn add(&mut self, id: MovieId, prompt: &dyn Prompt) -> MutationOutcome {
        let Some(_guard) = self.pending.begin(id) else {
            return MutationOutcome::Busy;
        };
        debug!("adding movie {} to personal list", id);

        match self.send_add(id).await {
            Ok(()) => {
                self.refetch_private().await;
                MutationOutcome::Applied
            }
            Err(e) => {
                error!("failed to add movie {}: {}", id, e);
                prompt.alert(ADD_ERROR);
                MutationOutcome::Failed
            }
        }
    }

    /// Remove a movie from the personal list after confirmation, then refetch
    pub async fn remove(&mut self, id: MovieId, prompt: &dyn Prompt) -> MutationOutcome {
        let title = self
            .private_movies
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.title.clone())
            .unwrap_or_else(|| id.to_string());

        let question = format!(
            "¿Estás seguro de que quieres eliminar \"{}\" de tu lista?",
            title
        );
        let Some(_guard) = self.pending.begin(id) else {
            return MutationOutcome::Busy;
        };
        if !prompt.confirm(&question) {
            return MutationOutcome::Cancelled;
        }
        debug!("removing movie {} from personal list", id);

        match self.send_remove(id).await {
            Ok(()) => {
                self.refetch_private().await;
                MutationOutcome::Applied
            }
            Err(e) => {
                error!("failed to remove movie {}: {}", id, e);
                prompt.alert(REMOVE_ERROR);
                MutationOutcome::Failed
            }
        }
    }

    async fn send_add(&self, id: MovieId) -> Result<()> {
        let token = self.tokens.access_token().await?;
        self.catalog.add_to_list(&token, id).await?;
        Ok(())
    }

    async fn send_remove(&self, id: MovieId) -> Result<()> {
        let token = self.tokens.access_token().await?;
        self.catalog.remove_from_list(&token, id).await?;
        Ok(())
    }
}

async fn fetch_private(catalog: &CatalogClient, tokens: &dyn TokenProvider) -> Result<Vec<Movie>> {
    let token = tokens.access_token().await?;
    Ok(catalog.private_movies(&token).await?)
}
