//! Catalog administration page

use std::sync::Arc;

use log::{error, info};

use cineapp_auth::TokenProvider;
use cineapp_catalog::{CatalogClient, Movie, MovieForm, MovieId};

use crate::error::{Error, Result};
use crate::views::{MutationOutcome, Navigation, PendingSlot, Prompt, Route};

pub const LOAD_ERROR: &str = "Error al cargar las películas";
pub const FORBIDDEN: &str = "No tienes permisos para acceder a esta página";
pub const CREATED: &str = "Película creada exitosamente";
pub const CREATE_ERROR: &str = "Error al crear la película";
pub const UPDATED: &str = "Película actualizada exitosamente";
pub const UPDATE_ERROR: &str = "Error al actualizar la película";
pub const DELETED: &str = "Película eliminada exitosamente";
pub const DELETE_ERROR: &str = "Error al eliminar la película";

/// What submitting the open form will do
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Movie),
}

impl FormMode {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Create => "Crear Nueva Película",
            Self::Edit(_) => "Editar Película",
        }
    }
}

pub struct AdminPage {
    catalog: CatalogClient,
    tokens: Arc<dyn TokenProvider>,
    pub movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
    /// The open form, if any
    pub form: Option<(FormMode, MovieForm)>,
    navigation: Navigation,
    pending: PendingSlot,
}

impl AdminPage {
    pub fn new(catalog: CatalogClient, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            catalog,
            tokens,
            movies: Vec::new(),
            loading: true,
            error: None,
            form: None,
            navigation: Navigation::Stay,
            pending: PendingSlot::new(),
        }
    }

    pub fn pending(&self) -> Option<MovieId> {
        self.pending.get()
    }

    /// Handle the UI keeps to read the pending id while a mutation runs
    pub fn pending_slot(&self) -> PendingSlot {
        self.pending.clone()
    }

    /// Where the UI should be after the last listing fetch, including the
    /// refetch that follows every mutation
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Fetch every movie. A 403 sends the user back to the home page.
    pub async fn load(&mut self) -> Navigation {
        self.loading = true;
        self.error = None;

        let navigation = match self.fetch().await {
            Ok(movies) => {
                self.movies = movies;
                Navigation::Stay
            }
            Err(e) if e.is_forbidden() => {
                error!("admin listing refused: {}", e);
                self.error = Some(FORBIDDEN.to_string());
                Navigation::Redirect(Route::Home.path().to_string())
            }
            Err(e) => {
                error!("failed to load admin listing: {}", e);
                self.error = Some(LOAD_ERROR.to_string());
                Navigation::Stay
            }
        };

        self.loading = false;
        self.navigation = navigation.clone();
        navigation
    }

    async fn fetch(&self) -> Result<Vec<Movie>> {
        let token = self.tokens.access_token().await?;
        Ok(self.catalog.admin_movies(&token).await?)
    }

    /// Open an empty creation form
    pub fn open_create(&mut self) {
        self.form = Some((FormMode::Create, MovieForm::default()));
    }

    /// Open the form pre-filled with `movie`
    pub fn edit(&mut self, movie: &Movie) {
        self.form = Some((FormMode::Edit(movie.clone()), MovieForm::from_movie(movie)));
    }

    /// Close the form and discard its contents
    pub fn cancel(&mut self) {
        self.form = None;
    }

    /// Mutable access to the open form's fields
    pub fn form_mut(&mut self) -> Option<&mut MovieForm> {
        self.form.as_mut().map(|(_, data)| data)
    }

    /// Validate and send the open form, then refetch and close it
    pub async fn submit(&mut self, prompt: &dyn Prompt) -> MutationOutcome {
        let Some((mode, data)) = self.form.clone() else {
            return MutationOutcome::Cancelled;
        };

        if let Err(e) = data.validate() {
            prompt.alert(&e.to_string());
            return MutationOutcome::Rejected;
        }

        let _guard = match &mode {
            FormMode::Create => None,
            FormMode::Edit(movie) => match self.pending.begin(movie.id) {
                Some(guard) => Some(guard),
                None => return MutationOutcome::Busy,
            },
        };

        let (result, success, failure) = match &mode {
            FormMode::Create => (self.send_create(&data).await, CREATED, CREATE_ERROR),
            FormMode::Edit(movie) => (self.send_update(movie.id, &data).await, UPDATED, UPDATE_ERROR),
        };

        match result {
            Ok(()) => {
                self.refetch().await;
                self.form = None;
                prompt.alert(success);
                MutationOutcome::Applied
            }
            Err(e) => {
                error!("{}: {}", failure, e);
                prompt.alert(failure);
                MutationOutcome::Failed
            }
        }
    }

    /// Delete a movie after confirmation, then refetch
    pub async fn delete(&mut self, id: MovieId, title: &str, prompt: &dyn Prompt) -> MutationOutcome {
        let Some(_guard) = self.pending.begin(id) else {
            return MutationOutcome::Busy;
        };
        let question = format!("¿Estás seguro de que quieres eliminar \"{}\"?", title);
        if !prompt.confirm(&question) {
            return MutationOutcome::Cancelled;
        }

        match self.send_delete(id).await {
            Ok(()) => {
                info!("deleted movie {}", id);
                self.refetch().await;
                prompt.alert(DELETED);
                MutationOutcome::Applied
            }
            Err(e) => {
                error!("failed to delete movie {}: {}", id, e);
                prompt.alert(DELETE_ERROR);
                MutationOutcome::Failed
            }
        }
    }

    async fn refetch(&mut self) {
        if let Navigation::Redirect(to) = self.load().await {
            info!("admin listing refused after mutation, leaving for {}", to);
        }
    }

    async fn send_create(&self, form: &MovieForm) -> Result<()> {
        let token = self.tokens.access_token().await?;
        self.catalog.create_movie(&token, form).await.map_err(Error::from)
    }

    async fn send_update(&self, id: MovieId, form: &MovieForm) -> Result<()> {
        let token = self.tokens.access_token().await?;
        self.catalog.update_movie(&token, id, form).await.map_err(Error::from)
    }

    async fn send_delete(&self, id: MovieId) -> Result<()> {
        let token = self.tokens.access_token().await?;
        self.catalog.delete_movie(&token, id).await.map_err(Error::from)
    }
}
